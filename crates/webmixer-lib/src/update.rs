//! Update synthesis — structured update requests to `amixer sset` commands.
//!
//! [`synthesize`] is pure: it never looks at the current state of the
//! control, so an option string sent to a level control (or a level sent to
//! a selector) is passed through to `amixer` unchanged. Integer levels are
//! always sent as percentages, matching the 0–100 bounds the parser reports
//! for percentage-sourced controls. [`check`] is the opt-in validation used
//! by strict mode.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::control::{Control, ControlType};

/// Requested `value`: a JSON string selects an option, a JSON integer sets a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestedValue {
    Option(String),
    Level(i64),
}

impl RequestedValue {
    /// CLI form: anything that parses as an integer is a level.
    pub fn from_arg(arg: &str) -> Self {
        match arg.trim().parse::<i64>() {
            Ok(n) => RequestedValue::Level(n),
            Err(_) => RequestedValue::Option(arg.to_string()),
        }
    }
}

/// Body of `POST /api/controls/{name}`. Both fields are optional and may be combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RequestedValue>,
    #[serde(
        default,
        rename = "isMuted",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_muted: Option<bool>,
}

impl UpdateRequest {
    /// Actions in execution order: value first, then mute.
    pub fn actions(&self) -> Vec<UpdateAction> {
        let mut actions = Vec::with_capacity(2);
        match &self.value {
            Some(RequestedValue::Option(s)) => actions.push(UpdateAction::SelectOption(s.clone())),
            Some(RequestedValue::Level(n)) => actions.push(UpdateAction::SetLevel(*n)),
            None => {}
        }
        if let Some(muted) = self.is_muted {
            actions.push(UpdateAction::SetMute(muted));
        }
        actions
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.is_muted.is_none()
    }
}

/// One change to a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    SelectOption(String),
    /// Level in percent.
    SetLevel(i64),
    SetMute(bool),
}

impl UpdateAction {
    /// The `sset` argument for this action.
    pub fn token(&self) -> String {
        match self {
            UpdateAction::SelectOption(s) => s.clone(),
            UpdateAction::SetLevel(n) => format!("{n}%"),
            UpdateAction::SetMute(true) => "mute".into(),
            UpdateAction::SetMute(false) => "unmute".into(),
        }
    }
}

/// `amixer sset <control> <token>`, minus the card selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetCommand {
    pub control: String,
    pub token: String,
}

impl fmt::Display for SetCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sset '{}' '{}'", self.control, self.token)
    }
}

/// Build one command per action, in order. No actions, no commands.
pub fn synthesize(name: &str, actions: &[UpdateAction]) -> Vec<SetCommand> {
    actions
        .iter()
        .map(|action| SetCommand {
            control: name.to_string(),
            token: action.token(),
        })
        .collect()
}

/// Shorthand for `synthesize(name, &request.actions())`.
pub fn synthesize_request(name: &str, request: &UpdateRequest) -> Vec<SetCommand> {
    synthesize(name, &request.actions())
}

// ── Strict-mode validation ──

/// Update rejected by [`check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    UnknownControl(String),
    /// Option string sent to a numeric control, or a level to a selector.
    WrongKind {
        control: String,
        kind: ControlType,
    },
    UnknownOption {
        control: String,
        option: String,
    },
    LevelOutOfRange {
        control: String,
        level: i64,
    },
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateError::UnknownControl(name) => write!(f, "Unknown control: {name}"),
            UpdateError::WrongKind { control, kind } => {
                write!(f, "Value does not fit {kind} control '{control}'")
            }
            UpdateError::UnknownOption { control, option } => {
                write!(f, "'{option}' is not an option of '{control}'")
            }
            UpdateError::LevelOutOfRange { control, level } => {
                write!(f, "Level {level}% out of range for '{control}' (0-100)")
            }
        }
    }
}

impl std::error::Error for UpdateError {}

/// Validate `actions` against the current state of the named control.
pub fn check(
    name: &str,
    actions: &[UpdateAction],
    controls: &[Control],
) -> Result<(), UpdateError> {
    let Some(control) = controls.iter().find(|c| c.name == name) else {
        return Err(UpdateError::UnknownControl(name.to_string()));
    };
    for action in actions {
        match (action, control.kind) {
            (UpdateAction::SelectOption(option), ControlType::Enum) => {
                if !control.options.iter().any(|o| o == option) {
                    return Err(UpdateError::UnknownOption {
                        control: name.to_string(),
                        option: option.clone(),
                    });
                }
            }
            (UpdateAction::SetLevel(level), ControlType::Int | ControlType::Bool) => {
                if !(0..=100).contains(level) {
                    return Err(UpdateError::LevelOutOfRange {
                        control: name.to_string(),
                        level: *level,
                    });
                }
            }
            (UpdateAction::SelectOption(_) | UpdateAction::SetLevel(_), kind) => {
                return Err(UpdateError::WrongKind {
                    control: name.to_string(),
                    kind,
                });
            }
            (UpdateAction::SetMute(_), _) => {}
        }
    }
    Ok(())
}
