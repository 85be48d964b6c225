//! Control model — the typed view of one ALSA simple mixer control.
//!
//! A [`Control`] is built fresh by the parser on every read and is never
//! cached; the sound card is the only source of truth. Field names
//! serialize to the JSON shape served by `GET /api/controls`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a control is presented and updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ControlType {
    /// Enumerated selector (`Items:` present).
    Enum,
    /// Numeric level (`Limits:` present).
    Int,
    /// On/off switch, or a 0–1 level.
    Bool,
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlType::Enum => write!(f, "ENUM"),
            ControlType::Int => write!(f, "INT"),
            ControlType::Bool => write!(f, "BOOL"),
        }
    }
}

/// Current value of a control: the selected option for `ENUM`, a number otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Text(String),
    Level(i64),
}

impl fmt::Display for ControlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlValue::Text(s) => write!(f, "{s}"),
            ControlValue::Level(n) => write!(f, "{n}"),
        }
    }
}

/// Display hint derived from the control name. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Mic,
    Headphone,
    Chip,
    Speaker,
}

impl Icon {
    /// Classify a control name. Case-insensitive, first match wins:
    /// `mic`/`capture` → [`Icon::Mic`], `headphone` → [`Icon::Headphone`],
    /// `pcm` → [`Icon::Chip`], anything else → [`Icon::Speaker`].
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("mic") || lower.contains("capture") {
            Icon::Mic
        } else if lower.contains("headphone") {
            Icon::Headphone
        } else if lower.contains("pcm") {
            Icon::Chip
        } else {
            Icon::Speaker
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Icon::Mic => "mic",
            Icon::Headphone => "headphone",
            Icon::Chip => "chip",
            Icon::Speaker => "speaker",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ControlType,
    pub value: ControlValue,
    /// Lower bound. `None` for `ENUM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    /// Upper bound. `None` for `ENUM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(default)]
    pub options: Vec<String>,
    /// Playback switch reads `[off]`. Independent of `value`.
    #[serde(rename = "isMuted")]
    pub is_muted: bool,
    pub icon: Icon,
}

impl Control {
    /// Enumerated selector with its option list and current selection.
    pub fn enumerated(name: &str, options: Vec<String>, selected: String) -> Self {
        Self::with_kind(name, ControlType::Enum, ControlValue::Text(selected), None, options)
    }

    /// Numeric level. Demoted to `BOOL` when `max == 1`.
    pub fn level(name: &str, value: i64, min: i64, max: i64) -> Self {
        let kind = if max == 1 {
            ControlType::Bool
        } else {
            ControlType::Int
        };
        Self::with_kind(name, kind, ControlValue::Level(value), Some((min, max)), Vec::new())
    }

    /// Plain on/off switch.
    pub fn switch(name: &str, on: bool) -> Self {
        Self::with_kind(
            name,
            ControlType::Bool,
            ControlValue::Level(i64::from(on)),
            Some((0, 1)),
            Vec::new(),
        )
    }

    fn with_kind(
        name: &str,
        kind: ControlType,
        value: ControlValue,
        bounds: Option<(i64, i64)>,
        options: Vec<String>,
    ) -> Self {
        Control {
            id: name.to_string(),
            name: name.to_string(),
            kind,
            value,
            min: bounds.map(|(min, _)| min),
            max: bounds.map(|(_, max)| max),
            options,
            is_muted: false,
            icon: Icon::from_name(name),
        }
    }

    /// Check the type-specific invariants.
    pub fn validate(&self) -> Result<(), ControlViolation> {
        match self.kind {
            ControlType::Enum => {
                let ControlValue::Text(ref selected) = self.value else {
                    return Err(ControlViolation::ValueKind(self.kind));
                };
                if self.min.is_some() || self.max.is_some() {
                    return Err(ControlViolation::UnexpectedBounds);
                }
                if !selected.is_empty() && !self.options.iter().any(|o| o == selected) {
                    return Err(ControlViolation::UnknownOption(selected.clone()));
                }
                Ok(())
            }
            ControlType::Int | ControlType::Bool => {
                let ControlValue::Level(value) = self.value else {
                    return Err(ControlViolation::ValueKind(self.kind));
                };
                if !self.options.is_empty() {
                    return Err(ControlViolation::UnexpectedOptions);
                }
                let (Some(min), Some(max)) = (self.min, self.max) else {
                    return Err(ControlViolation::MissingBounds);
                };
                if self.kind == ControlType::Bool && (min, max) != (0, 1) {
                    return Err(ControlViolation::SwitchBounds { min, max });
                }
                if value < min || value > max {
                    return Err(ControlViolation::OutOfRange { value, min, max });
                }
                Ok(())
            }
        }
    }
}

/// Shorthand for `control.validate().is_ok()`.
pub fn is_valid(control: &Control) -> bool {
    control.validate().is_ok()
}

/// A broken [`Control`] invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlViolation {
    /// `value` is a string on a numeric control, or a number on an `ENUM`.
    ValueKind(ControlType),
    /// `ENUM` selection not among `options`.
    UnknownOption(String),
    /// Numeric control without `min`/`max`.
    MissingBounds,
    /// `ENUM` control carrying `min`/`max`.
    UnexpectedBounds,
    /// Non-`ENUM` control carrying options.
    UnexpectedOptions,
    /// `BOOL` control whose bounds are not 0–1.
    SwitchBounds { min: i64, max: i64 },
    OutOfRange { value: i64, min: i64, max: i64 },
}

impl fmt::Display for ControlViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlViolation::ValueKind(kind) => write!(f, "value has the wrong kind for {kind}"),
            ControlViolation::UnknownOption(s) => write!(f, "selection '{s}' is not an option"),
            ControlViolation::MissingBounds => write!(f, "numeric control has no bounds"),
            ControlViolation::UnexpectedBounds => write!(f, "enumerated control has bounds"),
            ControlViolation::UnexpectedOptions => write!(f, "numeric control has options"),
            ControlViolation::SwitchBounds { min, max } => {
                write!(f, "switch bounds must be 0-1, got {min}-{max}")
            }
            ControlViolation::OutOfRange { value, min, max } => {
                write!(f, "value {value} outside {min}-{max}")
            }
        }
    }
}

impl std::error::Error for ControlViolation {}
