//! `amixer scontents` parser — raw status text to typed [`Control`]s.
//!
//! The text is split on the `Simple mixer control '` marker and every block
//! is decoded on its own. A block that cannot be decoded becomes a
//! [`Diagnostic`] in the [`ParseReport`]; it never aborts the remaining
//! blocks and never fails the read.
//!
//! Classification is by marker, in precedence order:
//!
//! | Marker     | Type                                  |
//! |------------|---------------------------------------|
//! | `Items:`   | `ENUM`                                |
//! | `Limits:`  | `INT` (demoted to `BOOL` if max is 1) |
//! | neither    | `BOOL` (plain switch)                 |

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::control::{Control, ControlViolation};

/// Marker preceding every control block in `scontents` output.
pub const BLOCK_MARKER: &str = "Simple mixer control '";

/// Bounds used when a numeric block has no parseable `Limits:` line, and
/// for every level read as a percentage.
pub const PERCENT_BOUNDS: (i64, i64) = (0, 100);

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^']+)',(\d+)").expect("Invalid Regex"));
static ITEMS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Items: (.*)").expect("Invalid Regex"));
static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'([^']*)'").expect("Invalid Regex"));
static ITEM0_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Item0: '([^']*)'").expect("Invalid Regex"));
static LIMITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Limits:(?:.* )?(\d+) - (\d+)").expect("Invalid Regex"));
static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)%\]").expect("Invalid Regex"));
static RAW_LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Playback (\d+)").expect("Invalid Regex"));
static SWITCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(on|off)\]").expect("Invalid Regex"));
static MUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Playback .* \[(on|off)\]").expect("Invalid Regex"));

// ── Result types ──

/// Why a block produced no control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Block does not start with `<name>',<index>`. Carries the block's first line.
    MissingName(String),
    /// A numeric field did not fit in an `i64`.
    InvalidNumber { field: &'static str, text: String },
    /// The decoded control broke a model invariant.
    Invalid(ControlViolation),
    /// A later block with the same name replaced this one.
    Superseded,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingName(line) => write!(f, "no control name in block: {line:?}"),
            SkipReason::InvalidNumber { field, text } => write!(f, "invalid {field}: {text}"),
            SkipReason::Invalid(v) => write!(f, "invalid control: {v}"),
            SkipReason::Superseded => write!(f, "superseded by a later block with the same name"),
        }
    }
}

/// Outcome of decoding one block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockOutcome {
    Decoded(Control),
    /// Name is `None` when the block had no recognizable name.
    Skipped {
        name: Option<String>,
        reason: SkipReason,
    },
}

/// A block that did not make it into [`ParseReport::controls`].
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub name: Option<String>,
    pub reason: SkipReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("unknown");
        write!(f, "block '{name}': {}", self.reason)
    }
}

/// Controls decoded from one read, plus the blocks that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub controls: Vec<Control>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseReport {
    fn push(&mut self, outcome: BlockOutcome) {
        match outcome {
            BlockOutcome::Decoded(control) => {
                match self.controls.iter_mut().find(|c| c.name == control.name) {
                    Some(existing) => {
                        log::debug!("duplicate control '{}', keeping the later block", control.name);
                        self.diagnostics.push(Diagnostic {
                            name: Some(control.name.clone()),
                            reason: SkipReason::Superseded,
                        });
                        *existing = control;
                    }
                    None => self.controls.push(control),
                }
            }
            BlockOutcome::Skipped { name, reason } => {
                self.diagnostics.push(Diagnostic { name, reason });
            }
        }
    }

    /// Log every diagnostic at `warn` and return the controls.
    pub fn into_controls(self) -> Vec<Control> {
        for d in &self.diagnostics {
            log::warn!("skipped mixer {d}");
        }
        self.controls
    }
}

// ── Parsing ──

/// Parse `amixer scontents` output.
pub fn parse(raw: &str) -> ParseReport {
    let mut report = ParseReport::default();
    for block in raw.split(BLOCK_MARKER) {
        if block.trim().is_empty() {
            continue;
        }
        report.push(decode_block(block));
    }
    report
}

/// [`parse`], logging and discarding diagnostics.
pub fn parse_controls(raw: &str) -> Vec<Control> {
    parse(raw).into_controls()
}

/// Decode a single block (text following [`BLOCK_MARKER`]).
pub fn decode_block(block: &str) -> BlockOutcome {
    let Some(name) = NAME_RE.captures(block).map(|c| c[1].to_string()) else {
        let first_line = block.lines().next().unwrap_or_default().trim().to_string();
        return BlockOutcome::Skipped {
            name: None,
            reason: SkipReason::MissingName(first_line),
        };
    };

    let decoded = if block.contains("Items:") {
        Ok(decode_enum(&name, block))
    } else if block.contains("Limits:") {
        decode_level(&name, block)
    } else {
        Ok(decode_switch(&name, block))
    };

    let mut control = match decoded {
        Ok(c) => c,
        Err(reason) => {
            return BlockOutcome::Skipped {
                name: Some(name),
                reason,
            };
        }
    };

    // Evaluated for every type; may read the same bracket a plain switch
    // already used for its value.
    if let Some(caps) = MUTE_RE.captures(block) {
        control.is_muted = &caps[1] == "off";
    }

    if let Err(v) = control.validate() {
        return BlockOutcome::Skipped {
            name: Some(name),
            reason: SkipReason::Invalid(v),
        };
    }
    BlockOutcome::Decoded(control)
}

fn decode_enum(name: &str, block: &str) -> Control {
    let options: Vec<String> = ITEMS_RE
        .captures(block)
        .map(|caps| {
            QUOTED_RE
                .captures_iter(&caps[1])
                .map(|q| q[1].to_string())
                .collect()
        })
        .unwrap_or_default();
    let selected = ITEM0_RE
        .captures(block)
        .map(|c| c[1].to_string())
        .unwrap_or_default();
    Control::enumerated(name, options, selected)
}

fn decode_level(name: &str, block: &str) -> Result<Control, SkipReason> {
    let (min, max) = match LIMITS_RE.captures(block) {
        Some(caps) => (
            parse_number("limit", &caps[1])?,
            parse_number("limit", &caps[2])?,
        ),
        None => PERCENT_BOUNDS,
    };

    if let Some(caps) = PERCENT_RE.captures(block) {
        let value = parse_number("level", &caps[1])?;
        return Ok(Control::level(name, value, PERCENT_BOUNDS.0, PERCENT_BOUNDS.1));
    }

    let value = match raw_level(block) {
        Some(text) => parse_number("level", text)?,
        None => 0,
    };
    Ok(Control::level(name, value, min, max))
}

/// First `Playback <n>` outside the `Limits:` line, whose own
/// `Playback 0 - N` would otherwise be read as the level.
fn raw_level(block: &str) -> Option<&str> {
    block
        .lines()
        .filter(|line| !line.trim_start().starts_with("Limits:"))
        .find_map(|line| RAW_LEVEL_RE.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn decode_switch(name: &str, block: &str) -> Control {
    let on = SWITCH_RE
        .captures(block)
        .is_some_and(|caps| &caps[1] == "on");
    Control::switch(name, on)
}

fn parse_number(field: &'static str, text: &str) -> Result<i64, SkipReason> {
    text.parse().map_err(|_| SkipReason::InvalidNumber {
        field,
        text: text.to_string(),
    })
}
