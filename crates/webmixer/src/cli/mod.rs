//! CLI subcommands — serve the API, read and update controls, inspect config.

mod config_cmd;
mod controls;
mod parse;
mod serve;
mod set;

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;

pub(super) use webmixer_lib::amixer::AmixerCli;
pub(super) use webmixer_lib::config::Config;
pub(super) use webmixer_lib::control::Control;
pub(super) use webmixer_lib::error::Result;
pub(super) use webmixer_lib::mixer::Mixer;
pub(super) use webmixer_lib::parser::{self, ParseReport};
pub(super) use webmixer_lib::update::{RequestedValue, SetCommand, UpdateRequest};
pub(super) use webmixer_lib::WebmixerError;

const PADDING: usize = 2;

/// Flags shared by every subcommand.
pub struct GlobalOptions {
    pub json: bool,
    pub config_path: Option<PathBuf>,
    pub card: Option<u32>,
    pub amixer: Option<String>,
}

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2);
}

/// Config from `custom_path` if given, else the default location.
/// Parse problems are logged and fall back to defaults.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    match custom_path {
        Some(path) => {
            let (config, warnings) = Config::load_from(path);
            for w in &warnings {
                log::warn!("{w}");
            }
            config
        }
        None => Config::load(),
    }
}

/// Loaded config with the global `--card` / `--amixer` overrides applied.
pub(super) fn effective_config(options: &GlobalOptions) -> Config {
    let mut config = load_config(options.config_path.as_deref());
    if let Some(card) = options.card {
        config.card_index = card;
    }
    if let Some(ref amixer) = options.amixer {
        config.amixer_path = amixer.clone();
    }
    config
}

/// Reject a config that would make every command fail.
pub(super) fn ensure_valid(config: &Config) -> Result<()> {
    config.validate().map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        WebmixerError::Config(messages.join("; "))
    })
}

pub(super) fn mixer_for(config: &Config) -> Mixer<AmixerCli> {
    Mixer::new(AmixerCli::new(&config.amixer_path, config.card_index))
}

pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| WebmixerError::Config(format!("JSON serialization failed: {e}")))?;
    println!("{json}");
    Ok(())
}

/// One line per control: name, type, value with bounds or options, icon, mute flag.
pub(super) fn format_control(c: &Control) -> String {
    let detail = match (c.min, c.max) {
        (Some(min), Some(max)) => format!("{} ({min}-{max})", c.value),
        _ => format!("'{}' of [{}]", c.value, c.options.join(", ")),
    };
    let muted = if c.is_muted { "  [muted]" } else { "" };
    format!(
        "{:<24} {:<4}  {:<28} {}{muted}",
        c.name,
        c.kind.to_string(),
        detail,
        c.icon
    )
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct ParseOutput {
    pub count: usize,
    pub controls: Vec<Control>,
    pub diagnostics: Vec<String>,
}

impl From<ParseReport> for ParseOutput {
    fn from(report: ParseReport) -> Self {
        ParseOutput {
            count: report.controls.len(),
            diagnostics: report.diagnostics.iter().map(|d| d.to_string()).collect(),
            controls: report.controls,
        }
    }
}

#[derive(Serialize)]
pub(super) struct SetOutput {
    pub status: &'static str,
    pub commands: Vec<SetCommand>,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub written: bool,
    pub settings: Config,
    pub problems: Vec<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the HTTP API until Ctrl+C
    Serve {
        /// Address to bind (overrides the config file)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Read and list the card's controls
    Controls,

    /// Update one control
    Set {
        /// Control name as listed by `controls`
        name: String,
        /// New value: an integer sets the level in percent, anything else selects an option
        #[arg(long, allow_hyphen_values = true)]
        value: Option<String>,
        /// Mute the control
        #[arg(long, conflicts_with = "unmute")]
        mute: bool,
        /// Unmute the control
        #[arg(long)]
        unmute: bool,
    },

    /// Parse saved `amixer scontents` output (no hardware required)
    Parse {
        /// File containing the output of `amixer -c N scontents`
        file: PathBuf,
    },

    /// Show current configuration and file path
    Config {
        /// Write the effective configuration (including --card/--amixer) to the config file
        #[arg(long)]
        write: bool,
    },
}

pub fn run(cmd: Command, options: &GlobalOptions) -> Result<()> {
    match cmd {
        Command::Serve { bind, port } => {
            if options.json {
                log::warn!("--json is not supported for `serve` (ignored)");
            }
            let mut config = effective_config(options);
            if let Some(bind) = bind {
                config.bind_address = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve::cmd_serve(config)
        }
        Command::Controls => controls::cmd_controls(&effective_config(options), options.json),
        Command::Set {
            name,
            value,
            mute,
            unmute,
        } => {
            let request = UpdateRequest {
                value: value.as_deref().map(RequestedValue::from_arg),
                is_muted: match (mute, unmute) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };
            set::cmd_set(&effective_config(options), &name, &request, options.json)
        }
        Command::Parse { file } => parse::cmd_parse(&file, options.json),
        Command::Config { write } => config_cmd::cmd_config(options, write),
    }
}
