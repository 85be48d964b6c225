//! Application configuration — TOML-based, platform-aware paths.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# webmixer configuration (written by `webmixer config --write`).\n\n";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// ALSA card index every command targets. Default: 0 (first card).
    #[serde(default)]
    pub card_index: u32,

    /// Path or name of the `amixer` binary. Default: "amixer" (looked up in PATH).
    #[serde(default = "default_amixer_path")]
    pub amixer_path: String,

    /// Address the HTTP API binds to. Default: "0.0.0.0".
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP API port. Default: 5000.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS. Empty = any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,

    /// Validate updates against the current control before running them.
    #[serde(default)]
    pub strict_updates: bool,
}

fn default_amixer_path() -> String {
    "amixer".into()
}
fn default_bind_address() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Config {
            card_index: 0,
            amixer_path: default_amixer_path(),
            bind_address: default_bind_address(),
            port: default_port(),
            cors_allowed_origins: Vec::new(),
            strict_updates: false,
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The `amixer_path` field is empty or whitespace-only.
    EmptyAmixerPath,
    /// The `bind_address` field is not an IP address.
    InvalidBindAddress(String),
    /// The `port` field is 0.
    InvalidPort,
    /// A `cors_allowed_origins` entry is not a valid header value.
    InvalidOrigin(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyAmixerPath => write!(f, "amixer path cannot be empty"),
            ValidationError::InvalidBindAddress(a) => write!(f, "Invalid bind address: {a}"),
            ValidationError::InvalidPort => write!(f, "Port cannot be 0"),
            ValidationError::InvalidOrigin(o) => write!(f, "Invalid CORS origin: {o:?}"),
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("webmixer"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    ///
    /// A header comment names the command that wrote the file.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Save config to the default platform path.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config directory",
            ));
        };
        self.save_to(&path)
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Socket address for the HTTP API.
    pub fn socket_addr(&self) -> crate::error::Result<SocketAddr> {
        let ip: IpAddr = self.bind_address.trim().parse().map_err(|_| {
            crate::WebmixerError::Config(format!("Invalid bind address: {}", self.bind_address))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Validate the entire config, collecting all errors.
    ///
    /// Returns `Ok(())` if valid, or `Err(Vec<ValidationError>)` with all problems found.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.amixer_path.trim().is_empty() {
            errors.push(ValidationError::EmptyAmixerPath);
        }

        if self.bind_address.trim().parse::<IpAddr>().is_err() {
            errors.push(ValidationError::InvalidBindAddress(
                self.bind_address.clone(),
            ));
        }

        if self.port == 0 {
            errors.push(ValidationError::InvalidPort);
        }

        // Origins end up in an HTTP header; reject anything that can't.
        for origin in &self.cors_allowed_origins {
            let trimmed = origin.trim();
            let printable = trimmed.bytes().all(|b| (0x21..0x7f).contains(&b));
            if trimmed.is_empty() || !printable {
                errors.push(ValidationError::InvalidOrigin(origin.clone()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
