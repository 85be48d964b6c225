//! `amixer` access — trait + process backend.
//!
//! Every call runs the tool to completion and blocks the calling thread.
//! There is no timeout and no cancellation: a hung `amixer` stalls the
//! caller until it exits.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Output};

use crate::update::SetCommand;

// ── Error type ──

/// Mixer tool errors.
///
/// String payloads follow the convention **"context: details"** where
/// *context* names the invocation (e.g. `"amixer -c 0 scontents"`).
#[derive(Debug)]
pub enum MixerError {
    /// The tool could not be started (missing binary, permission denied).
    Spawn(String),
    /// The tool ran but exited unsuccessfully.
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    /// Standard output was not UTF-8.
    InvalidOutput(String),
}

impl fmt::Display for MixerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixerError::Spawn(e) => write!(f, "Failed to run mixer tool: {e}"),
            MixerError::CommandFailed {
                command,
                status,
                stderr,
            } => {
                if stderr.is_empty() {
                    write!(f, "{command} failed ({status})")
                } else {
                    write!(f, "{command} failed ({status}): {stderr}")
                }
            }
            MixerError::InvalidOutput(e) => write!(f, "Invalid mixer output: {e}"),
        }
    }
}

impl std::error::Error for MixerError {}

pub type Result<T> = std::result::Result<T, MixerError>;

// ── Trait ──

/// Source of mixer status text and sink for update commands.
pub trait MixerSource {
    /// Raw `scontents` output for the configured card.
    fn contents(&self) -> Result<String>;
    /// Run one `sset` command.
    fn set(&self, command: &SetCommand) -> Result<()>;
}

impl<S: MixerSource + ?Sized> MixerSource for Box<S> {
    fn contents(&self) -> Result<String> {
        (**self).contents()
    }

    fn set(&self, command: &SetCommand) -> Result<()> {
        (**self).set(command)
    }
}

impl<S: MixerSource + ?Sized> MixerSource for std::sync::Arc<S> {
    fn contents(&self) -> Result<String> {
        (**self).contents()
    }

    fn set(&self, command: &SetCommand) -> Result<()> {
        (**self).set(command)
    }
}

// ── Process backend ──

/// Runs the `amixer` binary against one fixed card.
#[derive(Debug, Clone)]
pub struct AmixerCli {
    program: PathBuf,
    card: u32,
}

impl AmixerCli {
    pub fn new(program: impl Into<PathBuf>, card: u32) -> Self {
        AmixerCli {
            program: program.into(),
            card,
        }
    }

    pub fn card(&self) -> u32 {
        self.card
    }

    /// Arguments for reading the card's simple controls.
    pub fn contents_args(&self) -> Vec<String> {
        vec!["-c".into(), self.card.to_string(), "scontents".into()]
    }

    /// Arguments for one update command.
    pub fn set_args(&self, command: &SetCommand) -> Vec<String> {
        vec![
            "-c".into(),
            self.card.to_string(),
            "sset".into(),
            command.control.clone(),
            command.token.clone(),
        ]
    }

    fn describe(&self, args: &[String]) -> String {
        format!("{} {}", self.program.display(), args.join(" "))
    }

    fn run(&self, args: &[String]) -> Result<Output> {
        let description = self.describe(args);
        log::debug!("running {description}");
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| MixerError::Spawn(format!("{description}: {e}")))?;
        if !output.status.success() {
            return Err(MixerError::CommandFailed {
                command: description,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl MixerSource for AmixerCli {
    fn contents(&self) -> Result<String> {
        let args = self.contents_args();
        let output = self.run(&args)?;
        String::from_utf8(output.stdout)
            .map_err(|e| MixerError::InvalidOutput(format!("{}: {e}", self.describe(&args))))
    }

    fn set(&self, command: &SetCommand) -> Result<()> {
        self.run(&self.set_args(command)).map(|_| ())
    }
}

// ── Mock backend ──

/// In-memory mixer for unit, integration and HTTP tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// In-memory mixer for tests. Serves fixed `scontents` text and records
    /// every `set` call. Thread-safe so it can sit behind the HTTP server.
    #[derive(Default)]
    pub struct MockMixer {
        /// Text returned by `contents()`.
        pub text: Mutex<String>,
        /// Recorded `set` calls, in order.
        pub commands: Mutex<Vec<SetCommand>>,
        /// If true, `contents()` fails.
        pub fail_contents: AtomicBool,
        /// If set, `set()` fails for commands with this token.
        pub fail_token: Mutex<Option<String>>,
    }

    impl MockMixer {
        pub fn new(text: &str) -> Self {
            MockMixer {
                text: Mutex::new(text.to_string()),
                ..Default::default()
            }
        }

        pub fn set_fail_contents(&self, fail: bool) {
            self.fail_contents.store(fail, Ordering::SeqCst);
        }

        pub fn fail_on_token(&self, token: &str) {
            if let Ok(mut t) = self.fail_token.lock() {
                *t = Some(token.to_string());
            }
        }

        /// Tokens of all recorded commands.
        pub fn tokens(&self) -> Vec<String> {
            self.recorded().into_iter().map(|c| c.token).collect()
        }

        pub fn recorded(&self) -> Vec<SetCommand> {
            self.commands
                .lock()
                .map(|c| c.clone())
                .unwrap_or_default()
        }
    }

    impl MixerSource for MockMixer {
        fn contents(&self) -> Result<String> {
            if self.fail_contents.load(Ordering::SeqCst) {
                return Err(MixerError::CommandFailed {
                    command: "mock scontents".into(),
                    status: "exit status: 1".into(),
                    stderr: "Invalid card number.".into(),
                });
            }
            self.text
                .lock()
                .map(|t| t.clone())
                .map_err(|e| MixerError::InvalidOutput(format!("mock: {e}")))
        }

        fn set(&self, command: &SetCommand) -> Result<()> {
            let should_fail = self
                .fail_token
                .lock()
                .map(|t| t.as_deref() == Some(command.token.as_str()))
                .unwrap_or(false);
            if should_fail {
                return Err(MixerError::CommandFailed {
                    command: format!("mock {command}"),
                    status: "exit status: 1".into(),
                    stderr: format!("Invalid command: {}", command.token),
                });
            }
            if let Ok(mut commands) = self.commands.lock() {
                commands.push(command.clone());
            }
            Ok(())
        }
    }
}
