//! Unified error type for the webmixer-lib crate.
//!
//! [`WebmixerError`] wraps module-specific errors (`MixerError`,
//! `UpdateError`) and plain I/O and configuration failures. `From` impls
//! allow `?` to propagate across module boundaries seamlessly.

use std::fmt;

use crate::amixer::MixerError;
use crate::update::UpdateError;

/// Unified error type for webmixer-lib operations.
#[derive(Debug)]
pub enum WebmixerError {
    /// Mixer tool failure (spawn, exit status, output decoding).
    Mixer(MixerError),
    /// Update rejected by strict validation.
    Update(UpdateError),
    /// Standard I/O error (file read/write, config persistence).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
}

impl fmt::Display for WebmixerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebmixerError::Mixer(e) => write!(f, "{e}"),
            WebmixerError::Update(e) => write!(f, "{e}"),
            WebmixerError::Io(e) => write!(f, "I/O error: {e}"),
            WebmixerError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for WebmixerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WebmixerError::Mixer(e) => Some(e),
            WebmixerError::Update(e) => Some(e),
            WebmixerError::Io(e) => Some(e),
            WebmixerError::Config(_) => None,
        }
    }
}

impl From<MixerError> for WebmixerError {
    fn from(e: MixerError) -> Self {
        WebmixerError::Mixer(e)
    }
}

impl From<UpdateError> for WebmixerError {
    fn from(e: UpdateError) -> Self {
        WebmixerError::Update(e)
    }
}

impl From<std::io::Error> for WebmixerError {
    fn from(e: std::io::Error) -> Self {
        WebmixerError::Io(e)
    }
}

/// Crate-level Result alias using [`WebmixerError`].
pub type Result<T> = std::result::Result<T, WebmixerError>;
