//! webmixer — typed access to ALSA simple mixer controls through `amixer`.

pub mod amixer;
pub mod config;
pub mod control;
pub mod error;
pub mod mixer;
pub mod parser;
pub mod update;

pub use error::WebmixerError;
