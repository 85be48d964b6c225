//! Mixer facade — binds one [`MixerSource`] to the read and write paths.
//!
//! Read: `contents()` → [`parser::parse`]. Write: [`UpdateRequest`] →
//! [`update::synthesize`] → `set()` per command. Nothing is cached between
//! calls, and nothing serializes concurrent writers: two updates to the same
//! control may interleave, and the card ends up in whichever state the last
//! executed command left it.

use crate::amixer::MixerSource;
use crate::control::Control;
use crate::parser::{self, ParseReport};
use crate::update::{self, SetCommand, UpdateRequest};

pub struct Mixer<S: MixerSource> {
    source: S,
}

impl<S: MixerSource> Mixer<S> {
    pub fn new(source: S) -> Self {
        Mixer { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Read and parse the card's controls, keeping diagnostics.
    pub fn read(&self) -> crate::error::Result<ParseReport> {
        let text = self.source.contents()?;
        Ok(parser::parse(&text))
    }

    /// Read and parse the card's controls, logging diagnostics.
    pub fn controls(&self) -> crate::error::Result<Vec<Control>> {
        Ok(self.read()?.into_controls())
    }

    /// Synthesize and run the commands for `request`, in order.
    ///
    /// Stops at the first failing command; earlier commands are not rolled
    /// back. Returns the commands that ran.
    pub fn apply(&self, name: &str, request: &UpdateRequest) -> crate::error::Result<Vec<SetCommand>> {
        let commands = update::synthesize_request(name, request);
        if commands.is_empty() {
            log::debug!("empty update for '{name}', nothing to do");
        }
        for command in &commands {
            log::info!("{command}");
            self.source.set(command)?;
        }
        Ok(commands)
    }

    /// Like [`apply`](Self::apply), but first checks the request against the
    /// control's current type, options and level range.
    pub fn apply_checked(
        &self,
        name: &str,
        request: &UpdateRequest,
    ) -> crate::error::Result<Vec<SetCommand>> {
        let controls = self.controls()?;
        update::check(name, &request.actions(), &controls)?;
        self.apply(name, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WebmixerError;
    use crate::amixer::mock::MockMixer;
    use crate::update::{RequestedValue, UpdateError};

    const TEXT: &str = "Simple mixer control 'Master',0\n\
                        \x20 Limits: Playback 0 - 87\n\
                        \x20 Mono: Playback 60 [69%] [-20.25dB] [on]\n\
                        Simple mixer control 'Input Source',0\n\
                        \x20 Items: 'Mic' 'Line'\n\
                        \x20 Item0: 'Mic'\n";

    fn level(n: i64) -> UpdateRequest {
        UpdateRequest {
            value: Some(RequestedValue::Level(n)),
            is_muted: None,
        }
    }

    #[test]
    fn controls_reads_fresh_each_time() {
        let mixer = Mixer::new(MockMixer::new(TEXT));
        assert_eq!(mixer.controls().unwrap().len(), 2);

        if let Ok(mut text) = mixer.source().text.lock() {
            text.clear();
        }
        assert!(mixer.controls().unwrap().is_empty());
    }

    #[test]
    fn read_failure_is_surfaced() {
        let mock = MockMixer::new(TEXT);
        mock.set_fail_contents(true);
        let mixer = Mixer::new(mock);
        assert!(matches!(mixer.read(), Err(WebmixerError::Mixer(_))));
    }

    #[test]
    fn apply_runs_value_then_mute() {
        let mixer = Mixer::new(MockMixer::new(TEXT));
        let request = UpdateRequest {
            value: Some(RequestedValue::Level(30)),
            is_muted: Some(true),
        };
        let ran = mixer.apply("Master", &request).unwrap();
        assert_eq!(ran.len(), 2);
        assert_eq!(mixer.source().tokens(), vec!["30%", "mute"]);
    }

    #[test]
    fn apply_empty_request_runs_nothing() {
        let mixer = Mixer::new(MockMixer::new(TEXT));
        assert!(mixer.apply("Master", &UpdateRequest::default()).unwrap().is_empty());
        assert!(mixer.source().recorded().is_empty());
    }

    #[test]
    fn apply_stops_at_first_failure() {
        let mock = MockMixer::new(TEXT);
        mock.fail_on_token("30%");
        let mixer = Mixer::new(mock);
        let request = UpdateRequest {
            value: Some(RequestedValue::Level(30)),
            is_muted: Some(true),
        };
        assert!(mixer.apply("Master", &request).is_err());
        assert!(mixer.source().recorded().is_empty());
    }

    #[test]
    fn apply_does_not_validate() {
        let mixer = Mixer::new(MockMixer::new(TEXT));
        mixer.apply("No Such Control", &level(500)).unwrap();
        assert_eq!(mixer.source().tokens(), vec!["500%"]);
    }

    #[test]
    fn apply_checked_rejects_before_running() {
        let mixer = Mixer::new(MockMixer::new(TEXT));
        let err = mixer.apply_checked("Master", &level(500)).unwrap_err();
        assert!(matches!(
            err,
            WebmixerError::Update(UpdateError::LevelOutOfRange { level: 500, .. })
        ));
        assert!(mixer.source().recorded().is_empty());
    }

    #[test]
    fn apply_checked_runs_valid_request() {
        let mixer = Mixer::new(MockMixer::new(TEXT));
        let request = UpdateRequest {
            value: Some(RequestedValue::Option("Line".into())),
            is_muted: None,
        };
        mixer.apply_checked("Input Source", &request).unwrap();
        assert_eq!(mixer.source().tokens(), vec!["Line"]);
    }
}
