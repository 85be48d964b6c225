//! `set` subcommand — apply one update request to a control.

use super::{Config, Result, SetOutput, UpdateRequest, ensure_valid, mixer_for, print_json};

pub(super) fn cmd_set(config: &Config, name: &str, request: &UpdateRequest, json: bool) -> Result<()> {
    ensure_valid(config)?;
    if request.is_empty() {
        log::warn!("nothing to change for '{name}' (pass --value, --mute or --unmute)");
    }

    let mixer = mixer_for(config);
    let commands = if config.strict_updates {
        mixer.apply_checked(name, request)?
    } else {
        mixer.apply(name, request)?
    };

    if json {
        return print_json(&SetOutput {
            status: "success",
            commands,
        });
    }
    for command in &commands {
        println!("{command}");
    }
    Ok(())
}
