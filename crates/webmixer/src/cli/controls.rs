//! `controls` subcommand — read the card and list its controls.

use super::{Config, Result, ensure_valid, format_control, mixer_for, print_json};

pub(super) fn cmd_controls(config: &Config, json: bool) -> Result<()> {
    ensure_valid(config)?;
    let mixer = mixer_for(config);
    let card = mixer.source().card();
    let controls = mixer.controls()?;

    if json {
        return print_json(&controls);
    }

    if controls.is_empty() {
        println!("No controls found on card {card}.");
        return Ok(());
    }
    println!("Card {card} ({} controls):", controls.len());
    for c in &controls {
        println!("  {}", format_control(c));
    }
    Ok(())
}
