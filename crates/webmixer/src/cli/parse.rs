//! `parse` subcommand — decode saved `amixer scontents` output offline.

use std::path::Path;

use super::{ParseOutput, Result, WebmixerError, format_control, parser, print_json};

pub(super) fn cmd_parse(file: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| WebmixerError::Config(format!("cannot read {}: {e}", file.display())))?;
    let report = parser::parse(&text);

    if json {
        return print_json(&ParseOutput::from(report));
    }

    println!("{} ({} controls)", file.display(), report.controls.len());
    for c in &report.controls {
        println!("  {}", format_control(c));
    }
    if !report.diagnostics.is_empty() {
        println!();
        println!("Skipped:");
        for d in &report.diagnostics {
            println!("  {d}");
        }
    }
    Ok(())
}
