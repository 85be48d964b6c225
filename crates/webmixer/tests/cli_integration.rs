//! Integration tests for the `webmixer` binary.
//!
//! These tests exercise the CLI binary via `assert_cmd`. Commands that need
//! a sound card point `--amixer` at a stand-in program instead.

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

const SCONTENTS: &str = "\
Simple mixer control 'Master',0
  Capabilities: pvolume pvolume-joined pswitch pswitch-joined
  Playback channels: Mono
  Limits: Playback 0 - 87
  Mono: Playback 60 [69%] [-20.25dB] [on]
Simple mixer control 'Input Source',0
  Capabilities: cenum
  Items: 'Mic' 'Line' 'CD'
  Item0: 'Line'
Simple mixer control 'broken
";

fn cli() -> assert_cmd::Command {
    cargo_bin_cmd!("webmixer")
}

fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn cli_help_succeeds() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("webmixer"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn cli_version_prints_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_serve_help_lists_overrides() {
    cli()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bind"))
        .stdout(predicate::str::contains("--port"));
}

// ── config ──

#[test]
fn cli_config_json_produces_valid_json() {
    let output = cli()
        .args(["--json", "config"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("config --json should produce valid JSON");
    assert!(
        json["settings"].is_object(),
        "JSON output should contain 'settings' object"
    );
    assert!(
        json["config_file"].is_string() || json["config_file"].is_null(),
        "config_file should be string or null"
    );
}

#[test]
fn cli_config_reads_custom_file_and_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "config.toml", "card_index = 2\nport = 8080\n");

    let output = cli()
        .args(["--json", "--amixer", "/opt/amixer", "config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["config_file_exists"], true);
    assert_eq!(json["settings"]["card_index"], 2);
    assert_eq!(json["settings"]["port"], 8080);
    assert_eq!(json["settings"]["amixer_path"], "/opt/amixer");
    assert_eq!(json["problems"].as_array().unwrap().len(), 0);
}

#[test]
fn cli_config_reports_problems() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "config.toml", "bind_address = \"nowhere\"\n");

    cli()
        .arg("config")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Problems:"))
        .stdout(predicate::str::contains("Invalid bind address: nowhere"));
}

#[test]
fn cli_config_write_creates_loadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    cli()
        .args(["--card", "2", "--amixer", "/usr/bin/amixer", "config", "--write", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(written)"));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("# webmixer configuration"));

    let output = cli()
        .args(["--json", "config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["config_file_exists"], true);
    assert_eq!(json["written"], false);
    assert_eq!(json["settings"]["card_index"], 2);
    assert_eq!(json["settings"]["amixer_path"], "/usr/bin/amixer");
}

// ── --verbose flag ──

#[test]
fn cli_verbose_flag_accepted() {
    cli().args(["-v", "config"]).assert().success();
}

#[test]
fn cli_verbose_long_flag_accepted() {
    cli().args(["--verbose", "config"]).assert().success();
}

// ── parse ──

#[test]
fn cli_parse_lists_controls_and_skips() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "scontents.txt", SCONTENTS);

    cli()
        .arg("parse")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(2 controls)"))
        .stdout(predicate::str::contains("Input Source"))
        .stdout(predicate::str::contains("Skipped:"));
}

#[test]
fn cli_parse_json_matches_api_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "scontents.txt", SCONTENTS);

    let output = cli()
        .args(["--json", "parse"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["count"], 2);
    assert_eq!(json["controls"][0]["id"], "Master");
    assert_eq!(json["controls"][0]["isMuted"], false);
    assert_eq!(json["controls"][1]["value"], "Line");
    assert_eq!(json["diagnostics"].as_array().unwrap().len(), 1);
}

#[test]
fn cli_parse_missing_file_fails() {
    cli()
        .args(["parse", "/nonexistent/scontents.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ── controls / set ──

#[test]
fn cli_controls_missing_amixer_fails() {
    cli()
        .args(["controls", "--amixer", "/nonexistent/amixer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn cli_set_rejects_mute_and_unmute_together() {
    cli()
        .args(["set", "Master", "--mute", "--unmute"])
        .assert()
        .failure();
}

#[cfg(unix)]
#[test]
fn cli_controls_with_empty_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_temp(&dir, "config.toml", "");

    cli()
        .args(["controls", "--amixer", "true", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No controls found on card 0."));
}

#[cfg(unix)]
#[test]
fn cli_set_prints_commands() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_temp(&dir, "config.toml", "");

    cli()
        .args(["set", "Master", "--value", "40", "--mute", "--amixer", "true", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("sset 'Master' '40%'"))
        .stdout(predicate::str::contains("sset 'Master' 'mute'"));
}

#[cfg(unix)]
#[test]
fn cli_set_strict_rejects_unknown_control() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_temp(&dir, "config.toml", "strict_updates = true\n");

    cli()
        .args(["set", "Master", "--value", "40", "--amixer", "true", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown control: Master"));
}
