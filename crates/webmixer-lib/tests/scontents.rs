//! Integration tests: full read/write cycles through `Mixer` and `MockMixer`.
//!
//! The fixture is `amixer -c 0 scontents` output from an HDA codec, trimmed
//! to one control of each shape the parser distinguishes.

use webmixer_lib::amixer::mock::MockMixer;
use webmixer_lib::control::{self, Control, ControlType, ControlValue, Icon};
use webmixer_lib::mixer::Mixer;
use webmixer_lib::parser;
use webmixer_lib::update::{RequestedValue, UpdateRequest};

const SCONTENTS: &str = include_str!("fixtures/scontents.txt");

fn controls() -> Vec<Control> {
    let report = parser::parse(SCONTENTS);
    assert!(
        report.diagnostics.is_empty(),
        "fixture should parse cleanly: {:?}",
        report.diagnostics
    );
    report.controls
}

fn find<'a>(controls: &'a [Control], name: &str) -> &'a Control {
    controls
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("control {name} missing"))
}

#[test]
fn fixture_yields_every_control_in_order() {
    let names: Vec<String> = controls().into_iter().map(|c| c.name).collect();
    assert_eq!(
        names,
        vec![
            "Master",
            "Headphone",
            "PCM",
            "Mic Boost",
            "Capture",
            "Auto-Mute Mode",
            "Input Source",
            "IEC958",
            "Loopback Mixing",
        ]
    );
}

#[test]
fn every_control_satisfies_model_invariants() {
    for c in controls() {
        assert!(control::is_valid(&c), "{} violates invariants", c.name);
        assert_eq!(c.id, c.name);
        match c.kind {
            ControlType::Enum => {
                assert!(!c.options.is_empty());
                let ControlValue::Text(ref v) = c.value else {
                    panic!("{} has a numeric value", c.name);
                };
                assert!(v.is_empty() || c.options.contains(v));
            }
            ControlType::Bool => {
                assert_eq!((c.min, c.max), (Some(0), Some(1)), "{}", c.name);
                assert!(c.options.is_empty());
            }
            ControlType::Int => assert!(c.options.is_empty()),
        }
    }
}

#[test]
fn fixture_types_and_values() {
    let cs = controls();

    let master = find(&cs, "Master");
    assert_eq!(master.kind, ControlType::Int);
    assert_eq!(master.value, ControlValue::Level(69));
    assert_eq!((master.min, master.max), (Some(0), Some(100)));
    assert!(!master.is_muted);

    let headphone = find(&cs, "Headphone");
    assert!(headphone.is_muted);
    assert_eq!(headphone.icon, Icon::Headphone);

    assert_eq!(find(&cs, "PCM").icon, Icon::Chip);
    assert_eq!(find(&cs, "Mic Boost").value, ControlValue::Level(33));
    assert_eq!(find(&cs, "Capture").icon, Icon::Mic);

    let source = find(&cs, "Input Source");
    assert_eq!(source.kind, ControlType::Enum);
    assert_eq!(source.options, vec!["Mic", "Line", "CD"]);
    assert_eq!(source.value, ControlValue::Text("Mic".into()));

    let iec = find(&cs, "IEC958");
    assert_eq!(iec.kind, ControlType::Bool);
    assert_eq!(iec.value, ControlValue::Level(0));

    let loopback = find(&cs, "Loopback Mixing");
    assert_eq!(loopback.kind, ControlType::Bool);
    assert_eq!(loopback.value, ControlValue::Level(1));
}

#[test]
fn serialized_list_matches_api_shape() {
    let json = serde_json::to_value(controls()).unwrap();
    let master = &json[0];
    assert_eq!(master["id"], "Master");
    assert_eq!(master["type"], "INT");
    assert_eq!(master["isMuted"], false);
    assert_eq!(master["icon"], "speaker");

    let source = &json[6];
    assert_eq!(source["type"], "ENUM");
    assert_eq!(source["options"][1], "Line");
    assert!(source.get("min").is_none());
}

#[test]
fn malformed_block_in_the_middle_does_not_lose_neighbours() {
    let text = SCONTENTS.replacen(
        "Simple mixer control 'PCM',0",
        "Simple mixer control 'PCM0",
        1,
    );
    let report = parser::parse(&text);
    assert_eq!(report.controls.len(), 8);
    assert_eq!(report.diagnostics.len(), 1);
    assert!(report.controls.iter().all(|c| c.name != "PCM"));
}

#[test]
fn read_then_write_round_trip() {
    let mixer = Mixer::new(MockMixer::new(SCONTENTS));
    let cs = mixer.controls().unwrap();
    assert_eq!(cs.len(), 9);

    mixer
        .apply(
            "Input Source",
            &UpdateRequest {
                value: Some(RequestedValue::Option("Line".into())),
                is_muted: None,
            },
        )
        .unwrap();
    mixer
        .apply(
            "Headphone",
            &UpdateRequest {
                value: Some(RequestedValue::Level(40)),
                is_muted: Some(false),
            },
        )
        .unwrap();

    let recorded = mixer.source().recorded();
    let pairs: Vec<(&str, &str)> = recorded
        .iter()
        .map(|c| (c.control.as_str(), c.token.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Input Source", "Line"),
            ("Headphone", "40%"),
            ("Headphone", "unmute"),
        ]
    );
}

#[test]
fn repeated_reads_are_identical() {
    let mixer = Mixer::new(MockMixer::new(SCONTENTS));
    assert_eq!(mixer.controls().unwrap(), mixer.controls().unwrap());
}
