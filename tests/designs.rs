//! Loads the bundled designs from disk and drives them end to end.

use std::path::PathBuf;
use ternuino::{load_design, save_design, Simulator, Trit};

fn design(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("designs").join(name)
}

#[test]
fn inverter_design_end_to_end() {
    let mut sim = Simulator::new(load_design(design("inverter.json")).unwrap());
    sim.step().unwrap();
    assert_eq!(sim.probe("p1").unwrap(), Trit::Neg);

    sim.toggle_switch("sw1").unwrap();
    sim.step().unwrap();
    assert_eq!(sim.probe("p1").unwrap(), Trit::Null);
}

#[test]
fn latch_design_holds_after_disable() {
    let mut sim = Simulator::new(load_design(design("latch.json")).unwrap());
    sim.step().unwrap();
    assert_eq!(sim.probe("p1").unwrap(), Trit::Pos);

    sim.set_switch("d", Trit::Neg).unwrap();
    sim.toggle_switch("en").unwrap();
    sim.run_limited(3).unwrap();
    assert_eq!(sim.probe("p1").unwrap(), Trit::Pos);
}

#[test]
fn deleted_gate_saves_without_wires() {
    let mut circuit = load_design(design("inverter.json")).unwrap();
    circuit.remove_component("g1").unwrap();

    let out = std::env::temp_dir().join(format!("ternuino-{}.json", std::process::id()));
    save_design(&out, &circuit).unwrap();
    let reloaded = load_design(&out).unwrap();
    let _ = std::fs::remove_file(&out);

    assert_eq!(reloaded.len(), 2);
    assert!(reloaded.wires().is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_design(design("does-not-exist.json")).unwrap_err();
    assert!(matches!(err, ternuino::DesignError::IoError(_)));
}
