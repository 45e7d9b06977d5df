//! Shipped scenario files must load, validate, and run deterministically.

use std::path::PathBuf;

use drift_headless::{RunConfig, Runner, Scenario};

fn scenarios_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios")
}

#[test]
fn intercept_scenario_loads_and_validates() {
    let scenario = Scenario::load(scenarios_dir().join("intercept.ron")).unwrap();
    assert_eq!(scenario.name, "intercept");
    assert_eq!(scenario.entities.len(), 3);
    assert_eq!(scenario.feed.len(), 4);
}

#[test]
fn intercept_scenario_runs_to_completion() {
    let scenario = Scenario::load(scenarios_dir().join("intercept.ron")).unwrap();
    let metrics = Runner::new(scenario, RunConfig::default()).run().unwrap();

    // 3000 ms at 16 ms cadence, last tick at 2992.
    assert_eq!(metrics.ticks, 187);
    assert_eq!(metrics.snapshots_applied, 1);
    assert_eq!(metrics.updates_dropped, 1);
    assert_eq!(metrics.entities_removed, 1);
    assert_eq!(metrics.undelivered_events, 0);
    assert!(metrics.all_within_speed_limit());
}

#[test]
fn intercept_scenario_is_reproducible() {
    let load = || Scenario::load(scenarios_dir().join("intercept.ron")).unwrap();
    let a = Runner::new(load(), RunConfig::default()).run().unwrap();
    let b = Runner::new(load(), RunConfig::default()).run().unwrap();
    assert_eq!(a.final_state_hash, b.final_state_hash);
}
