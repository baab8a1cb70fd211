//! Runner integration tests against real child processes.

#![cfg(unix)]

use shadowrace_harness::HarnessError;
use shadowrace_harness::runner::{self, Expected};

fn sh(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}

#[test]
fn clean_scenario_passes_with_no_expectations() {
    let report = runner::run_scenario("sh", &sh("echo all quiet"), Expected::default())
        .expect("sh is available");
    assert!(report.passed);
    assert_eq!(report.exit_code, Some(0));
    assert!(report.output.contains("all quiet"));
}

#[test]
fn stderr_markers_are_scanned_from_combined_output() {
    let script = "echo '=== shadowrace: shadow thread did not recover as it should have' >&2";
    let expected = Expected {
        did_not_recover: true,
        ..Expected::default()
    };
    let report = runner::run_scenario("sh", &sh(script), expected).expect("sh is available");
    assert!(report.observed.did_not_recover);
    assert!(report.passed);
}

#[test]
fn unexpected_findings_fail_the_run() {
    let script = "echo 'WARNING: DATA RACE'";
    let report =
        runner::run_scenario("sh", &sh(script), Expected::default()).expect("sh is available");
    assert!(report.observed.data_race);
    assert!(!report.passed);
}

#[test]
fn missing_expected_finding_fails_the_run() {
    let expected = Expected {
        payload_mismatch: true,
        ..Expected::default()
    };
    let report =
        runner::run_scenario("sh", &sh("echo nothing here"), expected).expect("sh is available");
    assert!(!report.passed);
}

#[test]
fn unspawnable_scenario_is_a_spawn_error() {
    let err = runner::run_scenario(
        "/nonexistent/shadowrace-scenario",
        &[],
        Expected::default(),
    )
    .unwrap_err();
    assert!(matches!(err, HarnessError::Spawn { .. }));
}
