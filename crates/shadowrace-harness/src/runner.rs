//! Scenario execution and output scanning.

use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// ThreadSanitizer's own report banner.
pub const DATA_RACE_MARKER: &str = "WARNING: DATA RACE";
/// Engine diagnostic markers, matching shadowrace-core's report lines.
pub const DID_NOT_PANIC_MARKER: &str = "shadow thread did not panic";
pub const DID_NOT_RECOVER_MARKER: &str = "shadow thread did not recover";
pub const RECOVERED_MULTIPLE_MARKER: &str = "shadow thread recovered multiple times";
pub const PAYLOAD_MISMATCH_MARKER: &str = "shadow thread panicked with different payload";

/// Findings a scenario is expected to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expected {
    pub data_race: bool,
    pub did_not_panic: bool,
    pub did_not_recover: bool,
    pub recovered_multiple: bool,
    pub payload_mismatch: bool,
}

impl Expected {
    /// Builds an expectation set from CLI names like `data-race`.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, HarnessError> {
        let mut expected = Self::default();
        for name in names {
            match name.as_ref() {
                "data-race" => expected.data_race = true,
                "did-not-panic" => expected.did_not_panic = true,
                "did-not-recover" => expected.did_not_recover = true,
                "recovered-multiple" => expected.recovered_multiple = true,
                "payload-mismatch" => expected.payload_mismatch = true,
                other => return Err(HarnessError::UnknownFinding(other.to_string())),
            }
        }
        Ok(expected)
    }
}

/// Findings observed in a scenario's combined output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observed {
    pub data_race: bool,
    pub did_not_panic: bool,
    pub did_not_recover: bool,
    pub recovered_multiple: bool,
    pub payload_mismatch: bool,
}

impl Observed {
    pub fn from_output(output: &str) -> Self {
        Self {
            data_race: output.contains(DATA_RACE_MARKER),
            did_not_panic: output.contains(DID_NOT_PANIC_MARKER),
            did_not_recover: output.contains(DID_NOT_RECOVER_MARKER),
            recovered_multiple: output.contains(RECOVERED_MULTIPLE_MARKER),
            payload_mismatch: output.contains(PAYLOAD_MISMATCH_MARKER),
        }
    }

    /// Exact match: an unexpected finding fails the run just as a missing
    /// expected one does.
    pub fn matches(&self, expected: Expected) -> bool {
        self.data_race == expected.data_race
            && self.did_not_panic == expected.did_not_panic
            && self.did_not_recover == expected.did_not_recover
            && self.recovered_multiple == expected.recovered_multiple
            && self.payload_mismatch == expected.payload_mismatch
    }
}

/// Outcome of one scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub scenario: String,
    pub exit_code: Option<i32>,
    pub expected: Expected,
    pub observed: Observed,
    pub passed: bool,
    pub output: String,
}

/// Spawns `program args...`, captures combined stdout+stderr, and checks the
/// observed findings against `expected`.
pub fn run_scenario(
    program: &str,
    args: &[String],
    expected: Expected,
) -> Result<RunReport, HarnessError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| HarnessError::Spawn {
            command: program.to_string(),
            source,
        })?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    let observed = Observed::from_output(&text);

    Ok(RunReport {
        scenario: program.to_string(),
        exit_code: output.status.code(),
        expected,
        observed,
        passed: observed.matches(expected),
        output: text,
    })
}
