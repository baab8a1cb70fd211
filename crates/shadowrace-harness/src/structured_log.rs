//! Structured JSONL logging for scenario runs.
//!
//! One line per run. Each entry carries a SHA-256 digest of the captured
//! output so a log line can be tied back to the exact artifact it judged.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::HarnessError;
use crate::runner::RunReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

/// Canonical JSONL record for one scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub event: String,
    pub scenario: String,
    pub outcome: Outcome,
    pub exit_code: Option<i32>,
    pub output_sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LogEntry {
    pub fn from_report(report: &RunReport, timestamp: impl Into<String>) -> Self {
        let (level, outcome) = if report.passed {
            (LogLevel::Info, Outcome::Pass)
        } else {
            (LogLevel::Error, Outcome::Fail)
        };
        let detail = if report.passed {
            None
        } else {
            Some(format!(
                "expected {:?}, observed {:?}",
                report.expected, report.observed
            ))
        };
        Self {
            timestamp: timestamp.into(),
            level,
            event: "scenario_run".to_string(),
            scenario: report.scenario.clone(),
            outcome,
            exit_code: report.exit_code,
            output_sha256: output_digest(&report.output),
            detail,
        }
    }
}

/// Hex SHA-256 of a captured output artifact.
pub fn output_digest(output: &str) -> String {
    let digest = Sha256::digest(output.as_bytes());
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Seconds since the Unix epoch, as a string. Callers wanting deterministic
/// logs pass their own timestamp instead.
pub fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

/// Appends one entry as a JSONL line.
pub fn append_jsonl(path: &Path, entry: &LogEntry) -> Result<(), HarnessError> {
    let line = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}
