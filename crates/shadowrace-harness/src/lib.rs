//! # shadowrace-harness
//!
//! Out-of-process verification for replay scenarios.
//!
//! A scenario is a binary that exercises the shadowrace engine; the runner
//! spawns it, captures its combined output, scans for the detector banner
//! and the engine's diagnostic markers, and compares what it saw against
//! what the scenario is expected to produce. Results can be appended to a
//! JSONL log with an integrity digest of the captured output.

pub mod error;
pub mod runner;
pub mod structured_log;

pub use error::HarnessError;
