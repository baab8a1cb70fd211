//! Harness error taxonomy.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to spawn scenario command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("unknown finding name `{0}`")]
    UnknownFinding(String),
    #[error("log write failed: {0}")]
    Log(#[from] io::Error),
    #[error("log serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
