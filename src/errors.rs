use std::io;

use thiserror::Error;

/// Error type for log parsing, consistency, and validation failures.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A selected log line is not a valid single-entry record.
    #[error("log line is not a single-entry record ({reason}): {line:?}")]
    RecordSyntax {
        /// The offending log line, verbatim.
        line: String,
        /// What the parser choked on.
        reason: String,
    },
    /// The simulation produced structurally inconsistent output. Fatal; a
    /// broken run must not be validated further.
    #[error("inconsistent simulation output: {0}")]
    Consistency(String),
    /// A computed value does not match its reference or expectation.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Missing or malformed experiment configuration.
    #[error("configuration error: {0}")]
    Config(String),
    /// Underlying filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Malformed JSON in a forcing-description or reference checksum file.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
