//! Error types for the extraction pipeline

use thiserror::Error;

/// Errors that can occur while driving the pipeline
///
/// Per-stage failure (retry exhaustion, model refusal) is not an error at this
/// level; the orchestrator reports it through `StageOutcome::Failed` so a
/// failed document never aborts the batch.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Input text exceeds the configured maximum
    #[error("input too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Model output was not parseable JSON
    #[error("invalid output format: {0}")]
    InvalidFormat(String),

    /// Filesystem error while persisting stage output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Background task failed to complete
    #[error("task join error: {0}")]
    Join(String),

    /// Pipeline reached a state it should not be able to reach
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::InvalidFormat(e.to_string())
    }
}
