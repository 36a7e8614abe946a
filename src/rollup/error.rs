//! Rollup server error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Transport or protocol failure talking to the rollup server.
#[derive(Debug, Clone, Display, Error)]
#[display("Rollup error: {} at {}:{}", message, file, line)]
pub struct RollupError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RollupError {
    /// Creates a new rollup error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for RollupError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("HTTP error: {}", err))
    }
}
