//! Replay errors.

use pinboard_core::GestureError;
use thiserror::Error;

/// Errors raised while loading or replaying a script.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unknown item: {0}")]
    UnknownItem(String),
    #[error(transparent)]
    Gesture(#[from] GestureError),
}

impl From<serde_json::Error> for ReplayError {
    fn from(err: serde_json::Error) -> Self {
        ReplayError::Parse(err.to_string())
    }
}

/// Result type for replay operations.
pub type ReplayResult<T> = Result<T, ReplayError>;
