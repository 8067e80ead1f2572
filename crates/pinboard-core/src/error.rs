//! Error type for contract violations surfaced by the gesture engine.

use thiserror::Error;

/// Gesture engine errors.
///
/// Normal interaction edge cases (clicking empty space, dragging with nothing
/// selected, a singular item transform) are silent no-ops and never reach
/// this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for gesture engine operations.
pub type GestureResult<T> = Result<T, GestureError>;
