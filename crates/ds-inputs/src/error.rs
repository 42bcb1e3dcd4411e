//! Error types for trajectory construction.

use ds_core::CoreError;
use thiserror::Error;

/// Result type for trajectory construction.
pub type InputResult<T> = Result<T, InputError>;

/// Errors that can occur while building a trajectory.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    /// Invalid argument provided to a constructor.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Sample vectors have inconsistent lengths.
    #[error("Sample length mismatch: {what} (expected {expected}, got {got})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Underlying numeric check failed.
    #[error("Numeric error: {0}")]
    Numeric(#[from] CoreError),
}
