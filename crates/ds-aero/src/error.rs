//! Error types for closure construction.

use ds_core::CoreError;
use thiserror::Error;

/// Errors encountered while building a closure provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AeroError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Polar table error: {what}")]
    Table { what: String },

    #[error("No zero-lift crossing found in polar")]
    NoZeroLift,

    #[error("Numeric error: {0}")]
    Numeric(#[from] CoreError),
}

pub type AeroResult<T> = Result<T, AeroError>;
