//! Error types for dynamic stall models.

use thiserror::Error;

/// Errors raised while evaluating or integrating a dynamic stall model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Zero inflow velocity at t={t} (u={u:e})")]
    ZeroInflow { t: f64, u: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Integration failed: {0}")]
    Integration(#[from] ds_sim::SimError),
}

pub type ModelResult<T> = Result<T, ModelError>;
