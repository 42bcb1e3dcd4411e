//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered during time integration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-finite state at t={t}")]
    NonFinite { t: f64 },

    #[error("Step size underflow at t={t} (h={h:e})")]
    StepSizeUnderflow { t: f64, h: f64 },

    #[error("Maximum number of steps ({max_steps}) exceeded at t={t}")]
    MaxStepsExceeded { max_steps: usize, t: f64 },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<ds_core::CoreError> for SimError {
    fn from(e: ds_core::CoreError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
