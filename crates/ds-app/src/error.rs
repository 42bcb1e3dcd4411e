//! Error types for the ds-app service layer.

use std::path::PathBuf;

/// Application error wrapping the backend crates' errors as messages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Scenario compilation failed: {message}")]
    Compile { message: String },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ds-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ds_project::ProjectError> for AppError {
    fn from(err: ds_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<ds_project::ValidationError> for AppError {
    fn from(err: ds_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<ds_aero::AeroError> for AppError {
    fn from(err: ds_aero::AeroError) -> Self {
        AppError::Compile {
            message: format!("airfoil: {err}"),
        }
    }
}

impl From<ds_inputs::InputError> for AppError {
    fn from(err: ds_inputs::InputError) -> Self {
        AppError::Compile {
            message: format!("inflow: {err}"),
        }
    }
}

impl From<ds_models::ModelError> for AppError {
    fn from(err: ds_models::ModelError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<ds_sim::SimError> for AppError {
    fn from(err: ds_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
