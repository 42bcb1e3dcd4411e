//! ds-models: state-space dynamic stall models.
//!
//! Contains:
//! - `DynamicStallModel`, the interface shared by every model
//! - `MhhModel`, the 4-state Hansen-Gaunaa-Madsen model
//! - `OyeModel`, the 1-state Øye separation-lag model
//! - `simulate` / `sweep` drivers recomputing outputs on the output grid
//! - Wagner reference curves for step responses

pub mod error;
pub mod mhh;
pub mod model;
pub mod oye;
pub mod simulate;
pub mod wagner;

pub use error::{ModelError, ModelResult};
pub use mhh::{AddedMass, MhhModel, MhhParams, MhhState, ZeroInflowPolicy};
pub use model::{DynamicStallModel, StallCoefficients};
pub use oye::{OyeModel, OyeParams, OyeState};
pub use simulate::{StallHistory, simulate, simulate_from, sweep};
