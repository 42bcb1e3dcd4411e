//! Time integration driver for dynamic stall models.
//!
//! Provides:
//! - `TransientModel` trait for pluggable state-space systems
//! - `OdeState` arithmetic for scalar and fixed-size vector states
//! - adaptive Dormand–Prince 5(4) integrator with error control
//! - fixed-step RK4 and forward Euler integrators
//! - `run_sim` integrating onto an explicit output time grid

pub mod error;
pub mod grid;
pub mod integrator;
pub mod model;
pub mod sim;

pub use error::{SimError, SimResult};
pub use grid::{arange, linspace};
pub use integrator::{DormandPrince45, ForwardEuler, Integrator, RK4, TrialStep};
pub use model::{OdeState, TransientModel};
pub use sim::{IntegratorType, SimOptions, SimRecord, SimStats, run_sim, run_sim_from};
