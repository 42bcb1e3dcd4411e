//! Inflow and angle-of-attack trajectories for dynamic stall simulations.
//!
//! A trajectory is a read-only function of time returning the instantaneous
//! inflow velocity, the geometric and three-quarter-chord angles of attack,
//! and their rates. Models never own the trajectory state; they sample it.
//!
//! Provided trajectories:
//! - constant inflow and incidence
//! - smoothed step in incidence
//! - harmonic pitching oscillation
//! - piecewise-linear trajectory interpolated from samples

pub mod constant;
pub mod error;
pub mod harmonic;
pub mod sample;
pub mod sampled;
pub mod step;
pub mod trajectory;

pub use constant::ConstantInflow;
pub use error::{InputError, InputResult};
pub use harmonic::HarmonicInflow;
pub use sample::InflowSample;
pub use sampled::SampledInflow;
pub use step::StepInflow;
pub use trajectory::InflowTrajectory;
