//! Core trait for inflow trajectories.

use crate::sample::InflowSample;
use std::sync::Arc;

/// Time-indexed inflow conditions.
///
/// Implementations are pure functions of time defined for any finite `t`.
/// Constant, interpolated and analytic trajectories are interchangeable behind
/// this trait.
pub trait InflowTrajectory: Send + Sync {
    /// Inflow conditions at time `t` (s).
    fn sample(&self, t: f64) -> InflowSample;
}

impl<T: InflowTrajectory + ?Sized> InflowTrajectory for &T {
    fn sample(&self, t: f64) -> InflowSample {
        (**self).sample(t)
    }
}

impl<T: InflowTrajectory + ?Sized> InflowTrajectory for Box<T> {
    fn sample(&self, t: f64) -> InflowSample {
        (**self).sample(t)
    }
}

impl<T: InflowTrajectory + ?Sized> InflowTrajectory for Arc<T> {
    fn sample(&self, t: f64) -> InflowSample {
        (**self).sample(t)
    }
}
