//! TransientModel trait for pluggable dynamic systems.

use crate::error::SimResult;
use nalgebra::SVector;

/// Arithmetic the integrators need from a state.
pub trait OdeState: Clone {
    /// `self + a * x`.
    fn add_scaled(&self, a: f64, x: &Self) -> Self;

    /// `a * self`.
    fn scale(&self, a: f64) -> Self;

    /// Root-mean-square of `err` weighted by `atol + rtol * max(|y0|, |y1|)`.
    fn error_norm(err: &Self, y0: &Self, y1: &Self, atol: f64, rtol: f64) -> f64;

    /// Whether every component is finite.
    fn is_finite(&self) -> bool;
}

impl OdeState for f64 {
    fn add_scaled(&self, a: f64, x: &Self) -> Self {
        self + a * x
    }

    fn scale(&self, a: f64) -> Self {
        a * self
    }

    fn error_norm(err: &Self, y0: &Self, y1: &Self, atol: f64, rtol: f64) -> f64 {
        (err / (atol + rtol * y0.abs().max(y1.abs()))).abs()
    }

    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

impl<const N: usize> OdeState for SVector<f64, N> {
    fn add_scaled(&self, a: f64, x: &Self) -> Self {
        self + x * a
    }

    fn scale(&self, a: f64) -> Self {
        self * a
    }

    fn error_norm(err: &Self, y0: &Self, y1: &Self, atol: f64, rtol: f64) -> f64 {
        if N == 0 {
            return 0.0;
        }
        let sum: f64 = err
            .iter()
            .zip(y0.iter().zip(y1.iter()))
            .map(|(e, (a, b))| {
                let w = e / (atol + rtol * a.abs().max(b.abs()));
                w * w
            })
            .sum();
        (sum / N as f64).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|v| v.is_finite())
    }
}

/// Trait for transient (dynamic) system models.
///
/// A TransientModel provides:
/// - State type with integrator arithmetic
/// - Initial state at the start time
/// - RHS (right-hand side) computation: x_dot = f(t, x)
///
/// `rhs` must be a pure function of its arguments; the driver may call it at
/// any time in any order while searching for an acceptable step.
pub trait TransientModel {
    /// State type.
    type State: OdeState;

    /// Return the initial state at `t0`.
    fn initial_state(&self, t0: f64) -> Self::State;

    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&self, t: f64, x: &Self::State) -> SimResult<Self::State>;
}
