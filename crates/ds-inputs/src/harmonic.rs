//! Harmonic pitching oscillation at constant inflow.

use crate::error::{InputError, InputResult};
use crate::sample::InflowSample;
use crate::trajectory::InflowTrajectory;
use serde::{Deserialize, Serialize};

/// Sinusoidal incidence `α = mean + amplitude · sin(ω t + phase)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HarmonicFields")]
pub struct HarmonicInflow {
    /// Inflow velocity (m/s)
    pub u: f64,
    /// Mean incidence (rad)
    pub mean: f64,
    /// Oscillation amplitude (rad)
    pub amplitude: f64,
    /// Angular frequency (rad/s)
    pub omega: f64,
    /// Phase offset (rad)
    pub phase: f64,
}

#[derive(Deserialize)]
struct HarmonicFields {
    u: f64,
    mean: f64,
    amplitude: f64,
    omega: f64,
    phase: f64,
}

impl TryFrom<HarmonicFields> for HarmonicInflow {
    type Error = InputError;

    fn try_from(f: HarmonicFields) -> InputResult<Self> {
        Self::new(f.u, f.mean, f.amplitude, f.omega, f.phase)
    }
}

impl HarmonicInflow {
    /// Create a harmonic trajectory.
    ///
    /// # Errors
    /// Returns an error if a value is non-finite or `omega` is negative.
    pub fn new(u: f64, mean: f64, amplitude: f64, omega: f64, phase: f64) -> InputResult<Self> {
        for (v, what) in [
            (u, "u"),
            (mean, "mean"),
            (amplitude, "amplitude"),
            (omega, "omega"),
            (phase, "phase"),
        ] {
            ds_core::ensure_finite(v, what)?;
        }
        if omega < 0.0 {
            return Err(InputError::InvalidArg {
                what: "omega must be non-negative",
            });
        }
        Ok(Self {
            u,
            mean,
            amplitude,
            omega,
            phase,
        })
    }

    /// Oscillation with reduced frequency `k = ω c / (2U)`.
    pub fn from_reduced_frequency(
        k: f64,
        chord: f64,
        u: f64,
        mean: f64,
        amplitude: f64,
    ) -> InputResult<Self> {
        if !(chord > 0.0) || !(u > 0.0) {
            return Err(InputError::InvalidArg {
                what: "chord and velocity must be positive",
            });
        }
        Self::new(u, mean, amplitude, 2.0 * u * k / chord, 0.0)
    }

    /// Oscillation period (s); infinite for a frozen oscillation.
    pub fn period(&self) -> f64 {
        if self.omega == 0.0 {
            f64::INFINITY
        } else {
            2.0 * std::f64::consts::PI / self.omega
        }
    }
}

impl InflowTrajectory for HarmonicInflow {
    fn sample(&self, t: f64) -> InflowSample {
        let phi = self.omega * t + self.phase;
        let alpha = self.mean + self.amplitude * phi.sin();
        let alpha_dot = self.amplitude * self.omega * phi.cos();
        InflowSample::new(self.u, 0.0, alpha, alpha_dot)
    }
}
