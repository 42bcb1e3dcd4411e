//! Step change in angle of attack at constant inflow.

use crate::error::{InputError, InputResult};
use crate::sample::InflowSample;
use crate::trajectory::InflowTrajectory;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Step in incidence from `alpha_from` to `alpha_to`, smoothed by a cosine ramp.
///
/// ```text
/// s = (t − t_step) / rise_time,  0 ≤ s ≤ 1
/// α = α_from + Δα (1 − cos(π s)) / 2
/// α̇ = Δα π sin(π s) / (2 rise_time)
/// ```
///
/// For `t ≤ t_step` the incidence is `alpha_from`. With `rise_time = 0` the
/// step is a pure discontinuity and the reported rate is zero everywhere, so
/// rate-driven states receive no impulse from it. Integrators must not step
/// over the ramp: keep the maximum step below `rise_time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StepFields")]
pub struct StepInflow {
    /// Inflow velocity (m/s)
    pub u: f64,
    /// Incidence before the step (rad)
    pub alpha_from: f64,
    /// Incidence after the step (rad)
    pub alpha_to: f64,
    /// Start of the ramp (s)
    pub t_step: f64,
    /// Ramp duration (s)
    pub rise_time: f64,
}

#[derive(Deserialize)]
struct StepFields {
    u: f64,
    alpha_from: f64,
    alpha_to: f64,
    t_step: f64,
    rise_time: f64,
}

impl TryFrom<StepFields> for StepInflow {
    type Error = InputError;

    fn try_from(f: StepFields) -> InputResult<Self> {
        Self::new(f.u, f.alpha_from, f.alpha_to, f.t_step, f.rise_time)
    }
}

impl StepInflow {
    /// Create a smoothed step.
    ///
    /// # Errors
    /// Returns an error if a value is non-finite or `rise_time` is negative.
    pub fn new(
        u: f64,
        alpha_from: f64,
        alpha_to: f64,
        t_step: f64,
        rise_time: f64,
    ) -> InputResult<Self> {
        for (v, what) in [
            (u, "u"),
            (alpha_from, "alpha_from"),
            (alpha_to, "alpha_to"),
            (t_step, "t_step"),
            (rise_time, "rise_time"),
        ] {
            ds_core::ensure_finite(v, what)?;
        }
        if rise_time < 0.0 {
            return Err(InputError::InvalidArg {
                what: "rise_time must be non-negative",
            });
        }
        Ok(Self {
            u,
            alpha_from,
            alpha_to,
            t_step,
            rise_time,
        })
    }

    /// Time at which the incidence reaches `alpha_to`.
    pub fn t_settled(&self) -> f64 {
        self.t_step + self.rise_time
    }

    fn alpha_and_rate(&self, t: f64) -> (f64, f64) {
        let delta = self.alpha_to - self.alpha_from;
        if t <= self.t_step {
            return (self.alpha_from, 0.0);
        }
        if t >= self.t_settled() || self.rise_time == 0.0 {
            return (self.alpha_to, 0.0);
        }
        let s = (t - self.t_step) / self.rise_time;
        let alpha = self.alpha_from + 0.5 * delta * (1.0 - (PI * s).cos());
        let rate = 0.5 * delta * PI * (PI * s).sin() / self.rise_time;
        (alpha, rate)
    }
}

impl InflowTrajectory for StepInflow {
    fn sample(&self, t: f64) -> InflowSample {
        let (alpha, alpha_dot) = self.alpha_and_rate(t);
        InflowSample::new(self.u, 0.0, alpha, alpha_dot)
    }
}
