//! Instantaneous inflow sample.

use serde::{Deserialize, Serialize};

/// Inflow conditions at one instant. Angles in radians, rates per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InflowSample {
    /// Inflow velocity (m/s)
    pub u: f64,
    /// Rate of change of the inflow velocity (m/s²)
    pub u_dot: f64,
    /// Geometric angle of attack
    pub alpha: f64,
    /// Pitch rate
    pub alpha_dot: f64,
    /// Angle of attack at the three-quarter-chord point
    pub alpha_34: f64,
    /// Rate of the three-quarter-chord angle
    pub alpha_34_dot: f64,
}

impl InflowSample {
    /// Sample where the three-quarter-chord angle coincides with the geometric angle.
    pub fn new(u: f64, u_dot: f64, alpha: f64, alpha_dot: f64) -> Self {
        Self {
            u,
            u_dot,
            alpha,
            alpha_dot,
            alpha_34: alpha,
            alpha_34_dot: alpha_dot,
        }
    }
}
