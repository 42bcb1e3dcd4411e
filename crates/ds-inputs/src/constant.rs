//! Constant inflow at fixed incidence.

use crate::sample::InflowSample;
use crate::trajectory::InflowTrajectory;
use serde::{Deserialize, Serialize};

/// Constant velocity and angle of attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantInflow {
    /// Inflow velocity (m/s)
    pub u: f64,
    /// Angle of attack (rad)
    pub alpha: f64,
}

impl ConstantInflow {
    pub fn new(u: f64, alpha: f64) -> Self {
        Self { u, alpha }
    }
}

impl InflowTrajectory for ConstantInflow {
    fn sample(&self, _t: f64) -> InflowSample {
        InflowSample::new(self.u, 0.0, self.alpha, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_has_no_rates() {
        let c = ConstantInflow::new(10.0, 0.05);
        for t in [-1.0, 0.0, 3.5] {
            let s = c.sample(t);
            assert_eq!(s.u, 10.0);
            assert_eq!(s.alpha, 0.05);
            assert_eq!(s.alpha_dot, 0.0);
            assert_eq!(s.u_dot, 0.0);
        }
    }
}
