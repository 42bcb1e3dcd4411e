//! Trajectory interpolated from time samples.

use crate::error::{InputError, InputResult};
use crate::sample::InflowSample;
use crate::trajectory::InflowTrajectory;
use ds_core::{ensure_finite, ensure_increasing, interp_clamped, interp_slope};
use serde::{Deserialize, Serialize};

/// Piecewise-linear trajectory through sampled incidence and velocity.
///
/// Values are held at the first/last sample outside the sampled window, where
/// the reported rates are zero. Inside, rates are the slopes of the segment
/// containing `t`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SampledFields")]
pub struct SampledInflow {
    t: Vec<f64>,
    alpha: Vec<f64>,
    u: Vec<f64>,
}

/// Unchecked serialized form, validated on the way in.
#[derive(Deserialize)]
struct SampledFields {
    t: Vec<f64>,
    alpha: Vec<f64>,
    u: Vec<f64>,
}

impl TryFrom<SampledFields> for SampledInflow {
    type Error = InputError;

    fn try_from(f: SampledFields) -> InputResult<Self> {
        Self::with_velocity(f.t, f.alpha, f.u)
    }
}

impl SampledInflow {
    /// Sampled incidence at constant velocity `u`.
    pub fn new(t: Vec<f64>, alpha: Vec<f64>, u: f64) -> InputResult<Self> {
        let u = vec![u; t.len()];
        Self::with_velocity(t, alpha, u)
    }

    /// Sampled incidence and velocity.
    ///
    /// # Errors
    /// Returns an error for fewer than two samples, length mismatches,
    /// non-finite values or non-increasing times.
    pub fn with_velocity(t: Vec<f64>, alpha: Vec<f64>, u: Vec<f64>) -> InputResult<Self> {
        if t.len() < 2 {
            return Err(InputError::InvalidArg {
                what: "at least two samples required",
            });
        }
        for (what, len) in [("alpha", alpha.len()), ("u", u.len())] {
            if len != t.len() {
                return Err(InputError::LengthMismatch {
                    what,
                    expected: t.len(),
                    got: len,
                });
            }
        }
        ensure_increasing(&t, "sample times")?;
        for (&a, &v) in alpha.iter().zip(&u) {
            ensure_finite(a, "sampled alpha")?;
            ensure_finite(v, "sampled u")?;
        }
        Ok(Self { t, alpha, u })
    }

    /// Sample an arbitrary trajectory on the given times.
    pub fn resample<T: InflowTrajectory + ?Sized>(source: &T, t: Vec<f64>) -> InputResult<Self> {
        let samples: Vec<InflowSample> = t.iter().map(|&ti| source.sample(ti)).collect();
        let alpha = samples.iter().map(|s| s.alpha).collect();
        let u = samples.iter().map(|s| s.u).collect();
        Self::with_velocity(t, alpha, u)
    }

    /// Sample times (s).
    pub fn times(&self) -> &[f64] {
        &self.t
    }
}

impl InflowTrajectory for SampledInflow {
    fn sample(&self, t: f64) -> InflowSample {
        InflowSample::new(
            interp_clamped(&self.t, &self.u, t),
            interp_slope(&self.t, &self.u, t),
            interp_clamped(&self.t, &self.alpha, t),
            interp_slope(&self.t, &self.alpha, t),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_angle_and_rate() {
        let s = SampledInflow::new(vec![0.0, 1.0, 2.0], vec![0.0, 0.1, 0.0], 10.0).unwrap();
        let mid = s.sample(0.5);
        assert!((mid.alpha - 0.05).abs() < 1e-15);
        assert!((mid.alpha_dot - 0.1).abs() < 1e-15);
        assert!((s.sample(1.5).alpha_dot + 0.1).abs() < 1e-15);
        assert_eq!(mid.u, 10.0);
        assert_eq!(mid.u_dot, 0.0);
    }

    #[test]
    fn holds_end_values_outside_window() {
        let s = SampledInflow::new(vec![0.0, 1.0], vec![0.1, 0.2], 10.0).unwrap();
        assert_eq!(s.sample(-1.0).alpha, 0.1);
        assert_eq!(s.sample(5.0).alpha, 0.2);
        assert_eq!(s.sample(5.0).alpha_dot, 0.0);
    }

    #[test]
    fn velocity_ramp_reports_acceleration() {
        let s =
            SampledInflow::with_velocity(vec![0.0, 2.0], vec![0.1, 0.1], vec![10.0, 14.0]).unwrap();
        let x = s.sample(1.0);
        assert!((x.u - 12.0).abs() < 1e-12);
        assert!((x.u_dot - 2.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_malformed_samples() {
        assert!(SampledInflow::new(vec![0.0], vec![0.0], 10.0).is_err());
        assert!(matches!(
            SampledInflow::with_velocity(vec![0.0, 1.0], vec![0.0], vec![1.0, 1.0]),
            Err(InputError::LengthMismatch { .. })
        ));
        assert!(matches!(
            SampledInflow::new(vec![0.0, 0.0], vec![0.0, 1.0], 10.0),
            Err(InputError::Numeric(_))
        ));
    }

    #[test]
    fn deserializing_validates_samples() {
        let ok: SampledInflow =
            serde_json::from_str(r#"{"t":[0,1],"alpha":[0.1,0.2],"u":[10,10]}"#).unwrap();
        assert!((ok.sample(0.5).alpha - 0.15).abs() < 1e-15);

        let mismatched =
            serde_json::from_str::<SampledInflow>(r#"{"t":[0,1,2],"alpha":[0.1],"u":[10,10,10]}"#);
        assert!(mismatched.is_err());
        let single = serde_json::from_str::<SampledInflow>(r#"{"t":[0],"alpha":[0.1],"u":[10]}"#);
        assert!(single.is_err());
        let unordered =
            serde_json::from_str::<SampledInflow>(r#"{"t":[1,0],"alpha":[0,0],"u":[10,10]}"#);
        assert!(unordered.is_err());
    }

    #[test]
    fn serialized_form_reloads() {
        let s = SampledInflow::with_velocity(vec![0.0, 2.0], vec![0.1, 0.3], vec![10.0, 12.0])
            .unwrap();
        let json = serde_json::to_string(&s).unwrap();
        let back: SampledInflow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn resample_reproduces_source_at_nodes() {
        let src = crate::HarmonicInflow::new(10.0, 0.1, 0.05, 3.0, 0.0).unwrap();
        let t: Vec<f64> = (0..50).map(|i| i as f64 * 0.05).collect();
        let s = SampledInflow::resample(&src, t.clone()).unwrap();
        for &ti in &t {
            assert!((s.sample(ti).alpha - src.sample(ti).alpha).abs() < 1e-14);
        }
    }
}
