//! Analytic airfoil based on Kirchhoff's flat-plate separation law.

use crate::closure::AeroClosure;
use crate::error::{AeroError, AeroResult};

/// Analytic closure built on the Kirchhoff trailing-edge separation relation.
///
/// The separation function is exactly one inside the linear range
/// `|α − α0| ≤ onset` and decays as a Gaussian beyond it:
///
/// ```text
/// f_st  = exp(-((|α − α0| − onset) / width)²)
/// Cl    = Cl_inv · ((1 + √f) / 2)²
/// Cl_fs = Cl_inv · (1 + 3√f) / (4 (1 + √f))
/// Cd    = cd0 + cd_sep · (1 − f) · sin²(α − α0)
/// ```
///
/// With these definitions `Cl = f·Cl_inv + (1 − f)·Cl_fs` holds identically,
/// and every function is defined for any angle.
#[derive(Clone, Debug, PartialEq)]
pub struct KirchhoffAirfoil {
    /// Linear lift slope (1/rad)
    pub cl_alpha: f64,
    /// Zero-lift angle (rad)
    pub alpha0: f64,
    /// Half-width of the attached-flow range around α0 (rad)
    pub onset: f64,
    /// Gaussian decay width of the separation function (rad)
    pub width: f64,
    /// Drag at attached flow
    pub cd0: f64,
    /// Additional drag of fully separated flow at 90° incidence
    pub cd_sep: f64,
}

impl KirchhoffAirfoil {
    /// Create an analytic airfoil.
    ///
    /// # Errors
    /// Returns an error if a parameter is non-finite, the slope is not
    /// positive, or the onset or width are not strictly positive.
    pub fn new(
        cl_alpha: f64,
        alpha0: f64,
        onset: f64,
        width: f64,
        cd0: f64,
        cd_sep: f64,
    ) -> AeroResult<Self> {
        for (v, what) in [
            (cl_alpha, "cl_alpha"),
            (alpha0, "alpha0"),
            (onset, "onset"),
            (width, "width"),
            (cd0, "cd0"),
            (cd_sep, "cd_sep"),
        ] {
            ds_core::ensure_finite(v, what)?;
        }
        if cl_alpha <= 0.0 {
            return Err(AeroError::InvalidArg {
                what: "cl_alpha must be positive",
            });
        }
        if onset <= 0.0 || width <= 0.0 {
            return Err(AeroError::InvalidArg {
                what: "onset and width must be positive",
            });
        }
        Ok(Self {
            cl_alpha,
            alpha0,
            onset,
            width,
            cd0,
            cd_sep,
        })
    }

    /// Thin-airfoil section with a 2π slope that stalls gradually past `onset`.
    pub fn thin_airfoil(alpha0: f64, onset: f64, width: f64) -> Self {
        Self {
            cl_alpha: 2.0 * std::f64::consts::PI,
            alpha0,
            onset,
            width,
            cd0: 0.008,
            cd_sep: 1.8,
        }
    }
}

impl AeroClosure for KirchhoffAirfoil {
    fn alpha0(&self) -> f64 {
        self.alpha0
    }

    fn cl_alpha(&self) -> f64 {
        self.cl_alpha
    }

    fn cl(&self, alpha: f64) -> f64 {
        let sf = self.f_st(alpha).sqrt();
        self.cl_inv(alpha) * 0.25 * (1.0 + sf) * (1.0 + sf)
    }

    fn cd(&self, alpha: f64) -> f64 {
        let s = (alpha - self.alpha0).sin();
        self.cd0 + self.cd_sep * (1.0 - self.f_st(alpha)) * s * s
    }

    fn cl_fs(&self, alpha: f64) -> f64 {
        let sf = self.f_st(alpha).sqrt();
        self.cl_inv(alpha) * (1.0 + 3.0 * sf) / (4.0 * (1.0 + sf))
    }

    fn f_st(&self, alpha: f64) -> f64 {
        let excess = (alpha - self.alpha0).abs() - self.onset;
        if excess <= 0.0 {
            1.0
        } else {
            let r = excess / self.width;
            (-r * r).exp()
        }
    }
}
