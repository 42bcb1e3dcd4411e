//! Tabulated airfoil polar with derived separation quantities.

use crate::closure::AeroClosure;
use crate::error::{AeroError, AeroResult};
use ds_core::{deg_to_rad, ensure_finite, ensure_increasing, interp_clamped};

/// One polar data point. The angle is in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarRow {
    pub alpha: f64,
    pub cl: f64,
    pub cd: f64,
}

impl PolarRow {
    pub fn new(alpha: f64, cl: f64, cd: f64) -> Self {
        Self { alpha, cl, cd }
    }
}

/// Polar tabulated on a strictly increasing angle grid.
///
/// On construction the zero-lift angle, the linear lift slope, the static
/// separation function and the fully separated lift are derived once for every
/// row; queries interpolate linearly between rows. Outside the tabulated range
/// every quantity, including `cl_inv`, is held at its end-row value so that the
/// blending law stays consistent across the extrapolation boundary.
#[derive(Clone, Debug)]
pub struct TabulatedPolar {
    alpha: Vec<f64>,
    cl: Vec<f64>,
    cd: Vec<f64>,
    cl_inv: Vec<f64>,
    cl_fs: Vec<f64>,
    f_st: Vec<f64>,
    alpha0: f64,
    cl_alpha: f64,
}

impl TabulatedPolar {
    /// Half-width of the angle window used to fit the linear lift slope.
    pub const DEFAULT_SLOPE_WINDOW_DEG: f64 = 5.0;

    /// Separation values above this are treated as fully attached.
    const ATTACHED_F: f64 = 0.999;

    /// Build a polar and derive its separation quantities.
    ///
    /// # Errors
    /// Returns an error if fewer than three rows are given, if any value is
    /// non-finite, if the angles are not strictly increasing, or if the lift
    /// never crosses zero.
    pub fn new(rows: &[PolarRow]) -> AeroResult<Self> {
        Self::with_slope_window(rows, deg_to_rad(Self::DEFAULT_SLOPE_WINDOW_DEG))
    }

    /// Same as [`TabulatedPolar::new`] with an explicit slope-fit half-width (rad).
    pub fn with_slope_window(rows: &[PolarRow], window: f64) -> AeroResult<Self> {
        if rows.len() < 3 {
            return Err(AeroError::Table {
                what: format!("at least 3 rows required, got {}", rows.len()),
            });
        }
        if !(window > 0.0) {
            return Err(AeroError::InvalidArg {
                what: "slope window must be positive",
            });
        }

        let alpha: Vec<f64> = rows.iter().map(|r| r.alpha).collect();
        let cl: Vec<f64> = rows.iter().map(|r| r.cl).collect();
        let cd: Vec<f64> = rows.iter().map(|r| r.cd).collect();
        ensure_increasing(&alpha, "polar alpha")?;
        for r in rows {
            ensure_finite(r.cl, "polar cl")?;
            ensure_finite(r.cd, "polar cd")?;
        }

        let alpha0 = zero_lift_angle(&alpha, &cl).ok_or(AeroError::NoZeroLift)?;
        let cl_alpha = linear_slope(&alpha, &cl, alpha0, window);
        if !(cl_alpha > 0.0) {
            return Err(AeroError::Table {
                what: format!("non-positive lift slope {cl_alpha} around alpha0"),
            });
        }

        let cl_inv: Vec<f64> = alpha.iter().map(|a| cl_alpha * (a - alpha0)).collect();
        let f_st = separation_function(&alpha, &cl, &cl_inv, alpha0);
        let cl_fs = f_st
            .iter()
            .zip(cl.iter().zip(&cl_inv))
            .map(|(&f, (&c, &ci))| {
                if f >= Self::ATTACHED_F {
                    0.5 * ci
                } else if f <= 0.0 {
                    c
                } else {
                    (c - ci * f) / (1.0 - f)
                }
            })
            .collect();

        Ok(Self {
            alpha,
            cl,
            cd,
            cl_inv,
            cl_fs,
            f_st,
            alpha0,
            cl_alpha,
        })
    }

    /// Build a polar from rows given in degrees.
    pub fn from_degrees(rows: &[(f64, f64, f64)]) -> AeroResult<Self> {
        let rows: Vec<PolarRow> = rows
            .iter()
            .map(|&(a, cl, cd)| PolarRow::new(deg_to_rad(a), cl, cd))
            .collect();
        Self::new(&rows)
    }

    /// Sample any closure on an angle grid (rad) into a table.
    pub fn sample<C: AeroClosure + ?Sized>(closure: &C, alphas: &[f64]) -> AeroResult<Self> {
        let rows: Vec<PolarRow> = alphas
            .iter()
            .map(|&a| PolarRow::new(a, closure.cl(a), closure.cd(a)))
            .collect();
        Self::new(&rows)
    }

    /// Tabulated angles (rad).
    pub fn alphas(&self) -> &[f64] {
        &self.alpha
    }

    /// Static separation function at the tabulated angles.
    pub fn f_st_table(&self) -> &[f64] {
        &self.f_st
    }

    /// Tabulated angle range (rad).
    pub fn range(&self) -> (f64, f64) {
        (self.alpha[0], self.alpha[self.alpha.len() - 1])
    }
}

impl AeroClosure for TabulatedPolar {
    fn alpha0(&self) -> f64 {
        self.alpha0
    }

    fn cl_alpha(&self) -> f64 {
        self.cl_alpha
    }

    fn cl(&self, alpha: f64) -> f64 {
        interp_clamped(&self.alpha, &self.cl, alpha)
    }

    fn cd(&self, alpha: f64) -> f64 {
        interp_clamped(&self.alpha, &self.cd, alpha)
    }

    fn cl_inv(&self, alpha: f64) -> f64 {
        interp_clamped(&self.alpha, &self.cl_inv, alpha)
    }

    fn cl_fs(&self, alpha: f64) -> f64 {
        interp_clamped(&self.alpha, &self.cl_fs, alpha)
    }

    fn f_st(&self, alpha: f64) -> f64 {
        interp_clamped(&self.alpha, &self.f_st, alpha)
    }
}

/// Zero crossing of the lift curve closest to α = 0.
fn zero_lift_angle(alpha: &[f64], cl: &[f64]) -> Option<f64> {
    let mut best: Option<f64> = None;
    let mut consider = |a0: f64| {
        if best.is_none_or(|b| a0.abs() < b.abs()) {
            best = Some(a0);
        }
    };
    for i in 0..alpha.len() - 1 {
        let (c0, c1) = (cl[i], cl[i + 1]);
        if c0 == 0.0 {
            consider(alpha[i]);
        } else if c0 * c1 < 0.0 {
            consider(alpha[i] - c0 * (alpha[i + 1] - alpha[i]) / (c1 - c0));
        }
    }
    if cl[cl.len() - 1] == 0.0 {
        consider(alpha[alpha.len() - 1]);
    }
    best
}

/// Least-squares slope of a line through (α0, 0) fitted on `|α − α0| ≤ window`.
///
/// Falls back to the slope of the segment containing α0 when fewer than two
/// rows fall inside the window.
fn linear_slope(alpha: &[f64], cl: &[f64], alpha0: f64, window: f64) -> f64 {
    let (mut sxy, mut sxx, mut n) = (0.0, 0.0, 0usize);
    for (&a, &c) in alpha.iter().zip(cl) {
        let da = a - alpha0;
        if da.abs() <= window {
            sxy += da * c;
            sxx += da * da;
            n += 1;
        }
    }
    if n >= 2 && sxx > 0.0 {
        return sxy / sxx;
    }
    ds_core::interp_slope(alpha, cl, alpha0)
}

/// Invert the Kirchhoff relation `Cl = Cl_inv ((1 + √f)/2)²` row by row.
///
/// Moving away from α0 on either side, once `f` reaches zero it stays zero.
fn separation_function(alpha: &[f64], cl: &[f64], cl_inv: &[f64], alpha0: f64) -> Vec<f64> {
    let mut f: Vec<f64> = cl
        .iter()
        .zip(cl_inv)
        .map(|(&c, &ci)| {
            if ci.abs() < 1e-12 {
                return 1.0;
            }
            let ratio = (c / ci).max(0.25);
            let s = 2.0 * ratio.sqrt() - 1.0;
            (s * s).min(1.0)
        })
        .collect();

    let pivot = alpha.partition_point(|&a| a < alpha0);
    let mut separated = false;
    for v in f[pivot..].iter_mut() {
        if separated || *v <= 0.0 {
            separated = true;
            *v = 0.0;
        }
    }
    separated = false;
    for v in f[..pivot].iter_mut().rev() {
        if separated || *v <= 0.0 {
            separated = true;
            *v = 0.0;
        }
    }
    f
}
