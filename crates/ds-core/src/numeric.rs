use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Check that every entry of `xs` is finite and that the sequence is strictly increasing.
pub fn ensure_increasing(xs: &[Real], what: &'static str) -> Result<(), CoreError> {
    for (i, &x) in xs.iter().enumerate() {
        ensure_finite(x, what)?;
        if i > 0 && x <= xs[i - 1] {
            return Err(CoreError::NotIncreasing { what, index: i });
        }
    }
    Ok(())
}

/// Index `i` of the segment `[xs[i], xs[i + 1]]` containing `x`.
///
/// `xs` must hold at least two strictly increasing values. Points outside the
/// table map onto the first or last segment.
pub fn segment_index(xs: &[Real], x: Real) -> usize {
    let last = xs.len() - 2;
    match xs.partition_point(|&v| v <= x) {
        0 => 0,
        p => (p - 1).min(last),
    }
}

/// Linear interpolation in a tabulated function, clamped to the end values
/// outside `[xs[0], xs[n-1]]`.
///
/// Degenerate tables are tolerated: an empty table yields `0.0` and a single
/// point yields its value everywhere.
pub fn interp_clamped(xs: &[Real], ys: &[Real], x: Real) -> Real {
    debug_assert_eq!(xs.len(), ys.len());
    match xs.len() {
        0 => 0.0,
        1 => ys[0],
        n => {
            if x <= xs[0] {
                return ys[0];
            }
            if x >= xs[n - 1] {
                return ys[n - 1];
            }
            let i = segment_index(xs, x);
            let w = (x - xs[i]) / (xs[i + 1] - xs[i]);
            ys[i] + w * (ys[i + 1] - ys[i])
        }
    }
}

/// Slope of the interpolating segment containing `x`; zero outside the table.
pub fn interp_slope(xs: &[Real], ys: &[Real], x: Real) -> Real {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n < 2 || x < xs[0] || x > xs[n - 1] {
        return 0.0;
    }
    let i = segment_index(xs, x);
    (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_increasing_reports_index() {
        assert!(ensure_increasing(&[0.0, 1.0, 2.0], "xs").is_ok());
        let err = ensure_increasing(&[0.0, 1.0, 1.0], "xs").unwrap_err();
        assert_eq!(
            err,
            CoreError::NotIncreasing {
                what: "xs",
                index: 2
            }
        );
    }

    #[test]
    fn interp_inside_and_clamped() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 2.0, 0.0];
        assert!((interp_clamped(&xs, &ys, 0.5) - 1.0).abs() < 1e-15);
        assert!((interp_clamped(&xs, &ys, 2.0) - 1.0).abs() < 1e-15);
        assert_eq!(interp_clamped(&xs, &ys, -5.0), 0.0);
        assert_eq!(interp_clamped(&xs, &ys, 10.0), 0.0);
        assert_eq!(interp_clamped(&xs, &ys, 1.0), 2.0);
    }

    #[test]
    fn interp_slope_by_segment() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 2.0, 0.0];
        assert_eq!(interp_slope(&xs, &ys, 0.25), 2.0);
        assert_eq!(interp_slope(&xs, &ys, 2.0), -1.0);
        assert_eq!(interp_slope(&xs, &ys, 4.0), 0.0);
    }

    #[test]
    fn degenerate_tables() {
        assert_eq!(interp_clamped(&[], &[], 1.0), 0.0);
        assert_eq!(interp_clamped(&[2.0], &[7.0], -1.0), 7.0);
    }
}
