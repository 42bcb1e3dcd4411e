//! Output time grids.

use crate::error::{SimError, SimResult};

/// `n` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Points `start, start + step, …` strictly below `end`.
pub fn arange(start: f64, end: f64, step: f64) -> SimResult<Vec<f64>> {
    if !(step > 0.0) || !start.is_finite() || !end.is_finite() {
        return Err(SimError::InvalidArg {
            what: "arange needs finite bounds and a positive step",
        });
    }
    let n = ((end - start) / step).ceil().max(0.0) as usize;
    Ok((0..n).map(|i| start + step * i as f64).collect())
}
