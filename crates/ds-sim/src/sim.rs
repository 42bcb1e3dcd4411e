//! Simulation runner and result recording.

use tracing::{debug, trace};

use crate::error::{SimError, SimResult};
use crate::integrator::{DormandPrince45, ForwardEuler, Integrator, RK4};
use crate::model::{OdeState, TransientModel};

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// Adaptive Dormand–Prince 5(4) with error control (default).
    #[default]
    DormandPrince45,
    /// 4th-order Runge-Kutta with fixed sub-step `dt` (4 rhs calls per step).
    RK4,
    /// Forward Euler with fixed sub-step `dt` (1 rhs call per step).
    ForwardEuler,
}

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Integrator type (default: Dormand–Prince 5(4))
    pub integrator: IntegratorType,
    /// Relative tolerance (adaptive only)
    pub rtol: f64,
    /// Absolute tolerance (adaptive only)
    pub atol: f64,
    /// First trial step (seconds); estimated from the model when `None`
    pub first_step: Option<f64>,
    /// Largest step the adaptive integrator may take (seconds)
    pub max_step: f64,
    /// Smallest step before the adaptive integrator gives up (seconds)
    pub min_step: f64,
    /// Sub-step for the fixed-step integrators (seconds)
    pub dt: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            integrator: IntegratorType::default(),
            rtol: 1e-6,
            atol: 1e-9,
            first_step: None,
            max_step: f64::INFINITY,
            min_step: 0.0,
            dt: 1e-4,
            max_steps: 1_000_000,
        }
    }
}

impl SimOptions {
    fn validate(&self) -> SimResult<()> {
        if !(self.rtol >= 0.0 && self.atol >= 0.0) || self.rtol + self.atol <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "tolerances must be non-negative and not both zero",
            });
        }
        if !(self.max_step > 0.0) {
            return Err(SimError::InvalidArg {
                what: "max_step must be positive",
            });
        }
        if !(self.min_step >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "min_step must be non-negative",
            });
        }
        if let Some(h) = self.first_step {
            if !(h > 0.0 && h.is_finite()) {
                return Err(SimError::InvalidArg {
                    what: "first_step must be positive and finite",
                });
            }
        }
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(())
    }
}

/// Work counters of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Accepted steps
    pub accepted: usize,
    /// Rejected trial steps (adaptive only)
    pub rejected: usize,
    /// Right-hand-side evaluations
    pub rhs_evals: usize,
}

/// Record of simulation results.
#[derive(Clone, Debug)]
pub struct SimRecord<S> {
    /// Time points (seconds), identical to the requested grid
    pub t: Vec<f64>,
    /// State snapshots, one per time point
    pub x: Vec<S>,
    /// Work counters
    pub stats: SimStats,
}

/// Integrate `model` from its own initial state at `grid[0]` and record the
/// state at every grid point.
pub fn run_sim<M: TransientModel>(
    model: &M,
    grid: &[f64],
    opts: &SimOptions,
) -> SimResult<SimRecord<M::State>> {
    let t0 = *grid.first().ok_or(SimError::InvalidArg {
        what: "time grid must not be empty",
    })?;
    let x0 = model.initial_state(t0);
    run_sim_from(model, x0, grid, opts)
}

/// Integrate `model` from `x0` at `grid[0]` and record the state at every
/// grid point.
///
/// The grid must be finite and non-decreasing. Repeated points record the
/// same state twice.
pub fn run_sim_from<M: TransientModel>(
    model: &M,
    x0: M::State,
    grid: &[f64],
    opts: &SimOptions,
) -> SimResult<SimRecord<M::State>> {
    opts.validate()?;
    validate_grid(grid)?;
    if !x0.is_finite() {
        return Err(SimError::NonFinite { t: grid[0] });
    }

    let record = match opts.integrator {
        IntegratorType::DormandPrince45 => run_adaptive(model, x0, grid, opts)?,
        IntegratorType::RK4 => run_fixed(&RK4, 4, model, x0, grid, opts)?,
        IntegratorType::ForwardEuler => run_fixed(&ForwardEuler, 1, model, x0, grid, opts)?,
    };

    debug!(
        integrator = ?opts.integrator,
        points = grid.len(),
        accepted = record.stats.accepted,
        rejected = record.stats.rejected,
        rhs_evals = record.stats.rhs_evals,
        "simulation finished"
    );
    Ok(record)
}

fn validate_grid(grid: &[f64]) -> SimResult<()> {
    if grid.is_empty() {
        return Err(SimError::InvalidArg {
            what: "time grid must not be empty",
        });
    }
    if grid.iter().any(|t| !t.is_finite()) {
        return Err(SimError::InvalidArg {
            what: "time grid must be finite",
        });
    }
    if grid.windows(2).any(|w| w[1] < w[0]) {
        return Err(SimError::InvalidArg {
            what: "time grid must be non-decreasing",
        });
    }
    Ok(())
}

fn run_fixed<M: TransientModel, I: Integrator>(
    integrator: &I,
    rhs_per_step: usize,
    model: &M,
    x0: M::State,
    grid: &[f64],
    opts: &SimOptions,
) -> SimResult<SimRecord<M::State>> {
    let mut stats = SimStats::default();
    let mut x = x0;
    let mut x_record = Vec::with_capacity(grid.len());
    x_record.push(x.clone());

    for w in grid.windows(2) {
        let (t_start, t_out) = (w[0], w[1]);
        let span = t_out - t_start;
        if span > 0.0 {
            // Sub-step so every grid point is hit exactly.
            let n = (span / opts.dt).ceil().max(1.0) as usize;
            let h = span / n as f64;
            for i in 0..n {
                if stats.accepted >= opts.max_steps {
                    return Err(SimError::MaxStepsExceeded {
                        max_steps: opts.max_steps,
                        t: t_start + h * i as f64,
                    });
                }
                let t = t_start + h * i as f64;
                x = integrator.step(model, t, &x, h)?;
                stats.accepted += 1;
                stats.rhs_evals += rhs_per_step;
                if !x.is_finite() {
                    return Err(SimError::NonFinite { t: t + h });
                }
            }
        }
        x_record.push(x.clone());
    }

    Ok(SimRecord {
        t: grid.to_vec(),
        x: x_record,
        stats,
    })
}

fn run_adaptive<M: TransientModel>(
    model: &M,
    x0: M::State,
    grid: &[f64],
    opts: &SimOptions,
) -> SimResult<SimRecord<M::State>> {
    const SAFETY: f64 = 0.9;
    const MIN_FACTOR: f64 = 0.2;
    const MAX_FACTOR: f64 = 5.0;
    let exponent = -1.0 / (DormandPrince45::ERROR_ORDER as f64 + 1.0);

    let dp = DormandPrince45;
    let mut stats = SimStats::default();
    let mut t = grid[0];
    let mut x = x0;
    let mut x_record = Vec::with_capacity(grid.len());
    x_record.push(x.clone());

    let span = grid[grid.len() - 1] - grid[0];
    if span <= 0.0 {
        x_record.resize(grid.len(), x);
        return Ok(SimRecord {
            t: grid.to_vec(),
            x: x_record,
            stats,
        });
    }

    let mut k1 = model.rhs(t, &x)?;
    stats.rhs_evals += 1;
    if !k1.is_finite() {
        return Err(SimError::NonFinite { t });
    }

    let mut h = match opts.first_step {
        Some(h) => h,
        None => {
            stats.rhs_evals += 1;
            initial_step(model, t, &x, &k1, opts)?
        }
    }
    .min(opts.max_step)
    .min(span);

    for &t_out in &grid[1..] {
        while t < t_out {
            if stats.accepted + stats.rejected >= opts.max_steps {
                return Err(SimError::MaxStepsExceeded {
                    max_steps: opts.max_steps,
                    t,
                });
            }

            let remaining = t_out - t;
            let truncated = h >= remaining;
            let h_try = if truncated { remaining } else { h };
            let h_floor = opts.min_step.max(16.0 * f64::EPSILON * t.abs().max(1.0));
            if !truncated && h_try < h_floor {
                return Err(SimError::StepSizeUnderflow { t, h: h_try });
            }

            let trial = dp.try_step(model, t, &x, &k1, h_try)?;
            stats.rhs_evals += 6;

            let err = if trial.x.is_finite() && trial.dxdt.is_finite() {
                OdeState::error_norm(&trial.error, &x, &trial.x, opts.atol, opts.rtol)
            } else {
                f64::INFINITY
            };

            let factor = if err == 0.0 {
                MAX_FACTOR
            } else if err.is_finite() {
                (SAFETY * err.powf(exponent)).clamp(MIN_FACTOR, MAX_FACTOR)
            } else {
                MIN_FACTOR
            };

            if err <= 1.0 {
                t = if truncated { t_out } else { t + h_try };
                x = trial.x;
                k1 = trial.dxdt;
                stats.accepted += 1;
                let h_next = h_try * factor;
                // A step shortened to land on the grid says little about the
                // achievable size, so never let it shrink the next one.
                h = if truncated { h.max(h_next) } else { h_next };
                h = h.min(opts.max_step);
            } else {
                stats.rejected += 1;
                trace!(t, h = h_try, err, "step rejected");
                h = h_try * factor.min(1.0);
            }
        }
        x_record.push(x.clone());
    }

    Ok(SimRecord {
        t: grid.to_vec(),
        x: x_record,
        stats,
    })
}

/// Starting step estimate from the size of the state and its first two derivatives.
fn initial_step<M: TransientModel>(
    model: &M,
    t0: f64,
    x0: &M::State,
    f0: &M::State,
    opts: &SimOptions,
) -> SimResult<f64> {
    let norm = |v: &M::State| OdeState::error_norm(v, x0, x0, opts.atol, opts.rtol);

    let d0 = norm(x0);
    let d1 = norm(f0);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };

    let x1 = x0.add_scaled(h0, f0);
    let f1 = model.rhs(t0 + h0, &x1)?;
    let d2 = norm(&f1.add_scaled(-1.0, f0)) / h0;

    let dmax = d1.max(d2);
    let h1 = if !dmax.is_finite() {
        h0
    } else if dmax <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / dmax).powf(1.0 / (DormandPrince45::ERROR_ORDER as f64 + 1.0))
    };

    Ok((100.0 * h0).min(h1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::linspace;

    /// x' = -x, x(0) = 1
    struct Decay;

    impl TransientModel for Decay {
        type State = f64;

        fn initial_state(&self, _t0: f64) -> f64 {
            1.0
        }

        fn rhs(&self, _t: f64, x: &f64) -> SimResult<f64> {
            Ok(-x)
        }
    }

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.integrator, IntegratorType::DormandPrince45);
        assert_eq!(opts.rtol, 1e-6);
        assert_eq!(opts.atol, 1e-9);
        assert!(opts.max_step.is_infinite());
        assert_eq!(opts.max_steps, 1_000_000);
    }

    #[test]
    fn sim_options_invalid() {
        let grid = linspace(0.0, 1.0, 3);
        let opts = SimOptions {
            dt: 0.0,
            integrator: IntegratorType::RK4,
            ..Default::default()
        };
        assert!(run_sim(&Decay, &grid, &opts).is_err());

        let opts = SimOptions {
            rtol: 0.0,
            atol: 0.0,
            ..Default::default()
        };
        assert!(run_sim(&Decay, &grid, &opts).is_err());
    }

    #[test]
    fn grid_must_be_non_decreasing() {
        let opts = SimOptions::default();
        assert!(run_sim(&Decay, &[], &opts).is_err());
        assert!(run_sim(&Decay, &[0.0, 1.0, 0.5], &opts).is_err());
        assert!(run_sim(&Decay, &[0.0, f64::NAN], &opts).is_err());
    }

    #[test]
    fn adaptive_decay_matches_analytic() {
        let grid = linspace(0.0, 5.0, 51);
        let rec = run_sim(&Decay, &grid, &SimOptions::default()).unwrap();
        assert_eq!(rec.t, grid);
        for (t, x) in rec.t.iter().zip(&rec.x) {
            assert!((x - (-t).exp()).abs() < 1e-5, "t={t}");
        }
        assert!(rec.stats.accepted > 0);
    }

    #[test]
    fn fixed_step_integrators_hit_grid_points() {
        let grid = linspace(0.0, 1.0, 4);
        for integrator in [IntegratorType::RK4, IntegratorType::ForwardEuler] {
            let opts = SimOptions {
                integrator,
                dt: 1e-4,
                ..Default::default()
            };
            let rec = run_sim(&Decay, &grid, &opts).unwrap();
            assert_eq!(rec.x.len(), 4);
            let last = rec.x[3];
            assert!((last - (-1.0_f64).exp()).abs() < 1e-4);
        }
    }

    #[test]
    fn single_point_grid_returns_initial_state() {
        let rec = run_sim(&Decay, &[2.0], &SimOptions::default()).unwrap();
        assert_eq!(rec.x, vec![1.0]);
        assert_eq!(rec.stats, SimStats::default());
    }

    #[test]
    fn repeated_grid_points_repeat_state() {
        let rec = run_sim(&Decay, &[0.0, 0.5, 0.5, 1.0], &SimOptions::default()).unwrap();
        assert_eq!(rec.x[1], rec.x[2]);
    }

    #[test]
    fn max_steps_is_enforced() {
        let opts = SimOptions {
            max_steps: 3,
            max_step: 1e-3,
            ..Default::default()
        };
        let err = run_sim(&Decay, &[0.0, 1.0], &opts).unwrap_err();
        assert!(matches!(err, SimError::MaxStepsExceeded { max_steps: 3, .. }));
    }
}
