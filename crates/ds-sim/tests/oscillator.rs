//! Integration test: undamped harmonic oscillator and a stiff-ish relaxation.
//!
//! Test that demonstrates:
//! - adaptive and fixed-step integrators agree with the analytic solution
//! - states are recorded exactly on the requested grid
//! - time-dependent forcing is evaluated at the right stage times

use nalgebra::Vector2;
use ds_sim::{
    IntegratorType, SimError, SimOptions, SimResult, TransientModel, linspace, run_sim,
    run_sim_from,
};

/// x'' = -ω² x written as [x, v].
struct Oscillator {
    omega: f64,
}

impl TransientModel for Oscillator {
    type State = Vector2<f64>;

    fn initial_state(&self, _t0: f64) -> Self::State {
        Vector2::new(1.0, 0.0)
    }

    fn rhs(&self, _t: f64, x: &Self::State) -> SimResult<Self::State> {
        Ok(Vector2::new(x[1], -self.omega * self.omega * x[0]))
    }
}

/// First-order lag towards sin(t) with time constant tau.
struct Lag {
    tau: f64,
}

impl TransientModel for Lag {
    type State = f64;

    fn initial_state(&self, _t0: f64) -> f64 {
        0.0
    }

    fn rhs(&self, t: f64, x: &f64) -> SimResult<f64> {
        Ok((t.sin() - x) / self.tau)
    }
}

/// Fails once time passes a threshold.
struct Blowup;

impl TransientModel for Blowup {
    type State = f64;

    fn initial_state(&self, _t0: f64) -> f64 {
        1.0
    }

    fn rhs(&self, t: f64, _x: &f64) -> SimResult<f64> {
        if t > 0.5 {
            Err(SimError::Backend {
                message: "model left its domain".to_string(),
            })
        } else {
            Ok(0.0)
        }
    }
}

#[test]
fn oscillator_adaptive_tracks_cosine() {
    let model = Oscillator { omega: 2.0 };
    let grid = linspace(0.0, 10.0, 201);
    let rec = run_sim(&model, &grid, &SimOptions::default()).unwrap();

    assert_eq!(rec.t.len(), grid.len());
    for (t, x) in rec.t.iter().zip(&rec.x) {
        assert!((x[0] - (2.0 * t).cos()).abs() < 1e-4, "t={t}");
    }
    // Energy is conserved to the tolerance level.
    let last = rec.x.last().unwrap();
    let energy = last[0] * last[0] + last[1] * last[1] / 4.0;
    assert!((energy - 1.0).abs() < 1e-4);
}

#[test]
fn oscillator_rk4_matches_adaptive() {
    let model = Oscillator { omega: 2.0 };
    let grid = linspace(0.0, 3.0, 31);
    let adaptive = run_sim(&model, &grid, &SimOptions::default()).unwrap();
    let fixed = run_sim(
        &model,
        &grid,
        &SimOptions {
            integrator: IntegratorType::RK4,
            dt: 1e-3,
            ..Default::default()
        },
    )
    .unwrap();

    for (a, b) in adaptive.x.iter().zip(&fixed.x) {
        assert!((a - b).norm() < 1e-4);
    }
}

#[test]
fn lag_reaches_periodic_solution() {
    let tau = 0.5;
    let model = Lag { tau };
    let t_end = 20.0;
    let rec = run_sim(&model, &[0.0, t_end], &SimOptions::default()).unwrap();

    // Periodic part of x' = (sin t - x)/tau.
    let expected = (t_end.sin() - tau * t_end.cos()) / (1.0 + tau * tau);
    assert!((rec.x[1] - expected).abs() < 1e-5);
}

#[test]
fn max_step_limits_step_size() {
    let model = Lag { tau: 1.0 };
    let opts = SimOptions {
        max_step: 0.01,
        ..Default::default()
    };
    let rec = run_sim(&model, &[0.0, 1.0], &opts).unwrap();
    assert!(rec.stats.accepted >= 100);
}

#[test]
fn restart_from_explicit_state() {
    let model = Oscillator { omega: 1.0 };
    let x0 = Vector2::new(0.0, 1.0);
    let rec = run_sim_from(&model, x0, &[0.0, std::f64::consts::FRAC_PI_2], &SimOptions::default())
        .unwrap();
    assert!((rec.x[1][0] - 1.0).abs() < 1e-5);
}

#[test]
fn model_errors_propagate() {
    let err = run_sim(&Blowup, &[0.0, 1.0], &SimOptions::default()).unwrap_err();
    assert!(matches!(err, SimError::Backend { .. }));
}
