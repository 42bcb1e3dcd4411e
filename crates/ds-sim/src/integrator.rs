//! Time integrators.

use crate::error::SimResult;
use crate::model::{OdeState, TransientModel};

/// Trait for fixed-step time integrators.
pub trait Integrator {
    /// Advance state by one time step using the transient model.
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State>;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let k1 = model.rhs(t, x)?;
        let k2 = model.rhs(t + 0.5 * dt, &x.add_scaled(0.5 * dt, &k1))?;
        let k3 = model.rhs(t + 0.5 * dt, &x.add_scaled(0.5 * dt, &k2))?;
        let k4 = model.rhs(t + dt, &x.add_scaled(dt, &k3))?;

        // x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = k1.add_scaled(2.0, &k2).add_scaled(2.0, &k3).add_scaled(1.0, &k4);
        Ok(x.add_scaled(dt / 6.0, &k_sum))
    }
}

/// Forward Euler (explicit, 1st order, fast for testing).
/// Calls rhs() once per step instead of 4 times (RK4).
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let xdot = model.rhs(t, x)?;
        Ok(x.add_scaled(dt, &xdot))
    }
}

/// Outcome of one embedded Dormand–Prince trial step.
#[derive(Clone, Debug)]
pub struct TrialStep<S> {
    /// 5th-order solution at `t + h`
    pub x: S,
    /// Derivative at `(t + h, x)`, reusable as the first stage of the next step
    pub dxdt: S,
    /// Local error estimate (difference of the embedded 5th and 4th order solutions)
    pub error: S,
}

/// Dormand–Prince 5(4) embedded Runge–Kutta pair.
///
/// Seven stages with the first-same-as-last property: the last stage of an
/// accepted step is the first stage of the next one, so each step costs six
/// new right-hand-side evaluations.
#[derive(Clone, Debug, Default)]
pub struct DormandPrince45;

impl DormandPrince45 {
    const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];
    const A2: [f64; 1] = [1.0 / 5.0];
    const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
    const A4: [f64; 3] = [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0];
    const A5: [f64; 4] = [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
    ];
    const A6: [f64; 5] = [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
    ];
    /// 5th-order weights (also the 7th stage coefficients).
    const B: [f64; 6] = [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
    ];
    /// Difference between 5th and 4th order weights.
    const E: [f64; 7] = [
        71.0 / 57600.0,
        0.0,
        -71.0 / 16695.0,
        71.0 / 1920.0,
        -17253.0 / 339200.0,
        22.0 / 525.0,
        -1.0 / 40.0,
    ];

    /// Order used for step-size control (of the error estimator).
    pub const ERROR_ORDER: i32 = 4;

    /// Take one trial step of size `h` from `(t, x)` whose derivative is `k1`.
    pub fn try_step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        k1: &M::State,
        h: f64,
    ) -> SimResult<TrialStep<M::State>> {
        let stage = |coeffs: &[f64], ks: &[&M::State]| -> M::State {
            coeffs
                .iter()
                .zip(ks)
                .fold(x.clone(), |acc, (c, k)| acc.add_scaled(h * c, k))
        };

        let k2 = model.rhs(t + Self::C[1] * h, &stage(&Self::A2, &[k1]))?;
        let k3 = model.rhs(t + Self::C[2] * h, &stage(&Self::A3, &[k1, &k2]))?;
        let k4 = model.rhs(t + Self::C[3] * h, &stage(&Self::A4, &[k1, &k2, &k3]))?;
        let k5 = model.rhs(t + Self::C[4] * h, &stage(&Self::A5, &[k1, &k2, &k3, &k4]))?;
        let k6 = model.rhs(
            t + Self::C[5] * h,
            &stage(&Self::A6, &[k1, &k2, &k3, &k4, &k5]),
        )?;
        let x_new = stage(&Self::B, &[k1, &k2, &k3, &k4, &k5, &k6]);
        let k7 = model.rhs(t + Self::C[6] * h, &x_new)?;

        let ks = [k1, &k2, &k3, &k4, &k5, &k6, &k7];
        let error = Self::E
            .iter()
            .zip(ks)
            .fold(k1.scale(0.0), |acc, (e, k)| acc.add_scaled(h * e, k));

        Ok(TrialStep {
            x: x_new,
            dxdt: k7,
            error,
        })
    }
}

impl Integrator for DormandPrince45 {
    /// Single 5th-order step without error control.
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let k1 = model.rhs(t, x)?;
        Ok(self.try_step(model, t, x, &k1, dt)?.x)
    }
}
