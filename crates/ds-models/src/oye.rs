//! Øye's single-state separation lag model.

use ds_aero::AeroClosure;
use ds_inputs::InflowTrajectory;
use nalgebra::Vector1;

use crate::error::ModelResult;
use crate::model::{DynamicStallModel, StallCoefficients};

/// Øye state `[f]`, the lagged separation function.
pub type OyeState = Vector1<f64>;

/// Parameters of the Øye model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OyeParams {
    /// Separation time constant (s), fixed for the whole run
    pub tau: f64,
}

impl OyeParams {
    pub fn new(tau: f64) -> Self {
        Self { tau }
    }

    /// `tau = k · c / U_ref`; `k` is typically between 3 and 4.
    pub fn from_chord(k: f64, chord: f64, u_ref: f64) -> Self {
        Self {
            tau: k * chord / u_ref,
        }
    }
}

/// Øye model bound to an aero closure and an inflow trajectory.
///
/// Dynamics: `df/dt = (f_st(α) − f) / τ`, lift `Cl = f·Cl_inv + (1 − f)·Cl_fs`.
///
/// The model only lags the separation point. It has no circulatory or
/// added-mass response, so inside the attached range it reproduces the static
/// polar instantly.
#[derive(Debug, Clone)]
pub struct OyeModel<C, I> {
    pub params: OyeParams,
    pub closure: C,
    pub inflow: I,
}

impl<C: AeroClosure, I: InflowTrajectory> OyeModel<C, I> {
    pub fn new(params: OyeParams, closure: C, inflow: I) -> Self {
        Self {
            params,
            closure,
            inflow,
        }
    }
}

impl<C: AeroClosure, I: InflowTrajectory> DynamicStallModel for OyeModel<C, I> {
    type State = OyeState;

    fn name(&self) -> &'static str {
        "oye"
    }

    fn steady_state(&self, t: f64) -> OyeState {
        let alpha = self.inflow.sample(t).alpha;
        OyeState::new(self.closure.f_st(alpha))
    }

    fn derivative(&self, t: f64, x: &OyeState) -> ModelResult<OyeState> {
        let alpha = self.inflow.sample(t).alpha;
        Ok(OyeState::new(
            (self.closure.f_st(alpha) - x[0]) / self.params.tau,
        ))
    }

    fn outputs(&self, t: f64, x: &OyeState) -> StallCoefficients {
        let alpha = self.inflow.sample(t).alpha;
        let f = x[0];
        StallCoefficients {
            cl: f * self.closure.cl_inv(alpha) + (1.0 - f) * self.closure.cl_fs(alpha),
            cd: None,
            separation: f,
            alpha_effective: alpha,
        }
    }
}
