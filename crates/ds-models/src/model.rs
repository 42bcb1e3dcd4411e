//! Interface shared by the dynamic stall models.

use ds_sim::OdeState;

use crate::error::ModelResult;

/// Aerodynamic coefficients reconstructed from a model state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StallCoefficients {
    /// Dynamic lift coefficient
    pub cl: f64,
    /// Dynamic drag coefficient, for models that provide one
    pub cd: Option<f64>,
    /// Lagged separation function
    pub separation: f64,
    /// Angle of attack the lift is evaluated at (rad)
    pub alpha_effective: f64,
}

/// A reduced-order dynamic stall model: derivative function, output map and
/// closed-form steady state over an aero closure and an inflow trajectory.
///
/// Implementations hold no mutable state. Every method is a pure function of
/// its arguments and the model's immutable parameters, so the integration
/// driver may evaluate them at any time in any order.
pub trait DynamicStallModel {
    /// State vector type.
    type State: OdeState;

    /// Short model identifier used in logs and output headers.
    fn name(&self) -> &'static str;

    /// State consistent with the inputs at `t` held frozen.
    fn steady_state(&self, t: f64) -> Self::State;

    /// State derivative `dx/dt` at `(t, x)`.
    fn derivative(&self, t: f64, x: &Self::State) -> ModelResult<Self::State>;

    /// Coefficients at `(t, x)`.
    fn outputs(&self, t: f64, x: &Self::State) -> StallCoefficients;
}

impl<M: DynamicStallModel + ?Sized> DynamicStallModel for &M {
    type State = M::State;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn steady_state(&self, t: f64) -> Self::State {
        (**self).steady_state(t)
    }

    fn derivative(&self, t: f64, x: &Self::State) -> ModelResult<Self::State> {
        (**self).derivative(t, x)
    }

    fn outputs(&self, t: f64, x: &Self::State) -> StallCoefficients {
        (**self).outputs(t, x)
    }
}
