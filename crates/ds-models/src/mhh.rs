//! Four-state Hansen-Gaunaa-Madsen (Beddoes-Leishman type) dynamic stall model.
//!
//! States, all in lift-coefficient units except `x4`:
//!
//! | state | meaning | steady value |
//! |---|---|---|
//! | `x1`, `x2` | circulatory deficit of each Wagner term | `0` |
//! | `x3` | lagged potential lift `Cl^p'` | `Clα (α34 − α0)` |
//! | `x4` | lagged separation function `f''` | `f_st(α34)` |
//!
//! Time constants scale with the convective time unit `Tu = c / (2U)`.

use ds_aero::AeroClosure;
use ds_core::constants::U_MIN_MPS;
use ds_inputs::{InflowSample, InflowTrajectory};
use nalgebra::Vector4;
use std::f64::consts::PI;

use crate::error::{ModelError, ModelResult};
use crate::model::{DynamicStallModel, StallCoefficients};

/// MHH state `[x1, x2, x3, x4]`.
pub type MhhState = Vector4<f64>;

/// Non-circulatory (added-mass) lift contribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddedMass {
    /// Circulatory lift only.
    Off,
    /// `π Tu α̇`, positive for nose-up pitch rate.
    #[default]
    PitchRate,
}

/// Behaviour when the inflow velocity vanishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZeroInflowPolicy {
    /// Treat the convective time constants as infinite: all states hold.
    #[default]
    Freeze,
    /// Fail with [`ModelError::ZeroInflow`].
    Reject,
}

/// Parameters of the MHH model.
///
/// `tp0` and `tf0` are the pressure and boundary-layer time constants in
/// convective time units. The zero-lift angle and lift slope are taken from
/// the aero closure.
///
/// The model itself does not validate these values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MhhParams {
    /// Chord length (m)
    pub chord: f64,
    /// Wagner amplitude of the slow term
    pub a1: f64,
    /// Wagner amplitude of the fast term
    pub a2: f64,
    /// Wagner decay rate of the slow term
    pub b1: f64,
    /// Wagner decay rate of the fast term
    pub b2: f64,
    /// Pressure lag time constant (in `Tu`)
    pub tp0: f64,
    /// Separation lag time constant (in `Tu`)
    pub tf0: f64,
    pub added_mass: AddedMass,
    pub zero_inflow: ZeroInflowPolicy,
}

impl MhhParams {
    /// Default pressure lag, `Tp = 1.7 c / U`.
    pub const TP0: f64 = 3.4;
    /// Default separation lag, `Tf = 3 c / U`.
    pub const TF0: f64 = 6.0;

    /// Wind-turbine airfoil coefficients `A = (0.3, 0.7)`, `b = (0.14, 0.53)`.
    pub fn new(chord: f64) -> Self {
        Self {
            chord,
            a1: 0.3,
            a2: 0.7,
            b1: 0.14,
            b2: 0.53,
            tp0: Self::TP0,
            tf0: Self::TF0,
            added_mass: AddedMass::default(),
            zero_inflow: ZeroInflowPolicy::default(),
        }
    }

    /// R.T. Jones flat-plate approximation of the Wagner function.
    pub fn jones(chord: f64) -> Self {
        Self {
            a1: crate::wagner::JONES_A1,
            a2: crate::wagner::JONES_A2,
            b1: crate::wagner::JONES_B1,
            b2: crate::wagner::JONES_B2,
            ..Self::new(chord)
        }
    }

    pub fn with_time_constants(self, tp0: f64, tf0: f64) -> Self {
        Self { tp0, tf0, ..self }
    }

    pub fn with_added_mass(self, added_mass: AddedMass) -> Self {
        Self { added_mass, ..self }
    }

    pub fn with_zero_inflow(self, zero_inflow: ZeroInflowPolicy) -> Self {
        Self {
            zero_inflow,
            ..self
        }
    }

    /// Convective time unit `Tu = c / (2U)`.
    pub fn convective_time_unit(&self, u: f64) -> f64 {
        self.chord / (2.0 * u)
    }
}

/// MHH model bound to an aero closure and an inflow trajectory.
#[derive(Debug, Clone)]
pub struct MhhModel<C, I> {
    pub params: MhhParams,
    pub closure: C,
    pub inflow: I,
}

impl<C: AeroClosure, I: InflowTrajectory> MhhModel<C, I> {
    pub fn new(params: MhhParams, closure: C, inflow: I) -> Self {
        Self {
            params,
            closure,
            inflow,
        }
    }

    /// Effective angle `αE = α34 − (x1 + x2) / Clα`.
    pub fn alpha_effective(&self, sample: &InflowSample, x: &MhhState) -> f64 {
        sample.alpha_34 - (x[0] + x[1]) / self.closure.cl_alpha()
    }

    /// Added-mass lift; zero when the inflow vanishes.
    fn non_circulatory_lift(&self, sample: &InflowSample) -> f64 {
        match self.params.added_mass {
            AddedMass::Off => 0.0,
            AddedMass::PitchRate if sample.u.abs() < U_MIN_MPS => 0.0,
            AddedMass::PitchRate => {
                PI * self.params.convective_time_unit(sample.u) * sample.alpha_dot
            }
        }
    }
}

impl<C: AeroClosure, I: InflowTrajectory> DynamicStallModel for MhhModel<C, I> {
    type State = MhhState;

    fn name(&self) -> &'static str {
        "mhh"
    }

    fn steady_state(&self, t: f64) -> MhhState {
        let s = self.inflow.sample(t);
        let cla = self.closure.cl_alpha();
        let alpha0 = self.closure.alpha0();
        MhhState::new(
            0.0,
            0.0,
            cla * (s.alpha_34 - alpha0),
            self.closure.f_st(s.alpha_34),
        )
    }

    fn derivative(&self, t: f64, x: &MhhState) -> ModelResult<MhhState> {
        let s = self.inflow.sample(t);
        if s.u.abs() < U_MIN_MPS {
            return match self.params.zero_inflow {
                ZeroInflowPolicy::Freeze => Ok(MhhState::zeros()),
                ZeroInflowPolicy::Reject => Err(ModelError::ZeroInflow { t, u: s.u }),
            };
        }

        let p = &self.params;
        let cla = self.closure.cl_alpha();
        let alpha0 = self.closure.alpha0();
        let tu = p.convective_time_unit(s.u);
        let u_rate = s.u_dot / s.u;

        let mut dx = MhhState::zeros();

        // Circulatory deficits, with the unsteady-velocity correction.
        for (i, (a, b)) in [(p.a1, p.b1), (p.a2, p.b2)].into_iter().enumerate() {
            let quasi_steady = a * cla * (s.alpha_34 - alpha0);
            dx[i] = -b / tu * x[i] + a * cla * s.alpha_34_dot - u_rate * (x[i] - quasi_steady);
        }

        // Pressure lag on the potential lift.
        let alpha_e = self.alpha_effective(&s, x);
        let cl_p = cla * (alpha_e - alpha0) + self.non_circulatory_lift(&s);
        dx[2] = (cl_p - x[2]) / (p.tp0 * tu);

        // Boundary-layer lag on the separation point.
        let alpha_f = x[2] / cla + alpha0;
        dx[3] = (self.closure.f_st(alpha_f) - x[3]) / (p.tf0 * tu);

        Ok(dx)
    }

    fn outputs(&self, t: f64, x: &MhhState) -> StallCoefficients {
        let s = self.inflow.sample(t);
        let c = &self.closure;
        let alpha_e = self.alpha_effective(&s, x);
        let fs = x[3];

        let cl = c.cl_inv(alpha_e) * fs
            + c.cl_fs(alpha_e) * (1.0 - fs)
            + self.non_circulatory_lift(&s);

        // Separation drag uses the static and lagged separation points.
        let f_e = c.f_st(alpha_e);
        let delta_cd_f = 0.5 * (f_e.clamp(0.0, 1.0).sqrt() - fs.clamp(0.0, 1.0).sqrt())
            - 0.25 * (f_e - fs);
        let cd_e = c.cd(alpha_e);
        let cd = cd_e + (s.alpha_34 - alpha_e) * cl + (cd_e - c.cd(c.alpha0())) * delta_cd_f;

        StallCoefficients {
            cl,
            cd: Some(cd),
            separation: fs,
            alpha_effective: alpha_e,
        }
    }
}
