//! Scenario schema definitions.
//!
//! Angles are stored in degrees and times in seconds; the application layer
//! converts to radians when it builds the models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub chord_m: f64,
    pub airfoil: AirfoilDef,
    pub inflow: InflowDef,
    #[serde(default)]
    pub models: ModelsDef,
    pub time: TimeDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum AirfoilDef {
    /// Analytic Kirchhoff-flow airfoil.
    Kirchhoff {
        #[serde(default = "default_cl_alpha")]
        cl_alpha: f64,
        #[serde(default)]
        alpha0_deg: f64,
        onset_deg: f64,
        width_deg: f64,
        #[serde(default = "default_cd0")]
        cd0: f64,
        #[serde(default = "default_cd_sep")]
        cd_sep: f64,
    },
    /// Polar rows `[alpha_deg, cl, cd]`.
    Table { rows: Vec<[f64; 3]> },
}

fn default_cl_alpha() -> f64 {
    2.0 * std::f64::consts::PI
}

fn default_cd0() -> f64 {
    0.008
}

fn default_cd_sep() -> f64 {
    1.8
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum InflowDef {
    Constant {
        u_mps: f64,
        alpha_deg: f64,
    },
    Step {
        u_mps: f64,
        alpha_from_deg: f64,
        alpha_to_deg: f64,
        #[serde(default)]
        t_step_s: f64,
        /// Ramp duration; one tenth of a convective time unit when omitted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rise_time_s: Option<f64>,
        /// Both angles are offsets from the airfoil's zero-lift angle.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        relative_to_zero_lift: bool,
    },
    Harmonic {
        u_mps: f64,
        mean_deg: MeanAngles,
        amplitude_deg: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        omega_rad_s: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reduced_frequency: Option<f64>,
        #[serde(default)]
        phase_deg: f64,
    },
    Sampled {
        t_s: Vec<f64>,
        alpha_deg: Vec<f64>,
        u_mps: f64,
        /// Velocity at each sample time; overrides `u_mps` when present.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        u_series_mps: Option<Vec<f64>>,
    },
}

impl InflowDef {
    /// Velocity used to scale convective quantities (m/s).
    ///
    /// For sampled inflow with a velocity series this is the series mean.
    pub fn reference_velocity_mps(&self) -> f64 {
        match self {
            InflowDef::Constant { u_mps, .. }
            | InflowDef::Step { u_mps, .. }
            | InflowDef::Harmonic { u_mps, .. } => *u_mps,
            InflowDef::Sampled {
                u_mps,
                u_series_mps,
                ..
            } => match u_series_mps {
                Some(series) if !series.is_empty() => {
                    series.iter().sum::<f64>() / series.len() as f64
                }
                _ => *u_mps,
            },
        }
    }
}

/// Mean incidence of a harmonic oscillation, or a list of means run as
/// independent cases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MeanAngles {
    Single(f64),
    Sweep(Vec<f64>),
}

impl MeanAngles {
    pub fn as_slice(&self) -> &[f64] {
        match self {
            MeanAngles::Single(mean) => std::slice::from_ref(mean),
            MeanAngles::Sweep(means) => means,
        }
    }
}

impl From<f64> for MeanAngles {
    fn from(mean: f64) -> Self {
        MeanAngles::Single(mean)
    }
}

impl Scenario {
    /// The independent runs this scenario describes.
    ///
    /// A harmonic inflow sweeping several mean angles yields one single-mean
    /// case per angle, in file order, named after the mean. Any other
    /// scenario is its own single case.
    pub fn cases(&self) -> Vec<Scenario> {
        let means = match &self.inflow {
            InflowDef::Harmonic { mean_deg, .. } if mean_deg.as_slice().len() > 1 => {
                mean_deg.as_slice().to_vec()
            }
            _ => return vec![self.clone()],
        };
        means
            .into_iter()
            .map(|mean| {
                let mut case = self.clone();
                case.name = format!("{} [mean {} deg]", self.name, mean);
                if let InflowDef::Harmonic { mean_deg, .. } = &mut case.inflow {
                    *mean_deg = MeanAngles::Single(mean);
                }
                case
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ModelsDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mhh: Option<MhhDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oye: Option<OyeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MhhDef {
    #[serde(default)]
    pub coefficients: WagnerCoefficientsDef,
    #[serde(default = "default_tp0")]
    pub tp0: f64,
    #[serde(default = "default_tf0")]
    pub tf0: f64,
    #[serde(default)]
    pub added_mass: AddedMassDef,
    #[serde(default)]
    pub zero_inflow: ZeroInflowDef,
}

impl Default for MhhDef {
    fn default() -> Self {
        Self {
            coefficients: WagnerCoefficientsDef::default(),
            tp0: default_tp0(),
            tf0: default_tf0(),
            added_mass: AddedMassDef::default(),
            zero_inflow: ZeroInflowDef::default(),
        }
    }
}

fn default_tp0() -> f64 {
    3.4
}

fn default_tf0() -> f64 {
    6.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum WagnerCoefficientsDef {
    /// A = (0.3, 0.7), b = (0.14, 0.53)
    #[default]
    Nrel,
    /// R.T. Jones flat-plate set
    Jones,
    Custom {
        a1: f64,
        a2: f64,
        b1: f64,
        b2: f64,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AddedMassDef {
    Off,
    #[default]
    PitchRate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZeroInflowDef {
    #[default]
    Freeze,
    Reject,
}

/// Øye time constant, given either in seconds or in chords travelled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OyeDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tau_s: Option<f64>,
    /// `tau = tau_chords · chord / U_ref`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tau_chords: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_end_s: Option<f64>,
    /// End time in convective units `2 U t / c`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_end_convective: Option<f64>,
    #[serde(default = "default_n_points")]
    pub n_points: usize,
    #[serde(default)]
    pub solver: SolverDef,
}

fn default_n_points() -> usize {
    501
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default)]
    pub integrator: IntegratorDef,
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    #[serde(default = "default_atol")]
    pub atol: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_step_s: Option<f64>,
    /// Sub-step of the fixed-step integrators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_s: Option<f64>,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            integrator: IntegratorDef::default(),
            rtol: default_rtol(),
            atol: default_atol(),
            max_step_s: None,
            dt_s: None,
        }
    }
}

fn default_rtol() -> f64 {
    1e-6
}

fn default_atol() -> f64 {
    1e-9
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorDef {
    #[default]
    DormandPrince45,
    Rk4,
    ForwardEuler,
}
