//! Scenario compilation: schema definitions to bound models.
//!
//! Everything here converts from the file conventions (degrees, seconds,
//! chords travelled) to the radians and seconds used by the model crates.

use std::sync::Arc;

use ds_aero::{AeroClosure, KirchhoffAirfoil, TabulatedPolar};
use ds_core::{deg_to_rad, m, mps};
use ds_inputs::{ConstantInflow, HarmonicInflow, InflowTrajectory, SampledInflow, StepInflow};
use ds_models::wagner::{JONES_A1, JONES_A2, JONES_B1, JONES_B2};
use ds_models::{AddedMass, MhhModel, MhhParams, OyeModel, OyeParams, ZeroInflowPolicy};
use ds_project::schema::{
    AddedMassDef, AirfoilDef, InflowDef, IntegratorDef, MhhDef, OyeDef, Scenario, SolverDef,
    TimeDef, WagnerCoefficientsDef, ZeroInflowDef,
};
use ds_sim::{IntegratorType, SimOptions, linspace};
use tracing::debug;
use uom::si::angular_velocity::radian_per_second;
use uom::si::time::second;

use crate::error::{AppError, AppResult};

/// MHH model over the scenario's shared closure and inflow.
pub type SharedMhh = MhhModel<Arc<dyn AeroClosure>, Arc<dyn InflowTrajectory>>;

/// Øye model over the scenario's shared closure and inflow.
pub type SharedOye = OyeModel<Arc<dyn AeroClosure>, Arc<dyn InflowTrajectory>>;

/// Ramp duration of a step without an explicit rise time, in convective time units.
const DEFAULT_RISE_TU: f64 = 0.1;

/// A scenario ready to run.
#[derive(Clone)]
pub struct CompiledScenario {
    pub name: String,
    /// Chord length (m)
    pub chord: f64,
    pub closure: Arc<dyn AeroClosure>,
    pub inflow: Arc<dyn InflowTrajectory>,
    pub mhh: Option<MhhParams>,
    pub oye: Option<OyeParams>,
    /// Output time grid (s)
    pub grid: Vec<f64>,
    pub options: SimOptions,
}

impl CompiledScenario {
    pub fn mhh_model(&self) -> Option<SharedMhh> {
        self.mhh
            .map(|p| MhhModel::new(p, self.closure.clone(), self.inflow.clone()))
    }

    pub fn oye_model(&self) -> Option<SharedOye> {
        self.oye
            .map(|p| OyeModel::new(p, self.closure.clone(), self.inflow.clone()))
    }

    /// Names of the enabled models, in run order.
    pub fn model_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.mhh.is_some() {
            names.push("mhh");
        }
        if self.oye.is_some() {
            names.push("oye");
        }
        names
    }
}

/// Validate and compile a scenario.
pub fn compile_scenario(scenario: &Scenario) -> AppResult<CompiledScenario> {
    ds_project::validate_scenario(scenario)?;

    let chord = scenario.chord_m;
    let u_ref = scenario.inflow.reference_velocity_mps();

    let closure = build_closure(&scenario.airfoil)?;
    let inflow = build_inflow(&scenario.inflow, chord, closure.alpha0())?;

    let mhh = scenario.models.mhh.as_ref().map(|def| mhh_params(def, chord));
    let oye = scenario
        .models
        .oye
        .as_ref()
        .map(|def| oye_params(def, chord, u_ref))
        .transpose()?;

    let t_end = end_time(&scenario.time, chord, u_ref)?;
    let grid = linspace(0.0, t_end, scenario.time.n_points);

    let mut options = sim_options(&scenario.time.solver);
    if let Some(rise) = step_rise_time(&scenario.inflow, chord) {
        // Adaptive steps must not jump over the ramp.
        if options.integrator == IntegratorType::DormandPrince45
            && rise > 0.0
            && options.max_step > rise
        {
            debug!(rise_time_s = rise, "limiting max step to the step ramp");
            options.max_step = rise;
        }
    }

    debug!(
        scenario = %scenario.name,
        t_end_s = t_end,
        n_points = grid.len(),
        "scenario compiled"
    );

    Ok(CompiledScenario {
        name: scenario.name.clone(),
        chord,
        closure,
        inflow,
        mhh,
        oye,
        grid,
        options,
    })
}

/// Validate a scenario and compile each of its cases.
///
/// Cases differ only in their mean angle, so they share one output grid and
/// one set of solver options.
pub fn compile_cases(scenario: &Scenario) -> AppResult<Vec<CompiledScenario>> {
    scenario.cases().iter().map(compile_scenario).collect()
}

/// Build the aero closure of an airfoil definition.
pub fn build_closure(def: &AirfoilDef) -> AppResult<Arc<dyn AeroClosure>> {
    match def {
        AirfoilDef::Kirchhoff {
            cl_alpha,
            alpha0_deg,
            onset_deg,
            width_deg,
            cd0,
            cd_sep,
        } => {
            let airfoil = KirchhoffAirfoil::new(
                *cl_alpha,
                deg_to_rad(*alpha0_deg),
                deg_to_rad(*onset_deg),
                deg_to_rad(*width_deg),
                *cd0,
                *cd_sep,
            )?;
            Ok(Arc::new(airfoil))
        }
        AirfoilDef::Table { rows } => {
            let rows: Vec<(f64, f64, f64)> = rows.iter().map(|r| (r[0], r[1], r[2])).collect();
            Ok(Arc::new(TabulatedPolar::from_degrees(&rows)?))
        }
    }
}

/// Build the inflow trajectory of an inflow definition.
///
/// `alpha0` is the airfoil's zero-lift angle (rad), the origin of steps given
/// relative to zero lift.
pub fn build_inflow(
    def: &InflowDef,
    chord: f64,
    alpha0: f64,
) -> AppResult<Arc<dyn InflowTrajectory>> {
    match def {
        InflowDef::Constant { u_mps, alpha_deg } => {
            Ok(Arc::new(ConstantInflow::new(*u_mps, deg_to_rad(*alpha_deg))))
        }
        InflowDef::Step {
            u_mps,
            alpha_from_deg,
            alpha_to_deg,
            t_step_s,
            relative_to_zero_lift,
            ..
        } => {
            let rise = step_rise_time(def, chord).unwrap_or(0.0);
            let origin = if *relative_to_zero_lift { alpha0 } else { 0.0 };
            Ok(Arc::new(StepInflow::new(
                *u_mps,
                origin + deg_to_rad(*alpha_from_deg),
                origin + deg_to_rad(*alpha_to_deg),
                *t_step_s,
                rise,
            )?))
        }
        InflowDef::Harmonic {
            u_mps,
            mean_deg,
            amplitude_deg,
            omega_rad_s,
            reduced_frequency,
            phase_deg,
        } => {
            let mean = match mean_deg.as_slice() {
                [mean] => *mean,
                means => {
                    return Err(AppError::InvalidInput(format!(
                        "harmonic inflow sweeps {} mean angles; compile its cases one at a time",
                        means.len()
                    )));
                }
            };
            let omega = match (omega_rad_s, reduced_frequency) {
                (Some(omega), _) => *omega,
                (None, Some(k)) => ds_core::omega_from_reduced_frequency(*k, m(chord), mps(*u_mps))
                    .get::<radian_per_second>(),
                (None, None) => {
                    return Err(AppError::InvalidInput(
                        "harmonic inflow needs omega_rad_s or reduced_frequency".to_string(),
                    ));
                }
            };
            Ok(Arc::new(HarmonicInflow::new(
                *u_mps,
                deg_to_rad(mean),
                deg_to_rad(*amplitude_deg),
                omega,
                deg_to_rad(*phase_deg),
            )?))
        }
        InflowDef::Sampled {
            t_s,
            alpha_deg,
            u_mps,
            u_series_mps,
        } => {
            let alpha = alpha_deg.iter().map(|&a| deg_to_rad(a)).collect();
            let inflow = match u_series_mps {
                Some(u) => SampledInflow::with_velocity(t_s.clone(), alpha, u.clone())?,
                None => SampledInflow::new(t_s.clone(), alpha, *u_mps)?,
            };
            Ok(Arc::new(inflow))
        }
    }
}

/// Ramp duration of a step inflow (s); `None` for other inflow kinds.
fn step_rise_time(def: &InflowDef, chord: f64) -> Option<f64> {
    match def {
        InflowDef::Step {
            u_mps, rise_time_s, ..
        } => Some(rise_time_s.unwrap_or_else(|| {
            DEFAULT_RISE_TU * ds_core::convective_time_unit(m(chord), mps(*u_mps)).get::<second>()
        })),
        _ => None,
    }
}

pub fn mhh_params(def: &MhhDef, chord: f64) -> MhhParams {
    let base = MhhParams::new(chord);
    let (a1, a2, b1, b2) = match def.coefficients {
        WagnerCoefficientsDef::Nrel => (base.a1, base.a2, base.b1, base.b2),
        WagnerCoefficientsDef::Jones => (JONES_A1, JONES_A2, JONES_B1, JONES_B2),
        WagnerCoefficientsDef::Custom { a1, a2, b1, b2 } => (a1, a2, b1, b2),
    };
    let added_mass = match def.added_mass {
        AddedMassDef::Off => AddedMass::Off,
        AddedMassDef::PitchRate => AddedMass::PitchRate,
    };
    let zero_inflow = match def.zero_inflow {
        ZeroInflowDef::Freeze => ZeroInflowPolicy::Freeze,
        ZeroInflowDef::Reject => ZeroInflowPolicy::Reject,
    };
    MhhParams {
        a1,
        a2,
        b1,
        b2,
        ..base
    }
    .with_time_constants(def.tp0, def.tf0)
    .with_added_mass(added_mass)
    .with_zero_inflow(zero_inflow)
}

/// Øye time constant from seconds or chords travelled at `u_ref`.
pub fn oye_params(def: &OyeDef, chord: f64, u_ref: f64) -> AppResult<OyeParams> {
    match (def.tau_s, def.tau_chords) {
        (Some(tau), None) => Ok(OyeParams::new(tau)),
        (None, Some(k)) if u_ref > 0.0 => Ok(OyeParams::from_chord(k, chord, u_ref)),
        (None, Some(_)) => Err(AppError::InvalidInput(
            "oye.tau_chords needs a positive reference velocity".to_string(),
        )),
        _ => Err(AppError::InvalidInput(
            "oye needs exactly one of tau_s and tau_chords".to_string(),
        )),
    }
}

/// End time of the run (s).
pub fn end_time(time: &TimeDef, chord: f64, u_ref: f64) -> AppResult<f64> {
    match (time.t_end_s, time.t_end_convective) {
        (Some(t), None) => Ok(t),
        (None, Some(tau)) if u_ref > 0.0 => {
            Ok(ds_models::wagner::physical_time(u_ref, chord, tau))
        }
        (None, Some(_)) => Err(AppError::InvalidInput(
            "time.t_end_convective needs a positive reference velocity".to_string(),
        )),
        _ => Err(AppError::InvalidInput(
            "time needs exactly one of t_end_s and t_end_convective".to_string(),
        )),
    }
}

pub fn sim_options(def: &SolverDef) -> SimOptions {
    let defaults = SimOptions::default();
    SimOptions {
        integrator: match def.integrator {
            IntegratorDef::DormandPrince45 => IntegratorType::DormandPrince45,
            IntegratorDef::Rk4 => IntegratorType::RK4,
            IntegratorDef::ForwardEuler => IntegratorType::ForwardEuler,
        },
        rtol: def.rtol,
        atol: def.atol,
        max_step: def.max_step_s.unwrap_or(defaults.max_step),
        dt: def.dt_s.unwrap_or(defaults.dt),
        ..defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ds_project::schema::{MeanAngles, ModelsDef};

    fn scenario() -> Scenario {
        Scenario {
            version: ds_project::LATEST_VERSION,
            name: "compile".to_string(),
            chord_m: 0.2,
            airfoil: AirfoilDef::Kirchhoff {
                cl_alpha: 2.0 * std::f64::consts::PI,
                alpha0_deg: -1.0,
                onset_deg: 10.0,
                width_deg: 5.0,
                cd0: 0.008,
                cd_sep: 1.8,
            },
            inflow: InflowDef::Step {
                u_mps: 10.0,
                alpha_from_deg: 0.0,
                alpha_to_deg: 4.0,
                t_step_s: 0.0,
                rise_time_s: None,
                relative_to_zero_lift: false,
            },
            models: ModelsDef {
                mhh: Some(MhhDef::default()),
                oye: Some(OyeDef {
                    tau_s: None,
                    tau_chords: Some(3.0),
                }),
            },
            time: TimeDef {
                t_end_s: None,
                t_end_convective: Some(20.0),
                n_points: 11,
                solver: SolverDef::default(),
            },
        }
    }

    #[test]
    fn compiles_step_scenario() {
        let c = compile_scenario(&scenario()).unwrap();
        // Tu = 0.2 / 20 = 0.01 s
        assert_eq!(c.grid.len(), 11);
        assert!((c.grid[10] - 0.2).abs() < 1e-12);
        assert!((c.options.max_step - 1e-3).abs() < 1e-15);
        assert_eq!(c.model_names(), vec!["mhh", "oye"]);
        assert!((c.oye.unwrap().tau - 0.06).abs() < 1e-12);
        assert!((c.closure.alpha0() - deg_to_rad(-1.0)).abs() < 1e-15);
    }

    #[test]
    fn step_ramp_uses_convective_default() {
        let c = compile_scenario(&scenario()).unwrap();
        let before = c.inflow.sample(0.0);
        let after = c.inflow.sample(1e-3);
        assert_eq!(before.alpha, 0.0);
        assert!((after.alpha - deg_to_rad(4.0)).abs() < 1e-15);
        let mid = c.inflow.sample(0.5e-3);
        assert!((mid.alpha - deg_to_rad(2.0)).abs() < 1e-12);
    }

    #[test]
    fn invalid_scenario_is_not_compiled() {
        let mut s = scenario();
        s.chord_m = 0.0;
        assert!(matches!(
            compile_scenario(&s),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn harmonic_from_reduced_frequency() {
        let def = InflowDef::Harmonic {
            u_mps: 10.0,
            mean_deg: 10.0.into(),
            amplitude_deg: 5.0,
            omega_rad_s: None,
            reduced_frequency: Some(0.1),
            phase_deg: 90.0,
        };
        let inflow = build_inflow(&def, 0.5, 0.0).unwrap();
        // omega = 2 U k / c = 4 rad/s; the phase starts the oscillation at its peak
        let s0 = inflow.sample(0.0);
        assert!((s0.alpha - deg_to_rad(15.0)).abs() < 1e-12);
        assert!(s0.alpha_dot.abs() < 1e-12);
        let quarter = inflow.sample(std::f64::consts::PI / 8.0);
        assert!((quarter.alpha - deg_to_rad(10.0)).abs() < 1e-12);
    }

    #[test]
    fn step_relative_to_zero_lift() {
        let mut s = scenario();
        s.inflow = InflowDef::Step {
            u_mps: 10.0,
            alpha_from_deg: 0.0,
            alpha_to_deg: 2.0,
            t_step_s: 0.0,
            rise_time_s: Some(0.0),
            relative_to_zero_lift: true,
        };
        let c = compile_scenario(&s).unwrap();
        // Kirchhoff zero-lift angle is -1 deg.
        assert_eq!(c.inflow.sample(0.0).alpha, c.closure.alpha0());
        assert_eq!(c.closure.cl(c.inflow.sample(0.0).alpha), 0.0);
        let after = c.inflow.sample(1.0).alpha;
        assert!((after - deg_to_rad(1.0)).abs() < 1e-15);
    }

    #[test]
    fn mean_sweep_compiles_one_case_per_mean() {
        let mut s = scenario();
        s.inflow = InflowDef::Harmonic {
            u_mps: 10.0,
            mean_deg: MeanAngles::Sweep(vec![-0.5, 9.5]),
            amplitude_deg: 4.5,
            omega_rad_s: None,
            reduced_frequency: Some(0.05),
            phase_deg: 0.0,
        };
        assert!(matches!(
            compile_scenario(&s),
            Err(AppError::InvalidInput(_))
        ));

        let cases = compile_cases(&s).unwrap();
        assert_eq!(cases.len(), 2);
        for (c, mean) in cases.iter().zip([-0.5, 9.5]) {
            assert!((c.inflow.sample(0.0).alpha - deg_to_rad(mean)).abs() < 1e-15);
            assert_eq!(c.grid, cases[0].grid);
            assert_eq!(c.options.max_step, cases[0].options.max_step);
        }
    }

    #[test]
    fn table_airfoil_in_degrees() {
        let def = AirfoilDef::Table {
            rows: vec![
                [-10.0, -0.9, 0.012],
                [0.0, 0.1, 0.008],
                [10.0, 1.1, 0.013],
            ],
        };
        let closure = build_closure(&def).unwrap();
        assert!((closure.cl(deg_to_rad(10.0)) - 1.1).abs() < 1e-12);
        assert!((closure.cd(0.0) - 0.008).abs() < 1e-12);
    }

    #[test]
    fn bad_polar_maps_to_compile_error() {
        let def = AirfoilDef::Table {
            rows: vec![[0.0, 0.1, 0.008]],
        };
        assert!(matches!(
            build_closure(&def),
            Err(AppError::Compile { .. })
        ));
    }

    #[test]
    fn mhh_presets() {
        let jones = mhh_params(
            &MhhDef {
                coefficients: WagnerCoefficientsDef::Jones,
                ..MhhDef::default()
            },
            1.0,
        );
        assert_eq!(jones, MhhParams::jones(1.0));

        let custom = mhh_params(
            &MhhDef {
                coefficients: WagnerCoefficientsDef::Custom {
                    a1: 0.2,
                    a2: 0.8,
                    b1: 0.1,
                    b2: 0.6,
                },
                tp0: 1.0,
                tf0: 2.0,
                added_mass: AddedMassDef::Off,
                zero_inflow: ZeroInflowDef::Reject,
            },
            1.0,
        );
        assert_eq!(custom.a2, 0.8);
        assert_eq!(custom.tf0, 2.0);
        assert_eq!(custom.added_mass, AddedMass::Off);
        assert_eq!(custom.zero_inflow, ZeroInflowPolicy::Reject);
    }

    #[test]
    fn solver_mapping() {
        let opts = sim_options(&SolverDef {
            integrator: IntegratorDef::Rk4,
            dt_s: Some(1e-3),
            ..SolverDef::default()
        });
        assert_eq!(opts.integrator, IntegratorType::RK4);
        assert_eq!(opts.dt, 1e-3);
        assert!(opts.max_step.is_infinite());
    }

    #[test]
    fn end_time_variants() {
        let mut time = scenario().time;
        assert!((end_time(&time, 0.2, 10.0).unwrap() - 0.2).abs() < 1e-12);
        assert!(end_time(&time, 0.2, 0.0).is_err());
        time.t_end_s = Some(1.0);
        assert!(end_time(&time, 0.2, 10.0).is_err());
        time.t_end_convective = None;
        assert_eq!(end_time(&time, 0.2, 10.0).unwrap(), 1.0);
    }
}
