//! Scenario validation logic.
//!
//! The models accept any parameter set; this is where malformed scenarios are
//! turned away before anything is built from them.

use crate::schema::{
    AirfoilDef, InflowDef, MhhDef, ModelsDef, OyeDef, Scenario, TimeDef, WagnerCoefficientsDef,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing value: {field} ({reason})")]
    Missing { field: String, reason: String },

    #[error("Conflicting values: {fields} ({reason})")]
    Conflict { fields: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

/// Largest accepted `|A1 + A2 − 1|` for custom Wagner coefficients.
pub const WAGNER_SUM_TOLERANCE: f64 = 0.5;

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }
    positive("chord_m", scenario.chord_m)?;

    validate_airfoil(&scenario.airfoil)?;
    validate_inflow(&scenario.inflow)?;
    validate_models(&scenario.models, &scenario.inflow)?;
    validate_time(&scenario.time, &scenario.inflow)?;
    Ok(())
}

fn validate_airfoil(airfoil: &AirfoilDef) -> Result<(), ValidationError> {
    match airfoil {
        AirfoilDef::Kirchhoff {
            cl_alpha,
            alpha0_deg,
            onset_deg,
            width_deg,
            cd0,
            cd_sep,
        } => {
            positive("airfoil.cl_alpha", *cl_alpha)?;
            finite("airfoil.alpha0_deg", *alpha0_deg)?;
            positive("airfoil.onset_deg", *onset_deg)?;
            positive("airfoil.width_deg", *width_deg)?;
            finite("airfoil.cd0", *cd0)?;
            finite("airfoil.cd_sep", *cd_sep)?;
        }
        AirfoilDef::Table { rows } => {
            if rows.len() < 3 {
                return Err(ValidationError::InvalidValue {
                    field: "airfoil.rows".to_string(),
                    value: rows.len().to_string(),
                    reason: "at least 3 polar rows required".to_string(),
                });
            }
            for (i, row) in rows.iter().enumerate() {
                for v in row {
                    finite(&format!("airfoil.rows[{i}]"), *v)?;
                }
            }
            increasing("airfoil.rows alpha", rows.iter().map(|r| r[0]))?;
        }
    }
    Ok(())
}

fn validate_inflow(inflow: &InflowDef) -> Result<(), ValidationError> {
    match inflow {
        InflowDef::Constant { u_mps, alpha_deg } => {
            non_negative("inflow.u_mps", *u_mps)?;
            finite("inflow.alpha_deg", *alpha_deg)?;
        }
        InflowDef::Step {
            u_mps,
            alpha_from_deg,
            alpha_to_deg,
            t_step_s,
            rise_time_s,
            ..
        } => {
            non_negative("inflow.u_mps", *u_mps)?;
            finite("inflow.alpha_from_deg", *alpha_from_deg)?;
            finite("inflow.alpha_to_deg", *alpha_to_deg)?;
            finite("inflow.t_step_s", *t_step_s)?;
            if let Some(rise) = rise_time_s {
                non_negative("inflow.rise_time_s", *rise)?;
            } else if !(*u_mps > 0.0) {
                return Err(ValidationError::Missing {
                    field: "inflow.rise_time_s".to_string(),
                    reason: "the default ramp scales with the inflow velocity, which is zero"
                        .to_string(),
                });
            }
        }
        InflowDef::Harmonic {
            u_mps,
            mean_deg,
            amplitude_deg,
            omega_rad_s,
            reduced_frequency,
            phase_deg,
        } => {
            non_negative("inflow.u_mps", *u_mps)?;
            if mean_deg.as_slice().is_empty() {
                return Err(ValidationError::Missing {
                    field: "inflow.mean_deg".to_string(),
                    reason: "a mean angle sweep needs at least one angle".to_string(),
                });
            }
            for (i, mean) in mean_deg.as_slice().iter().enumerate() {
                finite(&format!("inflow.mean_deg[{i}]"), *mean)?;
            }
            finite("inflow.amplitude_deg", *amplitude_deg)?;
            finite("inflow.phase_deg", *phase_deg)?;
            match (omega_rad_s, reduced_frequency) {
                (Some(omega), None) => non_negative("inflow.omega_rad_s", *omega)?,
                (None, Some(k)) => {
                    non_negative("inflow.reduced_frequency", *k)?;
                    positive("inflow.u_mps", *u_mps)?;
                }
                (Some(_), Some(_)) => {
                    return Err(ValidationError::Conflict {
                        fields: "inflow.omega_rad_s, inflow.reduced_frequency".to_string(),
                        reason: "give the frequency one way only".to_string(),
                    });
                }
                (None, None) => {
                    return Err(ValidationError::Missing {
                        field: "inflow.omega_rad_s or inflow.reduced_frequency".to_string(),
                        reason: "harmonic inflow needs a frequency".to_string(),
                    });
                }
            }
        }
        InflowDef::Sampled {
            t_s,
            alpha_deg,
            u_mps,
            u_series_mps,
        } => {
            if t_s.len() < 2 {
                return Err(ValidationError::InvalidValue {
                    field: "inflow.t_s".to_string(),
                    value: t_s.len().to_string(),
                    reason: "at least 2 samples required".to_string(),
                });
            }
            same_length("inflow.alpha_deg", t_s.len(), alpha_deg.len())?;
            for v in t_s {
                finite("inflow.t_s", *v)?;
            }
            for v in alpha_deg {
                finite("inflow.alpha_deg", *v)?;
            }
            increasing("inflow.t_s", t_s.iter().copied())?;
            non_negative("inflow.u_mps", *u_mps)?;
            if let Some(series) = u_series_mps {
                same_length("inflow.u_series_mps", t_s.len(), series.len())?;
                for v in series {
                    non_negative("inflow.u_series_mps", *v)?;
                }
            }
        }
    }
    Ok(())
}

fn validate_models(models: &ModelsDef, inflow: &InflowDef) -> Result<(), ValidationError> {
    if models.mhh.is_none() && models.oye.is_none() {
        return Err(ValidationError::Missing {
            field: "models".to_string(),
            reason: "select at least one of mhh, oye".to_string(),
        });
    }
    if let Some(mhh) = &models.mhh {
        validate_mhh(mhh)?;
    }
    if let Some(oye) = &models.oye {
        validate_oye(oye, inflow)?;
    }
    Ok(())
}

fn validate_mhh(mhh: &MhhDef) -> Result<(), ValidationError> {
    if let WagnerCoefficientsDef::Custom { a1, a2, b1, b2 } = mhh.coefficients {
        finite("models.mhh.coefficients.a1", a1)?;
        finite("models.mhh.coefficients.a2", a2)?;
        positive("models.mhh.coefficients.b1", b1)?;
        positive("models.mhh.coefficients.b2", b2)?;
        let excess = (a1 + a2 - 1.0).abs();
        if excess > WAGNER_SUM_TOLERANCE {
            return Err(ValidationError::InvalidValue {
                field: "models.mhh.coefficients.a1 + a2".to_string(),
                value: (a1 + a2).to_string(),
                reason: format!("must be within {WAGNER_SUM_TOLERANCE} of 1"),
            });
        }
    }
    positive("models.mhh.tp0", mhh.tp0)?;
    positive("models.mhh.tf0", mhh.tf0)?;
    Ok(())
}

fn validate_oye(oye: &OyeDef, inflow: &InflowDef) -> Result<(), ValidationError> {
    match (oye.tau_s, oye.tau_chords) {
        (Some(tau), None) => positive("models.oye.tau_s", tau),
        (None, Some(k)) => {
            positive("models.oye.tau_chords", k)?;
            positive("inflow reference velocity", inflow.reference_velocity_mps())
        }
        (Some(_), Some(_)) => Err(ValidationError::Conflict {
            fields: "models.oye.tau_s, models.oye.tau_chords".to_string(),
            reason: "give the time constant one way only".to_string(),
        }),
        (None, None) => Err(ValidationError::Missing {
            field: "models.oye.tau_s or models.oye.tau_chords".to_string(),
            reason: "the Øye model needs a time constant".to_string(),
        }),
    }
}

fn validate_time(time: &TimeDef, inflow: &InflowDef) -> Result<(), ValidationError> {
    match (time.t_end_s, time.t_end_convective) {
        (Some(t), None) => positive("time.t_end_s", t)?,
        (None, Some(tau)) => {
            positive("time.t_end_convective", tau)?;
            positive("inflow reference velocity", inflow.reference_velocity_mps())?;
        }
        (Some(_), Some(_)) => {
            return Err(ValidationError::Conflict {
                fields: "time.t_end_s, time.t_end_convective".to_string(),
                reason: "give the end time one way only".to_string(),
            });
        }
        (None, None) => {
            return Err(ValidationError::Missing {
                field: "time.t_end_s or time.t_end_convective".to_string(),
                reason: "the run needs an end time".to_string(),
            });
        }
    }
    if time.n_points < 2 {
        return Err(ValidationError::InvalidValue {
            field: "time.n_points".to_string(),
            value: time.n_points.to_string(),
            reason: "at least 2 output points required".to_string(),
        });
    }

    let solver = &time.solver;
    non_negative("time.solver.rtol", solver.rtol)?;
    non_negative("time.solver.atol", solver.atol)?;
    if solver.rtol + solver.atol <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "time.solver.rtol + atol".to_string(),
            value: "0".to_string(),
            reason: "tolerances must not both be zero".to_string(),
        });
    }
    if let Some(h) = solver.max_step_s {
        positive("time.solver.max_step_s", h)?;
    }
    if let Some(dt) = solver.dt_s {
        positive("time.solver.dt_s", dt)?;
    }
    Ok(())
}

fn finite(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: v.to_string(),
            reason: "must be finite".to_string(),
        })
    }
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    finite(field, v)?;
    if v > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: v.to_string(),
            reason: "must be positive".to_string(),
        })
    }
}

fn non_negative(field: &str, v: f64) -> Result<(), ValidationError> {
    finite(field, v)?;
    if v >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: v.to_string(),
            reason: "must not be negative".to_string(),
        })
    }
}

fn same_length(field: &str, expected: usize, got: usize) -> Result<(), ValidationError> {
    if expected == got {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: got.to_string(),
            reason: format!("expected {expected} entries to match the sample times"),
        })
    }
}

fn increasing(field: &str, values: impl Iterator<Item = f64>) -> Result<(), ValidationError> {
    let mut prev: Option<f64> = None;
    for v in values {
        if let Some(p) = prev {
            if v <= p {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    value: v.to_string(),
                    reason: "values must be strictly increasing".to_string(),
                });
            }
        }
        prev = Some(v);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::LATEST_VERSION;
    use crate::schema::{MeanAngles, SolverDef};

    fn scenario() -> Scenario {
        Scenario {
            version: LATEST_VERSION,
            name: "step".to_string(),
            chord_m: 0.1591,
            airfoil: AirfoilDef::Kirchhoff {
                cl_alpha: 6.28,
                alpha0_deg: -1.0,
                onset_deg: 10.0,
                width_deg: 6.0,
                cd0: 0.008,
                cd_sep: 1.8,
            },
            inflow: InflowDef::Step {
                u_mps: 10.0,
                alpha_from_deg: -1.0,
                alpha_to_deg: 1.0,
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
                t_end_convective: Some(30.0),
                n_points: 100,
                solver: SolverDef::default(),
            },
        }
    }

    #[test]
    fn valid_scenario_passes() {
        validate_scenario(&scenario()).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let mut s = scenario();
        s.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_chord() {
        let mut s = scenario();
        s.chord_m = 0.0;
        assert!(validate_scenario(&s).is_err());
        s.chord_m = f64::NAN;
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn rejects_wagner_sum_far_from_one() {
        let mut s = scenario();
        s.models.mhh = Some(MhhDef {
            coefficients: WagnerCoefficientsDef::Custom {
                a1: 1.0,
                a2: 0.7,
                b1: 0.14,
                b2: 0.53,
            },
            ..MhhDef::default()
        });
        let err = validate_scenario(&s).unwrap_err();
        assert!(err.to_string().contains("a1 + a2"));
    }

    #[test]
    fn jones_preset_is_accepted() {
        let mut s = scenario();
        s.models.mhh = Some(MhhDef {
            coefficients: WagnerCoefficientsDef::Jones,
            ..MhhDef::default()
        });
        validate_scenario(&s).unwrap();
    }

    #[test]
    fn rejects_non_positive_time_constants() {
        let mut s = scenario();
        s.models.mhh = Some(MhhDef {
            tf0: -1.0,
            ..MhhDef::default()
        });
        assert!(validate_scenario(&s).is_err());

        let mut s = scenario();
        s.models.oye = Some(OyeDef {
            tau_s: Some(0.0),
            tau_chords: None,
        });
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn rejects_conflicting_oye_time_constant() {
        let mut s = scenario();
        s.models.oye = Some(OyeDef {
            tau_s: Some(0.1),
            tau_chords: Some(3.0),
        });
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::Conflict { .. })
        ));
    }

    #[test]
    fn requires_a_model() {
        let mut s = scenario();
        s.models = ModelsDef::default();
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::Missing { .. })
        ));
    }

    #[test]
    fn requires_two_output_points() {
        let mut s = scenario();
        s.time.n_points = 1;
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn table_rows_must_increase() {
        let mut s = scenario();
        s.airfoil = AirfoilDef::Table {
            rows: vec![[0.0, 0.0, 0.01], [5.0, 0.5, 0.01], [5.0, 0.6, 0.01]],
        };
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn sampled_lengths_must_match() {
        let mut s = scenario();
        s.inflow = InflowDef::Sampled {
            t_s: vec![0.0, 1.0, 2.0],
            alpha_deg: vec![0.0, 1.0],
            u_mps: 10.0,
            u_series_mps: None,
        };
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn harmonic_needs_exactly_one_frequency() {
        let mut s = scenario();
        s.inflow = InflowDef::Harmonic {
            u_mps: 10.0,
            mean_deg: 10.0.into(),
            amplitude_deg: 5.0,
            omega_rad_s: None,
            reduced_frequency: None,
            phase_deg: 0.0,
        };
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn mean_sweep_needs_finite_angles() {
        let harmonic = |means: Vec<f64>| InflowDef::Harmonic {
            u_mps: 10.0,
            mean_deg: MeanAngles::Sweep(means),
            amplitude_deg: 4.5,
            omega_rad_s: None,
            reduced_frequency: Some(0.05),
            phase_deg: 0.0,
        };
        let mut s = scenario();
        s.inflow = harmonic(vec![-0.5, 9.5]);
        assert!(validate_scenario(&s).is_ok());

        s.inflow = harmonic(vec![]);
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::Missing { .. })
        ));

        s.inflow = harmonic(vec![2.0, f64::NAN]);
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::InvalidValue { field, .. }) if field == "inflow.mean_deg[1]"
        ));
    }

    #[test]
    fn convective_end_time_needs_flow() {
        let mut s = scenario();
        s.inflow = InflowDef::Constant {
            u_mps: 0.0,
            alpha_deg: 5.0,
        };
        s.models.oye = None;
        assert!(validate_scenario(&s).is_err());
    }
}
