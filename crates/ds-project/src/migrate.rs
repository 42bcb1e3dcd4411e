//! Schema migration framework.

use crate::ProjectError;
use crate::schema::Scenario;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    while scenario.version < LATEST_VERSION {
        scenario = migrate_one_version(scenario)?;
    }
    Ok(scenario)
}

fn migrate_one_version(scenario: Scenario) -> Result<Scenario, ProjectError> {
    match scenario.version {
        0 => migrate_v0_to_v1(scenario),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 files predate the versioned format and are otherwise identical.
fn migrate_v0_to_v1(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    scenario.version = 1;
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AirfoilDef, InflowDef, ModelsDef, OyeDef, SolverDef, TimeDef};

    fn scenario(version: u32) -> Scenario {
        Scenario {
            version,
            name: "test".to_string(),
            chord_m: 1.0,
            airfoil: AirfoilDef::Kirchhoff {
                cl_alpha: 6.28,
                alpha0_deg: 0.0,
                onset_deg: 10.0,
                width_deg: 5.0,
                cd0: 0.01,
                cd_sep: 1.8,
            },
            inflow: InflowDef::Constant {
                u_mps: 10.0,
                alpha_deg: 5.0,
            },
            models: ModelsDef {
                mhh: None,
                oye: Some(OyeDef {
                    tau_s: Some(0.3),
                    tau_chords: None,
                }),
            },
            time: TimeDef {
                t_end_s: Some(1.0),
                t_end_convective: None,
                n_points: 11,
                solver: SolverDef::default(),
            },
        }
    }

    #[test]
    fn migrate_latest_is_noop() {
        let s = scenario(LATEST_VERSION);
        let migrated = migrate_to_latest(s.clone()).unwrap();
        assert_eq!(migrated, s);
    }

    #[test]
    fn migrate_unversioned_file() {
        let migrated = migrate_to_latest(scenario(0)).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        assert_eq!(migrated.name, "test");
    }
}
