//! Run manifests and content-based run IDs.

use std::path::Path;

use ds_project::schema::Scenario;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AppError, AppResult};
use crate::run_service::{RunResult, SOLVER_VERSION};

/// Description of a finished run, written next to its CSV output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: String,
    pub scenario: String,
    pub timestamp: String,
    pub solver_version: String,
    pub models: Vec<String>,
    pub n_points: usize,
}

impl RunManifest {
    pub fn new(scenario: &Scenario, result: &RunResult) -> Self {
        Self {
            run_id: compute_run_id(scenario, SOLVER_VERSION),
            scenario: scenario.name.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            solver_version: SOLVER_VERSION.to_string(),
            models: result.series.iter().map(|s| s.model.clone()).collect(),
            n_points: result.t.len(),
        }
    }
}

/// SHA-256 of the scenario's JSON form and the solver version, hex encoded.
pub fn compute_run_id(scenario: &Scenario, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let scenario_json = serde_json::to_string(scenario).unwrap_or_default();
    hasher.update(scenario_json.as_bytes());
    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Write a manifest as pretty-printed JSON.
pub fn write_manifest(path: &Path, manifest: &RunManifest) -> AppResult<()> {
    let content = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, content).map_err(|e| AppError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ds_project::schema::*;

    fn scenario(name: &str) -> Scenario {
        Scenario {
            version: ds_project::LATEST_VERSION,
            name: name.to_string(),
            chord_m: 1.0,
            airfoil: AirfoilDef::Kirchhoff {
                cl_alpha: 6.0,
                alpha0_deg: 0.0,
                onset_deg: 10.0,
                width_deg: 5.0,
                cd0: 0.008,
                cd_sep: 1.8,
            },
            inflow: InflowDef::Constant {
                u_mps: 10.0,
                alpha_deg: 5.0,
            },
            models: ModelsDef {
                mhh: Some(MhhDef::default()),
                oye: None,
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
    fn hash_stability() {
        let s = scenario("a");
        assert_eq!(compute_run_id(&s, "v1"), compute_run_id(&s, "v1"));
        assert_eq!(compute_run_id(&s, "v1").len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let a = scenario("a");
        let b = scenario("b");
        assert_ne!(compute_run_id(&a, "v1"), compute_run_id(&b, "v1"));
        assert_ne!(compute_run_id(&a, "v1"), compute_run_id(&a, "v2"));
    }

    #[test]
    fn manifest_roundtrip() {
        let s = scenario("manifest");
        let result = crate::run_service::run_scenario(&s).unwrap();
        let manifest = RunManifest::new(&s, &result);
        assert_eq!(manifest.models, vec!["mhh".to_string()]);
        assert_eq!(manifest.n_points, 11);

        let path = std::env::temp_dir().join("ds_app_manifest_test.json");
        write_manifest(&path, &manifest).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: RunManifest = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded, manifest);
    }
}
