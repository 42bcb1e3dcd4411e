//! Integration test: bundled scenarios through the application layer.
//!
//! Test that demonstrates:
//! - every bundled scenario compiles, runs and exports without errors
//! - a mean-angle sweep runs one case per mean, matching single-case runs
//! - the step scenario follows the Wagner function and settles onto the static polar
//! - the steady summary agrees with the static polar when the incidence is at rest
//! - model errors surface as application errors

use std::path::{Path, PathBuf};

use ds_app::{
    AppError, RunManifest, run_cases, run_scenario, steady_summary, wagner_reference, write_csv,
    write_manifest,
};
use ds_models::wagner;
use ds_project::schema::*;

fn scenario_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../scenarios")
        .join(name)
}

fn load(name: &str) -> Scenario {
    ds_project::load(&scenario_path(name))
        .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e))
}

#[test]
fn bundled_scenarios_run_and_export() {
    for name in [
        "step_response.yaml",
        "pitch_oscillation.yaml",
        "sampled_gust.yaml",
        "risoe_r_1792_oscillation.yaml",
    ] {
        let scenario = load(name);
        let results = run_cases(&scenario).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(results.len(), scenario.cases().len(), "{name}");

        for (i, (case, result)) in scenario.cases().iter().zip(&results).enumerate() {
            assert_eq!(result.scenario, case.name);
            assert_eq!(result.t.len(), scenario.time.n_points);
            assert_eq!(result.series.len(), 2, "{name}");
            for s in &result.series {
                assert_eq!(s.cl.len(), result.t.len());
                assert!(s.cl.iter().all(|v| v.is_finite()), "{name} {}", s.model);
                assert!(s.stats.accepted > 0);
            }

            let stem = name.trim_end_matches(".yaml");
            let csv = std::env::temp_dir().join(format!("ds_app_{stem}_{i}.csv"));
            write_csv(&csv, result).unwrap();
            let lines = std::fs::read_to_string(&csv).unwrap().lines().count();
            assert_eq!(lines, result.t.len() + 1);

            let manifest = RunManifest::new(case, result);
            let json = std::env::temp_dir().join(format!("ds_app_{stem}_{i}.json"));
            write_manifest(&json, &manifest).unwrap();
            assert_eq!(manifest.models, vec!["mhh".to_string(), "oye".to_string()]);
        }
    }
}

#[test]
fn mean_sweep_matches_single_case_runs() {
    let scenario = load("risoe_r_1792_oscillation.yaml");
    let cases = scenario.cases();
    assert_eq!(cases.len(), 2);

    let swept = run_cases(&scenario).unwrap();
    for (case, result) in cases.iter().zip(&swept) {
        let single = run_scenario(case).unwrap();
        assert_eq!(result.alpha, single.alpha);
        for model in ["mhh", "oye"] {
            assert_eq!(
                result.series(model).unwrap().cl,
                single.series(model).unwrap().cl,
                "{} {model}",
                case.name
            );
        }
    }

    // The stalled case oscillates about a higher mean lift.
    let mean_cl = |r: &ds_app::RunResult| {
        let cl = &r.series("mhh").unwrap().cl;
        cl.iter().sum::<f64>() / cl.len() as f64
    };
    assert!(mean_cl(&swept[1]) > mean_cl(&swept[0]));

    let points = steady_summary(&scenario).unwrap();
    assert_eq!(points.len(), 4);
    assert_eq!(points[0].case, cases[0].name);
    assert_eq!(points[3].case, cases[1].name);
}

#[test]
fn step_scenario_follows_wagner() {
    let scenario = load("step_response.yaml");
    let result = run_scenario(&scenario).unwrap();
    let mhh = result.series("mhh").unwrap();
    let oye = result.series("oye").unwrap();

    let last = result.t.len() - 1;
    let cl_st = result.cl_static[last];
    let ratio = mhh.cl[last] / cl_st;
    assert!(
        (ratio - wagner::jones(30.0)).abs() < 0.02,
        "ratio={ratio} wagner={}",
        wagner::jones(30.0)
    );

    // Øye has no circulatory lag inside the attached range.
    assert!((oye.cl[last] - cl_st).abs() < 1e-9);
    assert!(mhh.cl[0].abs() < 1e-12);
}

#[test]
fn steady_summary_matches_static_polar_at_rest() {
    let scenario = load("step_response.yaml");
    let points = steady_summary(&scenario).unwrap();
    assert_eq!(points.len(), 2);

    let mhh = &points[0];
    assert_eq!(mhh.case, scenario.name);
    assert_eq!(mhh.model, "mhh");
    assert_eq!(mhh.state.len(), 4);
    assert!((mhh.cl - mhh.cl_static).abs() < 1e-12);
    assert!(mhh.cd.is_some());

    let oye = &points[1];
    assert_eq!(oye.model, "oye");
    assert_eq!(oye.state, vec![oye.separation]);
    assert!((oye.cl - oye.cl_static).abs() < 1e-12);
}

#[test]
fn rejected_zero_inflow_is_reported() {
    let scenario = Scenario {
        version: ds_project::LATEST_VERSION,
        name: "still air".to_string(),
        chord_m: 1.0,
        airfoil: AirfoilDef::Kirchhoff {
            cl_alpha: 2.0 * std::f64::consts::PI,
            alpha0_deg: 0.0,
            onset_deg: 10.0,
            width_deg: 5.0,
            cd0: 0.008,
            cd_sep: 1.8,
        },
        inflow: InflowDef::Constant {
            u_mps: 0.0,
            alpha_deg: 5.0,
        },
        models: ModelsDef {
            mhh: Some(MhhDef {
                zero_inflow: ZeroInflowDef::Reject,
                ..MhhDef::default()
            }),
            oye: None,
        },
        time: TimeDef {
            t_end_s: Some(1.0),
            t_end_convective: None,
            n_points: 3,
            solver: SolverDef::default(),
        },
    };

    let err = run_scenario(&scenario).unwrap_err();
    assert!(matches!(err, AppError::Model(_)), "{err}");
}

#[test]
fn wagner_table_reaches_unity() {
    let pts = wagner_reference(200.0, 101).unwrap();
    let last = pts[pts.len() - 1];
    assert!((last.jones - 1.0).abs() < 1e-4);
    assert!((last.garrick - 1.0).abs() < 0.02);
}
