//! Run execution service.

use std::time::Instant;

use ds_models::{DynamicStallModel, StallHistory, simulate, sweep, wagner};
use ds_project::schema::Scenario;
use ds_sim::{SimStats, linspace};
use tracing::{debug, info};

use crate::compile::{CompiledScenario, compile_cases, compile_scenario};
use crate::error::{AppError, AppResult};

/// Version tag folded into run IDs.
pub const SOLVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output series of one dynamic stall model.
#[derive(Debug, Clone)]
pub struct ModelSeries {
    pub model: String,
    pub cl: Vec<f64>,
    /// Drag series, for models that provide drag
    pub cd: Option<Vec<f64>>,
    pub separation: Vec<f64>,
    /// Effective angle of attack (rad)
    pub alpha_effective: Vec<f64>,
    pub stats: SimStats,
}

/// Wall-clock breakdown of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunTiming {
    pub compile_time_s: f64,
    pub solve_time_s: f64,
    pub total_time_s: f64,
}

/// All series of one scenario on its output grid.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub scenario: String,
    /// Output times (s)
    pub t: Vec<f64>,
    /// Geometric angle of attack (rad)
    pub alpha: Vec<f64>,
    /// Quasi-steady lift `Cl_st(α(t))`
    pub cl_static: Vec<f64>,
    pub series: Vec<ModelSeries>,
    pub timing: RunTiming,
}

impl RunResult {
    pub fn series(&self, model: &str) -> Option<&ModelSeries> {
        self.series.iter().find(|s| s.model == model)
    }
}

/// Steady operating point of one model at the start of the run.
#[derive(Debug, Clone)]
pub struct SteadyPoint {
    /// Name of the case the point belongs to
    pub case: String,
    pub model: String,
    /// Geometric angle of attack (rad)
    pub alpha: f64,
    pub state: Vec<f64>,
    pub cl: f64,
    pub cd: Option<f64>,
    pub separation: f64,
    pub cl_static: f64,
}

/// Sample of the Wagner reference curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WagnerPoint {
    /// Convective time `2 U t / c`
    pub tau: f64,
    pub jones: f64,
    pub garrick: f64,
}

/// Compile and run a scenario.
pub fn run_scenario(scenario: &Scenario) -> AppResult<RunResult> {
    let started = Instant::now();
    info!(scenario = %scenario.name, "compiling scenario");
    let compiled = compile_scenario(scenario)?;
    let compile_time_s = started.elapsed().as_secs_f64();

    let mut result = run_compiled(&compiled)?;
    result.timing.compile_time_s = compile_time_s;
    result.timing.total_time_s = started.elapsed().as_secs_f64();
    Ok(result)
}

/// Compile and run every case of a scenario, in case order.
///
/// The cases of a mean-angle sweep are integrated in parallel, one model
/// type at a time. Each result carries the timing of the whole sweep.
pub fn run_cases(scenario: &Scenario) -> AppResult<Vec<RunResult>> {
    let started = Instant::now();
    info!(scenario = %scenario.name, "compiling scenario cases");
    let cases = compile_cases(scenario)?;
    let compile_time_s = started.elapsed().as_secs_f64();

    let Some(first) = cases.first() else {
        return Err(AppError::InvalidInput("scenario has no cases".to_string()));
    };
    let grid = &first.grid;
    let options = &first.options;

    let mhh: Vec<_> = cases.iter().filter_map(CompiledScenario::mhh_model).collect();
    let oye: Vec<_> = cases.iter().filter_map(CompiledScenario::oye_model).collect();
    let mut mhh_runs = sweep(&mhh, grid, options).into_iter();
    let mut oye_runs = sweep(&oye, grid, options).into_iter();

    let solve_time_s = started.elapsed().as_secs_f64() - compile_time_s;
    info!(
        scenario = %scenario.name,
        cases = cases.len(),
        solve_time_s,
        "sweep completed"
    );

    let timing = RunTiming {
        compile_time_s,
        solve_time_s,
        total_time_s: started.elapsed().as_secs_f64(),
    };
    cases
        .iter()
        .map(|case| {
            let mut series = Vec::new();
            if case.mhh.is_some() {
                if let Some(run) = mhh_runs.next() {
                    series.push(model_series("mhh", run?));
                }
            }
            if case.oye.is_some() {
                if let Some(run) = oye_runs.next() {
                    series.push(model_series("oye", run?));
                }
            }
            if series.is_empty() {
                return Err(AppError::InvalidInput(
                    "scenario enables no model".to_string(),
                ));
            }
            let (alpha, cl_static) = static_series(case);
            Ok(RunResult {
                scenario: case.name.clone(),
                t: grid.clone(),
                alpha,
                cl_static,
                series,
                timing,
            })
        })
        .collect()
}

/// Run every enabled model of a compiled scenario.
pub fn run_compiled(compiled: &CompiledScenario) -> AppResult<RunResult> {
    let started = Instant::now();

    let t = compiled.grid.clone();
    let (alpha, cl_static) = static_series(compiled);

    let mut series = Vec::new();
    if let Some(model) = compiled.mhh_model() {
        series.push(run_model(&model, compiled)?);
    }
    if let Some(model) = compiled.oye_model() {
        series.push(run_model(&model, compiled)?);
    }
    if series.is_empty() {
        return Err(AppError::InvalidInput(
            "scenario enables no model".to_string(),
        ));
    }

    let solve_time_s = started.elapsed().as_secs_f64();
    info!(
        scenario = %compiled.name,
        models = series.len(),
        points = t.len(),
        solve_time_s,
        "run completed"
    );

    Ok(RunResult {
        scenario: compiled.name.clone(),
        t,
        alpha,
        cl_static,
        series,
        timing: RunTiming {
            compile_time_s: 0.0,
            solve_time_s,
            total_time_s: solve_time_s,
        },
    })
}

/// Geometric incidence and quasi-steady lift on the output grid.
fn static_series(compiled: &CompiledScenario) -> (Vec<f64>, Vec<f64>) {
    let alpha: Vec<f64> = compiled
        .grid
        .iter()
        .map(|&ti| compiled.inflow.sample(ti).alpha)
        .collect();
    let cl_static = alpha.iter().map(|&a| compiled.closure.cl(a)).collect();
    (alpha, cl_static)
}

fn run_model<M: DynamicStallModel>(
    model: &M,
    compiled: &CompiledScenario,
) -> AppResult<ModelSeries> {
    info!(model = model.name(), "running model");
    let history = simulate(model, &compiled.grid, &compiled.options)?;
    Ok(model_series(model.name(), history))
}

fn model_series<S>(model: &str, history: StallHistory<S>) -> ModelSeries {
    debug!(
        model,
        accepted = history.stats.accepted,
        rejected = history.stats.rejected,
        rhs_evals = history.stats.rhs_evals,
        "integration statistics"
    );

    ModelSeries {
        model: model.to_string(),
        cl: history.cl(),
        cd: history.cd(),
        separation: history.separation(),
        alpha_effective: history
            .coefficients
            .iter()
            .map(|c| c.alpha_effective)
            .collect(),
        stats: history.stats,
    }
}

/// Steady operating point of each enabled model at the first output time,
/// for every case of the scenario.
pub fn steady_summary(scenario: &Scenario) -> AppResult<Vec<SteadyPoint>> {
    let mut points = Vec::new();
    for compiled in compile_cases(scenario)? {
        let t0 = compiled.grid.first().copied().unwrap_or(0.0);
        let alpha = compiled.inflow.sample(t0).alpha;
        let cl_static = compiled.closure.cl(alpha);
        let at = SteadyAt {
            case: &compiled.name,
            t: t0,
            alpha,
            cl_static,
        };

        if let Some(model) = compiled.mhh_model() {
            let x = model.steady_state(t0);
            points.push(steady_point(&model, &at, &x, x.as_slice()));
        }
        if let Some(model) = compiled.oye_model() {
            let x = model.steady_state(t0);
            points.push(steady_point(&model, &at, &x, x.as_slice()));
        }
    }
    Ok(points)
}

struct SteadyAt<'a> {
    case: &'a str,
    t: f64,
    alpha: f64,
    cl_static: f64,
}

fn steady_point<M: DynamicStallModel>(
    model: &M,
    at: &SteadyAt<'_>,
    x: &M::State,
    components: &[f64],
) -> SteadyPoint {
    let c = model.outputs(at.t, x);
    SteadyPoint {
        case: at.case.to_string(),
        model: model.name().to_string(),
        alpha: at.alpha,
        state: components.to_vec(),
        cl: c.cl,
        cd: c.cd,
        separation: c.separation,
        cl_static: at.cl_static,
    }
}

/// Jones and Garrick approximations of the Wagner function on `[0, tau_end]`.
pub fn wagner_reference(tau_end: f64, points: usize) -> AppResult<Vec<WagnerPoint>> {
    if !(tau_end > 0.0 && tau_end.is_finite()) {
        return Err(AppError::InvalidInput(format!(
            "tau_end must be positive and finite, got {tau_end}"
        )));
    }
    if points < 2 {
        return Err(AppError::InvalidInput(format!(
            "at least 2 points required, got {points}"
        )));
    }
    Ok(linspace(0.0, tau_end, points)
        .into_iter()
        .map(|tau| WagnerPoint {
            tau,
            jones: wagner::jones(tau),
            garrick: wagner::garrick(tau),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wagner_reference_endpoints() {
        let pts = wagner_reference(10.0, 11).unwrap();
        assert_eq!(pts.len(), 11);
        assert!((pts[0].jones - 0.5).abs() < 1e-12);
        assert_eq!(pts[10].tau, 10.0);
        assert!(pts.windows(2).all(|w| w[1].jones > w[0].jones));
    }

    #[test]
    fn wagner_reference_rejects_bad_input() {
        assert!(wagner_reference(0.0, 10).is_err());
        assert!(wagner_reference(f64::NAN, 10).is_err());
        assert!(wagner_reference(5.0, 1).is_err());
    }
}
