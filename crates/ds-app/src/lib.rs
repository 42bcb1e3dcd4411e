//! Application service layer for dynstall.
//!
//! Turns validated scenario files into bound dynamic stall models, runs them
//! and writes their results. The CLI is a thin wrapper around this crate.

pub mod compile;
pub mod error;
pub mod export;
pub mod manifest;
pub mod run_service;

pub use compile::{
    CompiledScenario, SharedMhh, SharedOye, build_closure, build_inflow, compile_cases,
    compile_scenario, end_time, mhh_params, oye_params, sim_options,
};
pub use error::{AppError, AppResult};
pub use export::{write_csv, write_csv_to};
pub use manifest::{RunManifest, compute_run_id, write_manifest};
pub use run_service::{
    ModelSeries, RunResult, RunTiming, SOLVER_VERSION, SteadyPoint, WagnerPoint, run_cases,
    run_compiled, run_scenario, steady_summary, wagner_reference,
};
