use clap::{Parser, Subcommand};
use ds_app::{AppError, AppResult, RunManifest, RunResult, run_service};
use ds_core::rad_to_deg;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "ds-cli")]
#[command(about = "dynstall CLI - dynamic stall lift models for airfoil sections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and parameters
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Show the steady operating point of each model at the start of the run
    Steady {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Run a scenario and export its time series
    ///
    /// A mean-angle sweep writes one file per case, numbered after the
    /// given output and manifest paths.
    Run {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Output CSV file path (optional, defaults to stdout for a single case)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write a JSON run manifest to this path
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Print the Jones and Garrick Wagner function approximations as CSV
    Wagner {
        /// Last convective time
        #[arg(long, default_value_t = 30.0)]
        tau_end: f64,
        /// Number of samples
        #[arg(long, default_value_t = 61)]
        points: usize,
    },
}

fn main() -> AppResult<()> {
    // Logs go to stderr so CSV on stdout stays clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Steady { scenario_path } => cmd_steady(&scenario_path),
        Commands::Run {
            scenario_path,
            output,
            manifest,
        } => cmd_run(&scenario_path, output.as_deref(), manifest.as_deref()),
        Commands::Wagner { tau_end, points } => cmd_wagner(tau_end, points),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = ds_project::load(scenario_path)?;
    let cases = ds_app::compile_cases(&scenario)?;
    println!("✓ Scenario '{}' is valid", scenario.name);
    if cases.len() > 1 {
        println!("  {} cases", cases.len());
    }
    Ok(())
}

fn cmd_steady(scenario_path: &Path) -> AppResult<()> {
    let scenario = ds_project::load(scenario_path)?;
    let points = run_service::steady_summary(&scenario)?;

    println!("Steady state of '{}':", scenario.name);
    for p in points {
        println!("  {} / {}", p.case, p.model);
        println!("    alpha:     {:.4} deg", rad_to_deg(p.alpha));
        println!("    Cl:        {:.6}", p.cl);
        println!("    Cl_static: {:.6}", p.cl_static);
        if let Some(cd) = p.cd {
            println!("    Cd:        {:.6}", cd);
        }
        println!("    f:         {:.6}", p.separation);
        let state: Vec<String> = p.state.iter().map(|v| format!("{:.6e}", v)).collect();
        println!("    state:     [{}]", state.join(", "));
    }
    Ok(())
}

fn cmd_run(scenario_path: &Path, output: Option<&Path>, manifest: Option<&Path>) -> AppResult<()> {
    let scenario = ds_project::load(scenario_path)?;
    info!(path = %scenario_path.display(), "scenario loaded");
    let cases = scenario.cases();
    if cases.len() > 1 && output.is_none() {
        return Err(AppError::InvalidInput(format!(
            "scenario '{}' runs {} cases; give --output to write one CSV per case",
            scenario.name,
            cases.len()
        )));
    }
    let results = run_service::run_cases(&scenario)?;

    for (i, (case, result)) in cases.iter().zip(&results).enumerate() {
        if let Some(path) = manifest {
            let path = case_path(path, i, cases.len());
            let m = RunManifest::new(case, result);
            ds_app::write_manifest(&path, &m)?;
            info!(run_id = %m.run_id, path = %path.display(), "manifest written");
        }

        // Write to file or stdout
        if let Some(path) = output {
            let path = case_path(path, i, cases.len());
            ds_app::write_csv(&path, result)?;
            println!("✓ Simulation completed: {}", result.scenario);
            println!(
                "✓ Exported {} time points to {}",
                result.t.len(),
                path.display()
            );
        } else {
            let mut stdout = std::io::stdout().lock();
            ds_app::write_csv_to(&mut stdout, result)?;
        }
    }

    if output.is_some() {
        if let Some(result) = results.first() {
            print_timing(result);
        }
        for result in &results {
            print_models(result);
        }
    }

    Ok(())
}

/// Output path of case `index`; numbered only when there are several cases.
fn case_path(path: &Path, index: usize, count: usize) -> PathBuf {
    if count <= 1 {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{index}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{index}"),
    };
    path.with_file_name(name)
}

fn print_timing(result: &RunResult) {
    let timing = &result.timing;
    println!("\nTiming summary:");
    println!("  Compile: {:.3}s", timing.compile_time_s);
    println!("  Solve:   {:.3}s", timing.solve_time_s);
    println!("  Total:   {:.3}s", timing.total_time_s);
}

fn print_models(result: &RunResult) {
    println!("\nModels ({}):", result.scenario);
    for s in &result.series {
        let max_cl = s.cl.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_cl = s.cl.iter().copied().fold(f64::INFINITY, f64::min);
        println!(
            "  {}: Cl in [{:.4}, {:.4}]  steps={} rejected={} rhs={}",
            s.model, min_cl, max_cl, s.stats.accepted, s.stats.rejected, s.stats.rhs_evals
        );
    }
}

fn cmd_wagner(tau_end: f64, points: usize) -> AppResult<()> {
    let table = run_service::wagner_reference(tau_end, points)?;
    let mut csv = String::from("tau,jones,garrick\n");
    for p in &table {
        csv.push_str(&format!("{},{},{}\n", p.tau, p.jones, p.garrick));
    }
    print!("{}", csv);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_paths_are_numbered_for_sweeps() {
        let path = Path::new("out/run.csv");
        assert_eq!(case_path(path, 0, 1), PathBuf::from("out/run.csv"));
        assert_eq!(case_path(path, 1, 2), PathBuf::from("out/run_1.csv"));
        assert_eq!(case_path(Path::new("run"), 0, 3), PathBuf::from("run_0"));
    }
}
