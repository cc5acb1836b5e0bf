//! Simulate command implementation.

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use ising_adapter_sim::{Counts, SimulatorBackend};
use ising_synth::IsingParams;

use super::build::synthesise;
use super::common::{OutputFormat, ParamArgs, print_counts, print_params, resolve_params};

/// Backend settings for one simulate run.
#[derive(Debug, Clone, Copy)]
pub struct SimulateOptions {
    pub trajectories: u32,
    pub shots: Option<u32>,
    pub seed: Option<u64>,
    pub max_qubits: u32,
}

/// What a simulate run produced.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SimulateReport {
    /// Per-qubit magnetization averaged over trajectories.
    Magnetization {
        params: IsingParams,
        trajectories: u32,
        magnetization: Vec<f64>,
    },
    /// Histogram of the system-qubit measurement.
    Shots {
        params: IsingParams,
        shots: u32,
        counts: Counts,
    },
}

/// Run the backend synchronously.
pub fn run(params: IsingParams, options: SimulateOptions) -> Result<SimulateReport> {
    let mut backend = SimulatorBackend::new().with_max_qubits(options.max_qubits);
    if let Some(seed) = options.seed {
        backend = backend.with_seed(seed);
    }

    match options.shots {
        Some(shots) => {
            let circuit = synthesise(params, Some("magnetization"))?;
            let counts = backend
                .sample_counts(circuit.sequence(), shots)
                .context("Simulation failed")?;
            Ok(SimulateReport::Shots {
                params,
                shots,
                counts,
            })
        }
        None => {
            let circuit = synthesise(params, None)?;
            let magnetization = backend
                .mean_magnetization(circuit.sequence(), options.trajectories)
                .context("Simulation failed")?;
            Ok(SimulateReport::Magnetization {
                params,
                trajectories: options.trajectories,
                magnetization,
            })
        }
    }
}

/// Run off the async runtime, clearing `spinner` whether or not the run succeeds.
async fn run_with_spinner(
    params: IsingParams,
    options: SimulateOptions,
    spinner: &ProgressBar,
) -> Result<SimulateReport> {
    let outcome = tokio::task::spawn_blocking(move || run(params, options)).await;
    spinner.finish_and_clear();
    outcome?
}

/// Execute the simulate command.
pub async fn execute(
    args: &ParamArgs,
    options: SimulateOptions,
    format: OutputFormat,
) -> Result<()> {
    let params = resolve_params(args)?;
    info!(n = params.n, trajectories = options.trajectories, "simulating");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Simulating...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = run_with_spinner(params, options, &spinner).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &SimulateReport) {
    match report {
        SimulateReport::Magnetization {
            params,
            trajectories,
            magnetization,
        } => {
            println!(
                "{} Magnetization over {} trajectories",
                style("✓").green().bold(),
                trajectories
            );
            print_params(params);
            let system = magnetization.len().saturating_sub(1);
            for (q, m) in magnetization.iter().enumerate() {
                let role = if q == system { "system" } else { "ancilla" };
                println!(
                    "  q{:<3} {:<8} {}",
                    q,
                    role,
                    style(format!("{m:+.10}")).cyan()
                );
            }
        }
        SimulateReport::Shots { params, counts, .. } => {
            print_params(params);
            print_counts(counts);
        }
    }
}
