//! Sweep command implementation.
//!
//! Every grid point is synthesised and simulated on its own blocking task;
//! the circuits share nothing, so the points run concurrently.

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::info;

use ising_adapter_sim::SimulatorBackend;
use ising_ir::QubitId;
use ising_synth::{IsingCircuit, IsingParams};

use super::common::{OutputFormat, ParamArgs, print_params, resolve_params};

/// Grid and backend settings for one sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepOptions {
    pub j_from: f64,
    pub j_to: Option<f64>,
    pub points: usize,
    pub trajectories: u32,
    pub readout: u32,
    pub seed: Option<u64>,
}

/// Magnetization at one grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub j: f64,
    pub step_count: usize,
    pub magnetization: f64,
}

/// Evenly spaced grid from `from` to `to`, both included.
pub fn j_grid(from: f64, to: f64, points: usize) -> Vec<f64> {
    match points {
        0 => vec![],
        1 => vec![from],
        _ => {
            let step = (to - from) / (points - 1) as f64;
            (0..points)
                .map(|i| if i + 1 == points { to } else { from + step * i as f64 })
                .collect()
        }
    }
}

/// Synthesise and simulate a single grid point.
pub fn run_point(
    params: IsingParams,
    trajectories: u32,
    readout: u32,
    seed: Option<u64>,
) -> Result<SweepPoint> {
    let circuit = IsingCircuit::from_params(params)
        .with_context(|| format!("Synthesis failed at J = {}", params.j))?;
    if readout >= circuit.num_qubits() {
        anyhow::bail!(
            "Readout qubit {} outside the {}-qubit register",
            QubitId(readout),
            circuit.num_qubits()
        );
    }

    let mut backend = SimulatorBackend::new();
    if let Some(seed) = seed {
        backend = backend.with_seed(seed);
    }
    let magnetization = backend
        .mean_magnetization(circuit.sequence(), trajectories)
        .with_context(|| format!("Simulation failed at J = {}", params.j))?;

    Ok(SweepPoint {
        j: params.j,
        step_count: circuit.step_count(),
        magnetization: magnetization[readout as usize],
    })
}

/// Drain the point tasks sorted by J. `progress` is cleared on every path.
async fn collect_points(
    mut tasks: JoinSet<Result<SweepPoint>>,
    progress: &ProgressBar,
) -> Result<Vec<SweepPoint>> {
    let mut points = Vec::with_capacity(tasks.len());
    let drained: Result<()> = async {
        while let Some(joined) = tasks.join_next().await {
            points.push(joined??);
            progress.inc(1);
        }
        Ok(())
    }
    .await;
    progress.finish_and_clear();
    drained?;

    points.sort_by(|a, b| a.j.total_cmp(&b.j));
    Ok(points)
}

/// Execute the sweep command.
pub async fn execute(args: &ParamArgs, options: SweepOptions, format: OutputFormat) -> Result<()> {
    let base = resolve_params(args)?;
    let grid = j_grid(options.j_from, options.j_to.unwrap_or(base.j_max), options.points);
    if grid.is_empty() {
        anyhow::bail!("Sweep needs at least one grid point");
    }

    info!(points = grid.len(), n = base.n, "starting J sweep");

    let progress = ProgressBar::new(grid.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?,
    );
    progress.set_message("sweeping J");

    let mut tasks = JoinSet::new();
    for (i, j) in grid.iter().copied().enumerate() {
        let params = base.with_j(j);
        let seed = options.seed.map(|s| s.wrapping_add(i as u64));
        tasks.spawn_blocking(move || run_point(params, options.trajectories, options.readout, seed));
    }

    let points = collect_points(tasks, &progress).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&points)?),
        OutputFormat::Table => {
            println!(
                "{} Swept {} values of J, readout q{}",
                style("✓").green().bold(),
                points.len(),
                options.readout
            );
            print_params(&base);
            println!("  {:>12} {:>8} {:>16}", "J", "LJ", "magnetization");
            for point in &points {
                println!(
                    "  {:>12.6} {:>8} {}",
                    point.j,
                    point.step_count,
                    style(format!("{:>+16.10}", point.magnetization)).cyan()
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_endpoints() {
        assert_eq!(j_grid(0.0, 2.0, 5), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(j_grid(0.3, 2.0, 1), vec![0.3]);
        assert!(j_grid(0.0, 1.0, 0).is_empty());
        assert_eq!(*j_grid(0.0, 0.7, 8).last().unwrap(), 0.7);
    }

    #[test]
    fn test_run_point_reference_sweep() {
        let params = IsingParams::new(4, 1.0, 2.0, 2400, 240.1);
        let point = run_point(params, 1, 0, Some(0)).unwrap();
        assert_eq!(point.step_count, 1200);
        assert!(point.magnetization.abs() > 0.44 && point.magnetization.abs() < 0.58);
    }

    #[test]
    fn test_run_point_rejects_bad_readout() {
        let params = IsingParams::new(4, 0.1, 2.0, 200, 20.1);
        assert!(run_point(params, 1, 3, Some(0)).is_err());
    }

    #[tokio::test]
    async fn test_points_sorted_and_progress_cleared() {
        let base = IsingParams::new(2, 0.0, 2.0, 10, 1.1);
        let mut tasks = JoinSet::new();
        for j in [2.0, 0.0, 1.0] {
            tasks.spawn_blocking(move || run_point(base.with_j(j), 1, 0, Some(3)));
        }
        let progress = ProgressBar::hidden();
        let points = collect_points(tasks, &progress).await.unwrap();
        let js: Vec<f64> = points.iter().map(|p| p.j).collect();
        assert_eq!(js, vec![0.0, 1.0, 2.0]);
        assert!(progress.is_finished());
    }

    #[tokio::test]
    async fn test_failed_point_still_clears_progress() {
        let base = IsingParams::new(2, 0.0, 2.0, 10, 1.1);
        let mut tasks = JoinSet::new();
        tasks.spawn_blocking(move || run_point(base, 1, 0, Some(1)));
        tasks.spawn_blocking(move || run_point(base, 1, 7, Some(1)));
        let progress = ProgressBar::hidden();
        assert!(collect_points(tasks, &progress).await.is_err());
        assert!(progress.is_finished());
    }
}
