//! Ising Command-Line Interface
//!
//! Synthesises compressed adiabatic Ising-chain circuits and runs them on
//! the local statevector backend.
//!
//! ```text
//! ising build    -n 4 --j 1 --j-max 2 --steps 2400 --time 240.1
//! ising simulate -n 4 --trajectories 16 --seed 7
//! ising sweep    -n 8 --points 21 --readout 0
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{OutputFormat, ParamArgs};
use commands::{build, simulate, sweep};

/// Compressed adiabatic simulation of the transverse-field Ising chain
#[derive(Parser)]
#[command(name = "ising")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesise a circuit and describe it
    Build {
        #[command(flatten)]
        params: ParamArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Print every operation (table format only)
        #[arg(long)]
        list: bool,

        /// Append a measurement of the system qubit under this label
        #[arg(long)]
        measure: Option<String>,
    },

    /// Run a circuit on the statevector backend
    Simulate {
        #[command(flatten)]
        params: ParamArgs,

        /// Number of trajectories to average magnetization over
        #[arg(short, long, default_value = "1")]
        trajectories: u32,

        /// Measure the system qubit and sample this many shots instead
        #[arg(short, long)]
        shots: Option<u32>,

        /// RNG seed for reproducible runs
        #[arg(long, env = "ISING_SEED")]
        seed: Option<u64>,

        /// Largest register the backend accepts
        #[arg(long, default_value = "20")]
        max_qubits: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Sweep the target coupling J and report magnetization
    Sweep {
        #[command(flatten)]
        params: ParamArgs,

        /// First J of the grid
        #[arg(long, default_value = "0.0")]
        j_from: f64,

        /// Last J of the grid (defaults to Jmax)
        #[arg(long)]
        j_to: Option<f64>,

        /// Number of grid points
        #[arg(long, default_value = "11")]
        points: usize,

        /// Trajectories per grid point
        #[arg(short, long, default_value = "4")]
        trajectories: u32,

        /// Qubit whose magnetization is reported
        #[arg(long, default_value = "0")]
        readout: u32,

        /// RNG seed for reproducible runs
        #[arg(long, env = "ISING_SEED")]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Build {
            params,
            format,
            list,
            measure,
        } => build::execute(&params, format, list, measure.as_deref()),

        Commands::Simulate {
            params,
            trajectories,
            shots,
            seed,
            max_qubits,
            format,
        } => {
            simulate::execute(
                &params,
                simulate::SimulateOptions {
                    trajectories,
                    shots,
                    seed,
                    max_qubits,
                },
                format,
            )
            .await
        }

        Commands::Sweep {
            params,
            j_from,
            j_to,
            points,
            trajectories,
            readout,
            seed,
            format,
        } => {
            sweep::execute(
                &params,
                sweep::SweepOptions {
                    j_from,
                    j_to,
                    points,
                    trajectories,
                    readout,
                    seed,
                },
                format,
            )
            .await
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
