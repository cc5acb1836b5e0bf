//! Build command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use ising_ir::GateSequence;
use ising_synth::{IsingCircuit, IsingParams};

use super::common::{OutputFormat, ParamArgs, print_params, resolve_params};

/// JSON view of a synthesised circuit.
#[derive(Debug, Serialize)]
pub struct BuildReport<'a> {
    pub params: &'a IsingParams,
    pub num_qubits: u32,
    pub system_qubit: u32,
    pub step_count: usize,
    pub dt: f64,
    pub op_counts: BTreeMap<&'static str, usize>,
    pub sequence: &'a GateSequence,
}

impl<'a> BuildReport<'a> {
    pub fn new(circuit: &'a IsingCircuit) -> Self {
        Self {
            params: circuit.params(),
            num_qubits: circuit.num_qubits(),
            system_qubit: circuit.system_qubit().0,
            step_count: circuit.step_count(),
            dt: circuit.dt(),
            op_counts: circuit.sequence().op_counts(),
            sequence: circuit.sequence(),
        }
    }
}

/// Synthesise the circuit, appending the measurement if a label is given.
pub fn synthesise(params: IsingParams, measure: Option<&str>) -> Result<IsingCircuit> {
    let mut circuit = IsingCircuit::from_params(params).context("Synthesis failed")?;
    if let Some(label) = measure {
        circuit.append_measurement(label)?;
    }
    Ok(circuit)
}

/// Execute the build command.
pub fn execute(
    args: &ParamArgs,
    format: OutputFormat,
    list: bool,
    measure: Option<&str>,
) -> Result<()> {
    let params = resolve_params(args)?;
    let circuit = synthesise(params, measure)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&BuildReport::new(&circuit))?;
            println!("{json}");
        }
        OutputFormat::Table => {
            println!(
                "{} Synthesised {}",
                style("✓").green().bold(),
                style(circuit.sequence().name()).cyan()
            );
            print_params(circuit.params());
            println!(
                "  Register: {} qubits (system {}, {} ancillas)",
                style(circuit.num_qubits()).yellow(),
                circuit.system_qubit(),
                circuit.ancillas().len()
            );
            println!(
                "  Steps:    {} of {} (dt = {})",
                style(circuit.step_count()).yellow(),
                circuit.params().steps,
                circuit.dt()
            );
            println!("  Operations: {}", circuit.sequence().len());
            for (name, count) in circuit.sequence().op_counts() {
                println!("    {:<12} {:>8}", name, count);
            }
            if list {
                println!();
                print!("{}", circuit.sequence());
            }
        }
    }

    Ok(())
}
