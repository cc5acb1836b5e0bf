//! Error types for the statevector backend.

use ising_ir::QubitId;
use thiserror::Error;

/// Errors produced while executing a gate sequence.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The register does not fit the simulator.
    #[error("sequence has {num_qubits} qubits but the simulator supports at most {max}")]
    TooManyQubits {
        /// Register size of the sequence.
        num_qubits: u32,
        /// Configured limit.
        max: u32,
    },

    /// An operation addresses a qubit outside the register.
    #[error("operation {op} addresses {qubit} outside a {num_qubits}-qubit register")]
    QubitOutOfRange {
        /// Offending qubit.
        qubit: QubitId,
        /// Register size.
        num_qubits: u32,
        /// Operation name.
        op: &'static str,
    },

    /// An averaged quantity was requested over zero trajectories.
    #[error("at least one trajectory is required")]
    NoTrajectories,

    /// Shift construction failed.
    #[error("synthesis error: {0}")]
    Synth(#[from] ising_synth::SynthError),
}

/// Result type for backend operations.
pub type SimResult<T> = Result<T, SimError>;
