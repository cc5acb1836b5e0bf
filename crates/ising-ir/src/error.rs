//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building operations and sequences.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A multi-qubit primitive was requested over an empty register.
    #[error("Invalid register size {size}: at least one qubit is required")]
    InvalidRegisterSize {
        /// The requested register size.
        size: u32,
    },

    /// Qubit not found in the sequence's register.
    #[error("Qubit {qubit} not in register of {num_qubits} qubits{}", format_op_context(.op_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Size of the register.
        num_qubits: u32,
        /// Optional operation name for context.
        op_name: Option<String>,
    },

    /// Duplicate qubit in an operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_op_context(.op_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional operation name for context.
        op_name: Option<String>,
    },

    /// Probability outside `[0, 1]` (or not finite).
    #[error("Invalid probability {0}: must lie in [0, 1]")]
    InvalidProbability(f64),

    /// Matrix is not orthogonal to within tolerance.
    #[error("Matrix {0:?} is not a real unitary")]
    NotUnitary([[f64; 2]; 2]),
}

/// Helper function to format optional operation context.
#[allow(clippy::ref_option)]
fn format_op_context(op_name: &Option<String>) -> String {
    match op_name {
        Some(name) => format!(" (op: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
