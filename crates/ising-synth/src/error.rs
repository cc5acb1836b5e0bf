//! Error types for the synthesis crate.

use thiserror::Error;

/// Broad classification of a [`SynthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid `(n, J, Jmax, L, T)`; raised before any operation is emitted.
    Configuration,
    /// An internal invariant was violated while emitting operations.
    Construction,
    /// A finished circuit was used in a way its contract forbids.
    Usage,
}

/// Errors produced by Ising circuit synthesis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// Chain length must be ≥ 1.
    #[error("chain length n must be at least 1, got {0}")]
    InvalidChainLength(usize),

    /// Step count L must be ≥ 1.
    #[error("step count L must be at least 1, got {0}")]
    InvalidSteps(usize),

    /// Jmax must be non-zero.
    #[error("maximum coupling Jmax must be non-zero")]
    ZeroFieldMax,

    /// A real-valued parameter is NaN or infinite.
    #[error("parameter {name} must be finite, got {value}")]
    NonFiniteParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// `floor(J·L/Jmax)` is negative.
    #[error("J = {j} and Jmax = {j_max} give a negative step count")]
    NegativeStepCount {
        /// Target coupling.
        j: f64,
        /// Maximum coupling.
        j_max: f64,
    },

    /// `floor(J·L/Jmax)` exceeds L, i.e. |J| > |Jmax|.
    #[error("step count {step_count} exceeds the schedule length L = {steps}")]
    StepCountExceedsSchedule {
        /// Computed step count.
        step_count: usize,
        /// Schedule length L.
        steps: usize,
    },

    /// A state vector handed to a shift has the wrong length.
    #[error("shift over {num_qubits} qubits needs {expected} amplitudes, got {got}")]
    DimensionMismatch {
        /// Register size of the shift.
        num_qubits: u32,
        /// Expected vector length.
        expected: usize,
        /// Actual vector length.
        got: usize,
    },

    /// `append_measurement` was called on an already measured circuit.
    #[error("measurement has already been appended to this circuit")]
    MeasurementAlreadyAppended,

    /// Operation IR rejected an emitted operation.
    #[error("circuit IR error: {0}")]
    Ir(#[from] ising_ir::IrError),
}

impl SynthError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SynthError::InvalidChainLength(_)
            | SynthError::InvalidSteps(_)
            | SynthError::ZeroFieldMax
            | SynthError::NonFiniteParameter { .. }
            | SynthError::NegativeStepCount { .. }
            | SynthError::StepCountExceedsSchedule { .. } => ErrorKind::Configuration,
            SynthError::DimensionMismatch { .. } | SynthError::Ir(_) => ErrorKind::Construction,
            SynthError::MeasurementAlreadyAppended => ErrorKind::Usage,
        }
    }
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;
