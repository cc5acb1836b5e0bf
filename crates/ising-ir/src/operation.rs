//! Circuit primitives emitted by the Ising generator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;
use crate::unitary::RealUnitary2;

/// Direction of a quarter-turn phase shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseDirection {
    /// `S = diag(1, i)`.
    Forward,
    /// `S† = diag(1, -i)`.
    Inverse,
}

impl PhaseDirection {
    /// `+1` for [`PhaseDirection::Forward`], `-1` for [`PhaseDirection::Inverse`].
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            PhaseDirection::Forward => 1,
            PhaseDirection::Inverse => -1,
        }
    }
}

/// Direction of a cyclic basis shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftDirection {
    /// `SHIFTU`: the amplitude at basis index `i + 1` moves to `i`.
    Up,
    /// `SHIFTD`: exact inverse of [`ShiftDirection::Up`].
    Down,
}

impl ShiftDirection {
    /// The opposite direction.
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            ShiftDirection::Up => ShiftDirection::Down,
            ShiftDirection::Down => ShiftDirection::Up,
        }
    }

    /// Short label used when drawing the shift as a box.
    pub fn label(self) -> &'static str {
        match self {
            ShiftDirection::Up => "ShiftU",
            ShiftDirection::Down => "ShiftD",
        }
    }
}

/// A single circuit primitive.
///
/// The set is closed: backends match on the variant rather than asking the
/// operation to apply itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    /// Hadamard gate.
    Hadamard {
        /// Target qubit.
        qubit: QubitId,
    },

    /// `S` or `S†`.
    PhaseShift {
        /// Target qubit.
        qubit: QubitId,
        /// Forward (`S`) or inverse (`S†`).
        direction: PhaseDirection,
    },

    /// Applies `X` with the given probability.
    ///
    /// The randomness is delegated to the executing backend.
    StochasticBitFlip {
        /// Target qubit.
        qubit: QubitId,
        /// Flip probability in `[0, 1]`.
        probability: f64,
    },

    /// A literal real 2×2 unitary on one qubit.
    SingleQubitRotation {
        /// Target qubit.
        qubit: QubitId,
        /// The matrix to apply.
        unitary: RealUnitary2,
    },

    /// Applies `unitary` to `target` iff every control qubit reads 1.
    ///
    /// An empty control set always fires.
    ControlledUnitary {
        /// Target qubit.
        target: QubitId,
        /// The matrix to apply.
        unitary: RealUnitary2,
        /// Ordered control qubits.
        controls: Vec<QubitId>,
    },

    /// Cyclic shift of the joint computational basis of `qubits`.
    BasisShift {
        /// The spanned qubits, most significant first.
        qubits: Vec<QubitId>,
        /// Shift direction.
        direction: ShiftDirection,
    },

    /// Computational-basis measurement recorded under `label`.
    Measurement {
        /// Measured qubit.
        qubit: QubitId,
        /// Key the outcome is stored under.
        label: String,
    },
}

impl Operation {
    /// Create a Hadamard.
    pub fn hadamard(qubit: QubitId) -> Self {
        Operation::Hadamard { qubit }
    }

    /// Create an `S` / `S†` phase shift.
    pub fn phase_shift(qubit: QubitId, direction: PhaseDirection) -> Self {
        Operation::PhaseShift { qubit, direction }
    }

    /// Create a stochastic bit flip, validating the probability.
    pub fn bit_flip(qubit: QubitId, probability: f64) -> IrResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(IrError::InvalidProbability(probability));
        }
        Ok(Operation::StochasticBitFlip { qubit, probability })
    }

    /// Create a single-qubit rotation.
    pub fn rotation(qubit: QubitId, unitary: RealUnitary2) -> Self {
        Operation::SingleQubitRotation { qubit, unitary }
    }

    /// Create a multi-controlled unitary.
    pub fn controlled(
        target: QubitId,
        unitary: RealUnitary2,
        controls: impl IntoIterator<Item = QubitId>,
    ) -> Self {
        Operation::ControlledUnitary {
            target,
            unitary,
            controls: controls.into_iter().collect(),
        }
    }

    /// Create a basis shift spanning `qubits`.
    ///
    /// Returns [`IrError::InvalidRegisterSize`] for an empty span.
    pub fn basis_shift(
        qubits: impl IntoIterator<Item = QubitId>,
        direction: ShiftDirection,
    ) -> IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        if qubits.is_empty() {
            return Err(IrError::InvalidRegisterSize { size: 0 });
        }
        Ok(Operation::BasisShift { qubits, direction })
    }

    /// Create a measurement.
    pub fn measurement(qubit: QubitId, label: impl Into<String>) -> Self {
        Operation::Measurement {
            qubit,
            label: label.into(),
        }
    }

    /// Short lowercase name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Hadamard { .. } => "h",
            Operation::PhaseShift {
                direction: PhaseDirection::Forward,
                ..
            } => "s",
            Operation::PhaseShift {
                direction: PhaseDirection::Inverse,
                ..
            } => "sdg",
            Operation::StochasticBitFlip { .. } => "bit_flip",
            Operation::SingleQubitRotation { .. } => "unitary",
            Operation::ControlledUnitary { .. } => "mc_unitary",
            Operation::BasisShift {
                direction: ShiftDirection::Up,
                ..
            } => "shiftu",
            Operation::BasisShift {
                direction: ShiftDirection::Down,
                ..
            } => "shiftd",
            Operation::Measurement { .. } => "measure",
        }
    }

    /// All qubits the operation touches.
    ///
    /// For a controlled unitary the controls come first, then the target.
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Operation::Hadamard { qubit }
            | Operation::PhaseShift { qubit, .. }
            | Operation::StochasticBitFlip { qubit, .. }
            | Operation::SingleQubitRotation { qubit, .. }
            | Operation::Measurement { qubit, .. } => vec![*qubit],
            Operation::ControlledUnitary {
                target, controls, ..
            } => controls.iter().copied().chain([*target]).collect(),
            Operation::BasisShift { qubits, .. } => qubits.clone(),
        }
    }

    /// Lowest and highest qubit index touched.
    pub fn span(&self) -> RangeInclusive<u32> {
        let qubits = self.qubits();
        let lo = qubits.iter().map(|q| q.0).min().unwrap_or(0);
        let hi = qubits.iter().map(|q| q.0).max().unwrap_or(0);
        lo..=hi
    }

    /// Box label for operations drawn across several wires.
    pub fn diagram_label(&self) -> Option<&'static str> {
        match self {
            Operation::BasisShift { direction, .. } => Some(direction.label()),
            _ => None,
        }
    }

    /// `false` for the noise channel and for measurements.
    pub fn is_unitary(&self) -> bool {
        !matches!(
            self,
            Operation::StochasticBitFlip { .. } | Operation::Measurement { .. }
        )
    }

    /// Check if this is a measurement.
    pub fn is_measurement(&self) -> bool {
        matches!(self, Operation::Measurement { .. })
    }
}

fn write_matrix(f: &mut fmt::Formatter<'_>, u: &RealUnitary2) -> fmt::Result {
    let [[a, b], [c, d]] = *u.rows();
    write!(f, "[[{a:.6}, {b:.6}], [{c:.6}, {d:.6}]]")
}

fn write_qubits(f: &mut fmt::Formatter<'_>, qubits: &[QubitId]) -> fmt::Result {
    for (i, q) in qubits.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{q}")?;
    }
    Ok(())
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Hadamard { qubit } | Operation::PhaseShift { qubit, .. } => {
                write!(f, "{} {qubit}", self.name())
            }
            Operation::StochasticBitFlip { qubit, probability } => {
                write!(f, "bit_flip({probability}) {qubit}")
            }
            Operation::SingleQubitRotation { qubit, unitary } => {
                write!(f, "unitary")?;
                write_matrix(f, unitary)?;
                write!(f, " {qubit}")
            }
            Operation::ControlledUnitary {
                target,
                unitary,
                controls,
            } => {
                write!(f, "mc_unitary")?;
                write_matrix(f, unitary)?;
                write!(f, " [")?;
                write_qubits(f, controls)?;
                write!(f, "] -> {target}")
            }
            Operation::BasisShift { qubits, .. } => {
                write!(f, "{} ", self.name())?;
                write_qubits(f, qubits)
            }
            Operation::Measurement { qubit, label } => write!(f, "measure {qubit} -> {label}"),
        }
    }
}
