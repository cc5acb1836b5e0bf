//! Ordered operation sequences.
//!
//! A [`SequenceBuilder`] owns its operations exclusively while a circuit is
//! being assembled. [`SequenceBuilder::finish`] turns it into a
//! [`GateSequence`], which has no mutating methods and can be shared freely
//! between readers.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::operation::{Operation, PhaseDirection, ShiftDirection};
use crate::qubit::QubitId;
use crate::unitary::RealUnitary2;

/// Append-only builder for a [`GateSequence`].
#[derive(Debug, Clone)]
pub struct SequenceBuilder {
    name: String,
    num_qubits: u32,
    ops: Vec<Operation>,
}

impl SequenceBuilder {
    /// Create an empty builder over a register of `num_qubits` qubits.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            ops: vec![],
        }
    }

    /// Number of qubits in the register.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of operations appended so far.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Append an operation after checking its operands.
    ///
    /// Every operand must lie inside the register and appear at most once.
    pub fn push(&mut self, op: Operation) -> IrResult<&mut Self> {
        let qubits = op.qubits();
        let mut seen = FxHashSet::default();
        for qubit in qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    num_qubits: self.num_qubits,
                    op_name: Some(op.name().to_string()),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    op_name: Some(op.name().to_string()),
                });
            }
        }
        self.ops.push(op);
        Ok(self)
    }

    // =========================================================================
    // Convenience appenders
    // =========================================================================

    /// Append a Hadamard.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Operation::hadamard(qubit))
    }

    /// Append `S`.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Operation::phase_shift(qubit, PhaseDirection::Forward))
    }

    /// Append `S†`.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Operation::phase_shift(qubit, PhaseDirection::Inverse))
    }

    /// Append a stochastic bit flip.
    pub fn bit_flip(&mut self, qubit: QubitId, probability: f64) -> IrResult<&mut Self> {
        self.push(Operation::bit_flip(qubit, probability)?)
    }

    /// Append a single-qubit real unitary.
    pub fn unitary(&mut self, unitary: RealUnitary2, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Operation::rotation(qubit, unitary))
    }

    /// Append a multi-controlled real unitary.
    pub fn mc_unitary(
        &mut self,
        unitary: RealUnitary2,
        controls: impl IntoIterator<Item = QubitId>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Operation::controlled(target, unitary, controls))
    }

    /// Append a basis shift across the whole register.
    pub fn shift_all(&mut self, direction: ShiftDirection) -> IrResult<&mut Self> {
        let op = Operation::basis_shift(QubitId::range(self.num_qubits), direction)?;
        self.push(op)
    }

    /// Append a measurement.
    pub fn measure(&mut self, qubit: QubitId, label: impl Into<String>) -> IrResult<&mut Self> {
        self.push(Operation::measurement(qubit, label))
    }

    /// Freeze the builder into an immutable sequence.
    pub fn finish(self) -> GateSequence {
        GateSequence {
            name: self.name,
            num_qubits: self.num_qubits,
            ops: self.ops,
        }
    }
}

/// A finalized, immutable sequence of operations.
///
/// Semantics are left-to-right composition: `operations()[0]` is applied
/// to the register first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateSequence {
    name: String,
    num_qubits: u32,
    ops: Vec<Operation>,
}

impl GateSequence {
    /// Name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register size.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The operations in application order.
    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    /// Iterate in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.ops.iter()
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if the sequence has no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of operations per [`Operation::name`].
    pub fn op_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for op in &self.ops {
            *counts.entry(op.name()).or_insert(0) += 1;
        }
        counts
    }

    /// True if any operation is a measurement.
    pub fn has_measurements(&self) -> bool {
        self.ops.iter().any(Operation::is_measurement)
    }

    /// Reopen the sequence for appending.
    ///
    /// Consumes `self`, so no reader can observe the sequence changing.
    pub fn into_builder(self) -> SequenceBuilder {
        SequenceBuilder {
            name: self.name,
            num_qubits: self.num_qubits,
            ops: self.ops,
        }
    }
}

impl<'a> IntoIterator for &'a GateSequence {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl fmt::Display for GateSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} qubits, {} ops",
            self.name,
            self.num_qubits,
            self.ops.len()
        )?;
        for (i, op) in self.ops.iter().enumerate() {
            writeln!(f, "{i:>6}  {op}")?;
        }
        Ok(())
    }
}
