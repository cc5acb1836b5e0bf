//! Cyclic basis-shift permutations.
//!
//! `SHIFTU` over `m` qubits is the permutation matrix with
//! `U[i][(i + 1) mod 2^m] = 1`, so amplitude `i + 1` moves to index `i`.
//! `SHIFTD` is its transpose. Qubit 0 is the most significant bit of the
//! basis index.
//!
//! The operator is kept as an index function. [`ShiftOperator::dense_matrix`]
//! materializes the `2^m × 2^m` matrix for callers that insist on one.

use ising_ir::{IrError, Operation, QubitId, ShiftDirection};
use ndarray::Array2;

use crate::error::{SynthError, SynthResult};

/// A cyclic shift of the joint computational basis of `m` qubits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftOperator {
    num_qubits: u32,
    direction: ShiftDirection,
}

impl ShiftOperator {
    /// Create a shift over `num_qubits` qubits.
    ///
    /// Fails with [`IrError::InvalidRegisterSize`] if the register is empty or
    /// its dimension does not fit in a `usize`.
    pub fn new(num_qubits: u32, direction: ShiftDirection) -> SynthResult<Self> {
        if num_qubits == 0 || num_qubits >= usize::BITS {
            return Err(IrError::InvalidRegisterSize { size: num_qubits }.into());
        }
        Ok(Self {
            num_qubits,
            direction,
        })
    }

    /// `SHIFTU` over `num_qubits` qubits.
    pub fn up(num_qubits: u32) -> SynthResult<Self> {
        Self::new(num_qubits, ShiftDirection::Up)
    }

    /// `SHIFTD` over `num_qubits` qubits.
    pub fn down(num_qubits: u32) -> SynthResult<Self> {
        Self::new(num_qubits, ShiftDirection::Down)
    }

    /// Register size.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Shift direction.
    pub fn direction(&self) -> ShiftDirection {
        self.direction
    }

    /// Dimension `2^m` of the permuted space.
    pub fn dimension(&self) -> usize {
        1usize << self.num_qubits
    }

    /// The exact inverse shift.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            num_qubits: self.num_qubits,
            direction: self.direction.inverse(),
        }
    }

    /// Column holding the 1 in row `row` of the permutation matrix.
    ///
    /// After the shift, the amplitude at `row` is the one that was at
    /// `source_index(row)`.
    pub fn source_index(&self, row: usize) -> usize {
        let dim = self.dimension();
        match self.direction {
            ShiftDirection::Up => (row + 1) % dim,
            ShiftDirection::Down => (row + dim - 1) % dim,
        }
    }

    /// Index the basis state `|index⟩` is carried to.
    pub fn map_basis(&self, index: usize) -> usize {
        self.inverse().source_index(index)
    }

    /// Permute a state vector in place.
    pub fn apply_to<T>(&self, amplitudes: &mut [T]) -> SynthResult<()> {
        let expected = self.dimension();
        if amplitudes.len() != expected {
            return Err(SynthError::DimensionMismatch {
                num_qubits: self.num_qubits,
                expected,
                got: amplitudes.len(),
            });
        }
        match self.direction {
            ShiftDirection::Up => amplitudes.rotate_left(1),
            ShiftDirection::Down => amplitudes.rotate_right(1),
        }
        Ok(())
    }

    /// Materialize the `2^m × 2^m` permutation matrix.
    pub fn dense_matrix(&self) -> Array2<f64> {
        let dim = self.dimension();
        let mut matrix = Array2::zeros((dim, dim));
        for row in 0..dim {
            matrix[[row, self.source_index(row)]] = 1.0;
        }
        matrix
    }

    /// The atomic [`Operation::BasisShift`] spanning the whole register.
    pub fn operation(&self) -> SynthResult<Operation> {
        Ok(Operation::basis_shift(
            QubitId::range(self.num_qubits),
            self.direction,
        )?)
    }

    /// Diagram label, `ShiftU` or `ShiftD`.
    pub fn label(&self) -> &'static str {
        self.direction.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_register_rejected() {
        let err = ShiftOperator::up(0).unwrap_err();
        assert!(matches!(
            err,
            SynthError::Ir(IrError::InvalidRegisterSize { size: 0 })
        ));
        assert!(ShiftOperator::down(usize::BITS).is_err());
    }

    #[test]
    fn test_single_qubit_shift_is_x() {
        for shift in [ShiftOperator::up(1).unwrap(), ShiftOperator::down(1).unwrap()] {
            let dense = shift.dense_matrix();
            assert_eq!(dense, ndarray::array![[0.0, 1.0], [1.0, 0.0]]);
        }
    }

    #[test]
    fn test_source_and_target_indices() {
        let up = ShiftOperator::up(2).unwrap();
        assert_eq!(up.source_index(0), 1);
        assert_eq!(up.source_index(3), 0);
        assert_eq!(up.map_basis(0), 3);
        assert_eq!(up.map_basis(2), 1);
        let down = up.inverse();
        assert_eq!(down.source_index(0), 3);
        assert_eq!(down.map_basis(3), 0);
    }

    #[test]
    fn test_apply_checks_dimension() {
        let mut amps = vec![0.0; 3];
        assert!(matches!(
            ShiftOperator::up(2).unwrap().apply_to(&mut amps),
            Err(SynthError::DimensionMismatch {
                expected: 4,
                got: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_operation_spans_register() {
        let op = ShiftOperator::down(3).unwrap().operation().unwrap();
        assert_eq!(op.qubits(), vec![QubitId(0), QubitId(1), QubitId(2)]);
        assert_eq!(op.diagram_label(), Some("ShiftD"));
    }
}
