//! Real 2×2 unitary (orthogonal) matrices.
//!
//! Every single-qubit rotation the Ising generator emits has real entries:
//! the field term is an `Ry` rotation and the coupling term is a planar
//! rotation. Keeping them as literal matrices lets the controlled-inverse
//! step use the exact transpose instead of a re-derived angle.

use serde::{Deserialize, Serialize};
use std::ops::Mul;

use crate::error::{IrError, IrResult};

/// Tolerance used when checking orthogonality of user-supplied matrices.
const UNITARY_TOLERANCE: f64 = 1e-9;

/// A real orthogonal 2×2 matrix, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealUnitary2([[f64; 2]; 2]);

impl RealUnitary2 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self([[1.0, 0.0], [0.0, 1.0]]);

    /// Pauli-X as a real matrix.
    pub const PAULI_X: Self = Self([[0.0, 1.0], [1.0, 0.0]]);

    /// Build from rows, checking `Mᵀ·M = I` to within tolerance.
    pub fn new(rows: [[f64; 2]; 2]) -> IrResult<Self> {
        let m = Self(rows);
        if !rows.iter().flatten().all(|x| x.is_finite())
            || !(m.transpose() * m).approx_eq(&Self::IDENTITY, UNITARY_TOLERANCE)
        {
            return Err(IrError::NotUnitary(rows));
        }
        Ok(m)
    }

    /// Planar rotation `[[cos φ, -sin φ], [sin φ, cos φ]]`.
    pub fn planar(phi: f64) -> Self {
        let (s, c) = phi.sin_cos();
        Self([[c, -s], [s, c]])
    }

    /// Rotation about the Y axis, `Ry(θ) = exp(-i θ Y / 2)`.
    ///
    /// Equal to `planar(θ / 2)`.
    pub fn ry(theta: f64) -> Self {
        Self::planar(theta / 2.0)
    }

    /// Transpose of the matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let [[a, b], [c, d]] = self.0;
        Self([[a, c], [b, d]])
    }

    /// Exact inverse. For an orthogonal matrix this is the transpose.
    #[must_use]
    pub fn inverse(&self) -> Self {
        self.transpose()
    }

    /// Row-major entries.
    pub fn rows(&self) -> &[[f64; 2]; 2] {
        &self.0
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[row][col]
    }

    /// Element-wise comparison within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tol)
    }
}

impl Mul for RealUnitary2 {
    type Output = RealUnitary2;

    fn mul(self, rhs: RealUnitary2) -> RealUnitary2 {
        let a = self.0;
        let b = rhs.0;
        let mut out = [[0.0; 2]; 2];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j];
            }
        }
        RealUnitary2(out)
    }
}

impl Default for RealUnitary2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
