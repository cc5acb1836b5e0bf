//! Statevector simulation engine.
//!
//! Qubit 0 is the most significant bit of the basis index, so qubit `q` of
//! an `m`-qubit register sits at bit `m - 1 - q`.

use num_complex::Complex64;
use rand::Rng;

use ising_ir::{Operation, PhaseDirection, QubitId, RealUnitary2, ShiftDirection};
use ising_synth::ShiftOperator;

use crate::error::{SimError, SimResult};

/// Outcome of one measurement operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementOutcome {
    /// Label the outcome is recorded under.
    pub label: String,
    /// Measured qubit.
    pub qubit: QubitId,
    /// `true` for `|1⟩`.
    pub value: bool,
}

/// A pure state over `2^m` complex amplitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^m complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: u32,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: u32) -> Self {
        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The amplitudes in basis-index order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Squared norm, 1 for a normalized state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Callers check `qubit` against the register first.
    fn mask(&self, qubit: QubitId) -> usize {
        1 << (self.num_qubits - 1 - qubit.0)
    }

    fn check_qubit(&self, qubit: QubitId, op: &'static str) -> SimResult<()> {
        if qubit.0 >= self.num_qubits {
            return Err(SimError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
                op,
            });
        }
        Ok(())
    }

    /// Apply one operation.
    ///
    /// Stochastic bit flips and measurements draw from `rng`. Returns the
    /// outcome for a measurement, `None` otherwise. Operands outside the
    /// register fail with [`SimError::QubitOutOfRange`] before anything changes.
    pub fn apply<R: Rng>(
        &mut self,
        op: &Operation,
        rng: &mut R,
    ) -> SimResult<Option<MeasurementOutcome>> {
        for qubit in op.qubits() {
            self.check_qubit(qubit, op.name())?;
        }
        match op {
            Operation::Hadamard { qubit } => self.apply_h(*qubit),
            Operation::PhaseShift { qubit, direction } => self.apply_s(*qubit, *direction),
            Operation::StochasticBitFlip { qubit, probability } => {
                if rng.r#gen::<f64>() < *probability {
                    self.apply_x(*qubit);
                }
            }
            Operation::SingleQubitRotation { qubit, unitary } => {
                self.apply_controlled(unitary, &[], *qubit);
            }
            Operation::ControlledUnitary {
                target,
                unitary,
                controls,
            } => self.apply_controlled(unitary, controls, *target),
            Operation::BasisShift { qubits, direction } => self.apply_shift(qubits, *direction)?,
            Operation::Measurement { qubit, label } => {
                let value = self.measure(*qubit, rng);
                return Ok(Some(MeasurementOutcome {
                    label: label.clone(),
                    qubit: *qubit,
                    value,
                }));
            }
        }
        Ok(None)
    }

    // =========================================================================
    // Gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: QubitId) {
        let mask = self.mask(qubit);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_h(&mut self, qubit: QubitId) {
        let mask = self.mask(qubit);
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_s(&mut self, qubit: QubitId, direction: PhaseDirection) {
        let mask = self.mask(qubit);
        let phase = Complex64::new(0.0, f64::from(direction.sign()));
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    /// Apply `unitary` to `target` on the subspace where every control is 1.
    fn apply_controlled(&mut self, unitary: &RealUnitary2, controls: &[QubitId], target: QubitId) {
        let tgt_mask = self.mask(target);
        let ctrl_mask = controls.iter().fold(0, |acc, &c| acc | self.mask(c));
        let [[u00, u01], [u10, u11]] = *unitary.rows();
        for i in 0..self.amplitudes.len() {
            if i & tgt_mask == 0 && i & ctrl_mask == ctrl_mask {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = u00 * a + u01 * b;
                self.amplitudes[j] = u10 * a + u11 * b;
            }
        }
    }

    /// Cyclic shift of the joint basis of `qubits`, first qubit most significant.
    fn apply_shift(&mut self, qubits: &[QubitId], direction: ShiftDirection) -> SimResult<()> {
        let width = u32::try_from(qubits.len()).unwrap_or(u32::MAX);
        let shift = ShiftOperator::new(width, direction)?;
        if qubits.iter().copied().eq(QubitId::range(self.num_qubits)) {
            shift.apply_to(&mut self.amplitudes)?;
            return Ok(());
        }

        let masks: Vec<usize> = qubits.iter().map(|&q| self.mask(q)).collect();
        let span_mask = masks.iter().fold(0, |acc, m| acc | m);
        let sub_index = |i: usize| {
            masks
                .iter()
                .fold(0, |acc, &m| (acc << 1) | usize::from(i & m != 0))
        };
        let with_sub_index = |i: usize, k: usize| {
            masks
                .iter()
                .rev()
                .enumerate()
                .fold(i & !span_mask, |acc, (bit, &m)| {
                    if (k >> bit) & 1 == 1 { acc | m } else { acc }
                })
        };
        let old = self.amplitudes.clone();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp = old[with_sub_index(i, shift.source_index(sub_index(i)))];
        }
        Ok(())
    }

    /// Measure `qubit`, collapse the state, and return the outcome.
    fn measure<R: Rng>(&mut self, qubit: QubitId, rng: &mut R) -> bool {
        let mask = self.mask(qubit);
        let p1 = self.weight_where_set(mask);
        let value = rng.r#gen::<f64>() < p1;
        let kept = if value { p1 } else { 1.0 - p1 };
        let norm = kept.sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == value {
                if norm > 0.0 {
                    *amp /= norm;
                }
            } else {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        value
    }

    // =========================================================================
    // Observables
    // =========================================================================

    fn weight_where_set(&self, mask: usize) -> f64 {
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Probability that `qubit` reads 1.
    pub fn probability_one(&self, qubit: QubitId) -> SimResult<f64> {
        self.check_qubit(qubit, "probability_one")?;
        Ok(self.weight_where_set(self.mask(qubit)))
    }

    /// Magnetization `P(1) - P(0)` of `qubit`.
    pub fn magnetization(&self, qubit: QubitId) -> SimResult<f64> {
        self.check_qubit(qubit, "magnetization")?;
        let p1 = self.weight_where_set(self.mask(qubit));
        Ok(p1 - (1.0 - p1))
    }

    /// Sample a full-register outcome without collapsing the state.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();

        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if r < cumulative {
                return i;
            }
        }

        // Rounding can leave the cumulative sum just below 1.
        self.amplitudes.len() - 1
    }

    /// Bitstring of a basis index, qubit 0 first.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        format!("{:0width$b}", outcome, width = self.num_qubits as usize)
    }
}
