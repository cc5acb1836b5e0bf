//! Adiabatic sweep circuit generation.
//!
//! [`AdiabaticCircuitGenerator`] walks a fixed sequence of stages,
//!
//! ```text
//! Init → StatePrep → Step(0) → … → Step(LJ-1) → FinalBasisChange → Finished
//! ```
//!
//! appending operations to a builder it owns exclusively. The finished
//! [`IsingCircuit`] carries an immutable [`GateSequence`].
//!
//! Register layout: qubit `m-1` is the system qubit, qubits `0..m-1` are
//! the compression ancillas.

use std::mem;

use ising_ir::{GateSequence, QubitId, SequenceBuilder};
use tracing::debug;

use crate::error::{SynthError, SynthResult};
use crate::params::IsingParams;
use crate::schedule::RotationScheduler;
use crate::shift::ShiftOperator;

/// Flip probability that drives each ancilla to the maximally mixed state.
const ANCILLA_FLIP_PROBABILITY: f64 = 0.5;

/// Construction stage of an [`AdiabaticCircuitGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Parameters validated, register not yet announced.
    Init,
    /// Register allocated, state preparation pending.
    StatePrep,
    /// Sweep step `l` pending.
    Step(usize),
    /// Final `S†`, `H` on the system qubit pending.
    FinalBasisChange,
    /// All operations emitted.
    Finished,
}

/// Stage-by-stage builder of the compressed adiabatic sweep.
#[derive(Debug)]
pub struct AdiabaticCircuitGenerator {
    params: IsingParams,
    num_qubits: u32,
    scheduler: RotationScheduler,
    shift: ShiftOperator,
    builder: SequenceBuilder,
    stage: Stage,
}

impl AdiabaticCircuitGenerator {
    /// Validate the parameters and prepare a generator in [`Stage::Init`].
    ///
    /// Invalid configurations fail here, before any operation exists.
    pub fn new(params: IsingParams) -> SynthResult<Self> {
        let scheduler = RotationScheduler::new(&params)?;
        let num_qubits = params.register_size()?;
        Ok(Self {
            builder: SequenceBuilder::new(format!("ising_n{}", params.n), num_qubits),
            params,
            num_qubits,
            scheduler,
            shift: ShiftOperator::up(num_qubits)?,
            stage: Stage::Init,
        })
    }

    /// The stage the next call to [`advance`](Self::advance) runs.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The rotation schedule driving the sweep.
    pub fn scheduler(&self) -> &RotationScheduler {
        &self.scheduler
    }

    /// The register-wide `SHIFTU` bracketing every coupling step.
    pub fn shift(&self) -> ShiftOperator {
        self.shift
    }

    /// Number of operations emitted so far.
    pub fn emitted(&self) -> usize {
        self.builder.len()
    }

    fn system_qubit(&self) -> QubitId {
        QubitId(self.num_qubits - 1)
    }

    /// Run the current stage and move to the next one.
    ///
    /// Returns the new stage. Advancing a finished generator is a no-op.
    pub fn advance(&mut self) -> SynthResult<Stage> {
        let system = self.system_qubit();
        let step_count = self.scheduler.step_count();
        let next = match self.stage {
            Stage::Init => {
                debug!(
                    n = self.params.n,
                    m = self.num_qubits,
                    lj = step_count,
                    dt = self.scheduler.dt(),
                    "allocating compressed Ising register"
                );
                Stage::StatePrep
            }
            Stage::StatePrep => {
                let builder = &mut self.builder;
                // +i eigenstate of Y on the system qubit.
                builder.h(system)?.s(system)?;
                for ancilla in QubitId::range(system.0) {
                    builder.bit_flip(ancilla, ANCILLA_FLIP_PROBABILITY)?;
                }
                Self::first_step_or_final(step_count)
            }
            Stage::Step(l) => {
                let field = self.scheduler.field_rotation();
                let step = self.scheduler.step(l);
                let shift_up = self.shift.operation()?;
                let shift_down = self.shift.inverse().operation()?;
                self.builder
                    .unitary(field, system)?
                    .push(shift_up)?
                    .unitary(step.unitary, system)?
                    .mc_unitary(step.unitary.inverse(), QubitId::range(system.0), system)?
                    .push(shift_down)?;
                if l + 1 < step_count {
                    Stage::Step(l + 1)
                } else {
                    Stage::FinalBasisChange
                }
            }
            Stage::FinalBasisChange => {
                // Y basis to Z basis.
                self.builder.sdg(system)?.h(system)?;
                Stage::Finished
            }
            Stage::Finished => Stage::Finished,
        };
        self.stage = next;
        Ok(next)
    }

    /// Run every remaining stage and return the unmeasured circuit.
    pub fn build(mut self) -> SynthResult<IsingCircuit> {
        while self.advance()? != Stage::Finished {}
        let sequence = self.builder.finish();
        debug!(
            n = self.params.n,
            m = self.num_qubits,
            lj = self.scheduler.step_count(),
            ops = sequence.len(),
            "synthesised adiabatic Ising circuit"
        );
        Ok(IsingCircuit {
            params: self.params,
            num_qubits: self.num_qubits,
            dt: self.scheduler.dt(),
            step_count: self.scheduler.step_count(),
            sequence,
            measured: false,
        })
    }

    fn first_step_or_final(step_count: usize) -> Stage {
        if step_count == 0 {
            Stage::FinalBasisChange
        } else {
            Stage::Step(0)
        }
    }
}

/// A synthesised compressed adiabatic sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct IsingCircuit {
    params: IsingParams,
    num_qubits: u32,
    dt: f64,
    step_count: usize,
    sequence: GateSequence,
    measured: bool,
}

impl IsingCircuit {
    /// Synthesise the unmeasured circuit for `(n, J, Jmax, L, T)`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ising_synth::IsingCircuit;
    ///
    /// let circuit = IsingCircuit::new(4, 0.1, 2.0, 200, 20.1).unwrap();
    /// assert_eq!(circuit.num_qubits(), 3);
    /// assert_eq!(circuit.step_count(), 10);
    /// assert_eq!(circuit.sequence().len(), 2 + 2 + 5 * 10 + 2);
    /// ```
    pub fn new(n: usize, j: f64, j_max: f64, steps: usize, total_time: f64) -> SynthResult<Self> {
        Self::from_params(IsingParams::new(n, j, j_max, steps, total_time))
    }

    /// Synthesise the unmeasured circuit for `params`.
    pub fn from_params(params: IsingParams) -> SynthResult<Self> {
        AdiabaticCircuitGenerator::new(params)?.build()
    }

    /// Requested chain length `n`.
    pub fn n(&self) -> usize {
        self.params.n
    }

    /// Register size `m`.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Time step `dt`.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of emitted sweep steps `LJ`.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// The parameters the circuit was built from.
    pub fn params(&self) -> &IsingParams {
        &self.params
    }

    /// The operation sequence.
    pub fn sequence(&self) -> &GateSequence {
        &self.sequence
    }

    /// The measured system qubit, `m - 1`.
    pub fn system_qubit(&self) -> QubitId {
        QubitId(self.num_qubits - 1)
    }

    /// The compression ancillas, `0..m-1`.
    pub fn ancillas(&self) -> impl ExactSizeIterator<Item = QubitId> {
        QubitId::range(self.num_qubits - 1)
    }

    /// True once [`append_measurement`](Self::append_measurement) succeeded.
    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// Append a measurement of the system qubit recorded under `label`.
    ///
    /// Single-shot: a second call fails with
    /// [`SynthError::MeasurementAlreadyAppended`] and leaves the circuit as is.
    pub fn append_measurement(&mut self, label: impl Into<String>) -> SynthResult<()> {
        if self.measured {
            return Err(SynthError::MeasurementAlreadyAppended);
        }
        let system = self.system_qubit();
        let mut builder = mem::take(&mut self.sequence).into_builder();
        let pushed = builder.measure(system, label).map(|_| ());
        self.sequence = builder.finish();
        pushed?;
        self.measured = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_walk() {
        let params = IsingParams::new(4, 0.1, 2.0, 40, 4.1);
        let mut generator = AdiabaticCircuitGenerator::new(params).unwrap();
        assert_eq!(generator.stage(), Stage::Init);
        assert_eq!(generator.advance().unwrap(), Stage::StatePrep);
        assert_eq!(generator.emitted(), 0);
        assert_eq!(generator.advance().unwrap(), Stage::Step(0));
        assert_eq!(generator.emitted(), 4);
        assert_eq!(generator.advance().unwrap(), Stage::Step(1));
        assert_eq!(generator.advance().unwrap(), Stage::FinalBasisChange);
        assert_eq!(generator.emitted(), 14);
        assert_eq!(generator.advance().unwrap(), Stage::Finished);
        assert_eq!(generator.advance().unwrap(), Stage::Finished);
        assert_eq!(generator.emitted(), 16);
    }

    #[test]
    fn test_zero_steps_skip_loop() {
        let params = IsingParams::new(2, 0.0, 1.0, 10, 1.0);
        let mut generator = AdiabaticCircuitGenerator::new(params).unwrap();
        generator.advance().unwrap();
        assert_eq!(generator.advance().unwrap(), Stage::FinalBasisChange);
    }

    #[test]
    fn test_measurement_is_single_shot() {
        let mut circuit = IsingCircuit::new(2, 0.1, 1.0, 10, 1.1).unwrap();
        let before = circuit.sequence().len();
        circuit.append_measurement("x").unwrap();
        assert!(circuit.is_measured());
        assert_eq!(circuit.sequence().len(), before + 1);

        let err = circuit.append_measurement("x").unwrap_err();
        assert!(matches!(err, SynthError::MeasurementAlreadyAppended));
        assert_eq!(circuit.sequence().len(), before + 1);
    }
}
