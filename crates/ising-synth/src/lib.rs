//! `ising-synth`: compressed adiabatic Ising-chain circuit synthesis.
//!
//! Builds the circuit that sweeps a transverse-field Ising chain of `n`
//! spins from zero coupling towards `J` on only `m = floor(log2 n) + 1`
//! qubits. The pieces are:
//!
//! - [`ShiftOperator`]: the cyclic basis shift `SHIFTU` / `SHIFTD`
//! - [`RotationScheduler`]: field angle and per-step coupling rotations
//! - [`AdiabaticCircuitGenerator`]: the stage machine emitting the sweep
//! - [`IsingCircuit`]: the finished, unmeasured circuit
//!
//! The emitted [`ising_ir::GateSequence`] is backend-agnostic; the
//! `ising-adapter-sim` crate executes it on a state vector.
//!
//! # Quick start
//!
//! ```rust
//! use ising_synth::{IsingCircuit, IsingParams};
//!
//! let params = IsingParams::new(4, 1.0, 2.0, 2400, 240.1);
//! let mut circuit = IsingCircuit::from_params(params).unwrap();
//! assert_eq!(circuit.num_qubits(), 3);
//! assert_eq!(circuit.step_count(), 1200);
//!
//! circuit.append_measurement("x").unwrap();
//! assert!(circuit.sequence().has_measurements());
//! ```

pub mod error;
pub mod generator;
pub mod params;
pub mod schedule;
pub mod shift;

pub use error::{ErrorKind, SynthError, SynthResult};
pub use generator::{AdiabaticCircuitGenerator, IsingCircuit, Stage};
pub use params::IsingParams;
pub use schedule::{RotationScheduler, StepRotation};
pub use shift::ShiftOperator;
