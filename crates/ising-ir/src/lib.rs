//! Operation IR for compressed Ising circuit synthesis
//!
//! This crate provides the closed set of circuit primitives the Ising
//! generator emits and the append-only container that holds them.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] addresses a wire in a fixed-size register
//! - **Matrices**: [`RealUnitary2`] for the literal real rotations
//! - **Operations**: [`Operation`], a tagged variant backends match on
//! - **Sequences**: [`SequenceBuilder`] while building, [`GateSequence`] once finalized
//!
//! # Example
//!
//! ```rust
//! use ising_ir::{QubitId, RealUnitary2, SequenceBuilder, ShiftDirection};
//!
//! let mut builder = SequenceBuilder::new("demo", 2);
//! builder
//!     .h(QubitId(1)).unwrap()
//!     .shift_all(ShiftDirection::Up).unwrap()
//!     .unitary(RealUnitary2::planar(0.1), QubitId(1)).unwrap()
//!     .shift_all(ShiftDirection::Down).unwrap();
//!
//! let seq = builder.finish();
//! assert_eq!(seq.len(), 4);
//! assert_eq!(seq.operations()[1].diagram_label(), Some("ShiftU"));
//! ```
//!
//! # Operations
//!
//! | Operation | Qubits | Description |
//! |-----------|--------|-------------|
//! | `Hadamard` | 1 | Hadamard gate |
//! | `PhaseShift` | 1 | `S` or `S†` |
//! | `StochasticBitFlip` | 1 | `X` with probability `p` |
//! | `SingleQubitRotation` | 1 | Literal real 2×2 unitary |
//! | `ControlledUnitary` | 1 + k | Real unitary iff all `k` controls read 1 |
//! | `BasisShift` | m | Cyclic shift of the joint basis |
//! | `Measurement` | 1 | Labelled Z-basis measurement |

pub mod error;
pub mod operation;
pub mod qubit;
pub mod sequence;
pub mod unitary;

pub use error::{IrError, IrResult};
pub use operation::{Operation, PhaseDirection, ShiftDirection};
pub use qubit::QubitId;
pub use sequence::{GateSequence, SequenceBuilder};
pub use unitary::RealUnitary2;
