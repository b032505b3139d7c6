//! Program representation for the TFIM simulator.
//!
//! This crate holds the data the engine consumes: gates, instructions bound to
//! qubits and symbol names, ordered programs, and the symbol bindings supplied
//! at execution time.
//!
//! # Core Components
//!
//! - **Gates**: [`StandardGate`] for the fixed library (I, X, Y, Z, H, CX) and
//!   [`Gate`] for the tagged fixed/parametric representation
//! - **Rotations**: [`rotation`] and [`Gate::pauli_rotation`] with the
//!   half-angle convention `exp(-i·θ/2·P)`
//! - **Instructions**: [`Instruction`] combining a gate with its target qubits
//!   and symbol names
//! - **Programs**: [`Program`] builder
//! - **Bindings**: [`Bindings`] mapping symbol names to values
//!
//! # Example: Parameterised Program
//!
//! ```rust
//! use tfim_ir::{Bindings, Program, QubitId};
//! use std::f64::consts::PI;
//!
//! let mut program = Program::new();
//! program.ry("theta", QubitId(0)).unwrap();
//! program.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(program.symbols(), vec!["theta"]);
//! assert!(program.validate(2).is_ok());
//!
//! let bindings = Bindings::new().with("theta", PI / 2.0);
//! assert_eq!(bindings.get("theta"), Some(PI / 2.0));
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `I` | 1 | Identity |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `H` | 1 | Hadamard gate |
//! | `CX` | 2 | Controlled-NOT, control first |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `R{P…}` | k | Pauli-string rotation |
//! | custom | k | User matrix via [`Gate::fixed`] |

pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod program;
pub mod qubit;

pub use error::{IrError, IrResult};
pub use gate::{
    Gate, GateKind, Generator, Matrix, ParametricGate, Pauli, StandardGate, cnot, hadamard,
    identity, is_unitary, pauli_x, pauli_y, pauli_z, rotation,
};
pub use instruction::Instruction;
pub use parameter::Bindings;
pub use program::Program;
pub use qubit::QubitId;
