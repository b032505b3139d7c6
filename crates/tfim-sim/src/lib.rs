//! Dense-tensor statevector simulation.
//!
//! A state of `n` qubits is a rank-`n` complex tensor with every axis of
//! extent 2, axis `i` being qubit `i`. The [`Engine`] applies a
//! [`tfim_ir::Program`] gate by gate: each gate matrix is contracted against
//! the axes its instruction targets and the result is permuted back so axis
//! order always matches qubit order. The shot simulator turns the final
//! tensor into outcome counts.
//!
//! # Example
//!
//! ```rust
//! use tfim_ir::{Program, QubitId};
//! use tfim_sim::{Engine, sample};
//!
//! let mut program = Program::new();
//! program.h(QubitId(0)).unwrap();
//! program.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let state = Engine::new().run(&program, 2, None, None).unwrap();
//! let counts = sample(&state, 1000).unwrap();
//!
//! assert!((counts.get(&[0, 0]) - 500.0).abs() < 1e-9);
//! assert!((counts.get(&[1, 1]) - 500.0).abs() < 1e-9);
//! assert_eq!(counts.len(), 2);
//! ```

pub mod engine;
pub mod error;
pub mod sampling;
pub mod state;

pub use engine::{Engine, run};
pub use error::{SimError, SimResult};
pub use sampling::{Counts, MIN_PROBABILITY_MASS, Outcome, SamplingMode, sample, sample_with};
pub use state::{MAX_QUBITS, ONE_STATE, QubitState, StateTensor, ZERO_STATE, index_to_bits};
