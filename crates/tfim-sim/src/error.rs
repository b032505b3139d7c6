//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced while building, evolving or sampling a state tensor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Shot count must be at least 1.
    #[error("Shot count must be at least 1, got {0}")]
    InvalidShotCount(u32),

    /// Total probability mass is too small to sample from.
    #[error("State has near-zero probability mass ({mass:e}); cannot sample")]
    UnnormalizedState {
        /// Sum of squared amplitude magnitudes.
        mass: f64,
    },

    /// Two sequences that must line up have different lengths.
    #[error("Dimension mismatch ({context}): expected {expected}, got {got}")]
    DimensionMismatch {
        /// What was being matched.
        context: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Register is wider than the engine is willing to allocate.
    #[error("{requested} qubits requested but the engine ceiling is {max}")]
    TooManyQubits {
        /// Requested register width.
        requested: usize,
        /// Engine ceiling.
        max: usize,
    },

    /// Register must contain at least one qubit.
    #[error("Register must contain at least one qubit")]
    EmptyRegister,

    /// A single-qubit vector or basis label cannot describe a qubit.
    #[error("Invalid state for qubit {qubit}: {reason}")]
    InvalidQubitState {
        /// Qubit position.
        qubit: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Outcome label entry is not a bit.
    #[error("Invalid outcome: entry {qubit} is {value}, expected 0 or 1")]
    InvalidOutcome {
        /// Position in the label.
        qubit: usize,
        /// The offending entry.
        value: u8,
    },

    /// Tensor reshape failed.
    #[error("Tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Program or gate error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] tfim_ir::IrError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
