//! Error types for the VQE crate.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors produced by observables, the objective and the scan driver.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VqeError {
    /// Counts carry no probability mass.
    #[error("No measurements: outcome counts have zero total mass")]
    NoMeasurements,

    /// Observable refers to a qubit outside the measured register.
    #[error("Qubit {qubit} is out of range for {num_qubits}-qubit counts")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: usize,
        /// Width of the measured register.
        num_qubits: usize,
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

    /// Driver or objective settings are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Objective produced a non-finite value.
    #[error("Objective returned a non-finite value at {params:?}")]
    NonFiniteObjective {
        /// Parameters at which it happened.
        params: Vec<f64>,
    },

    /// Configuration file or environment error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Simulation error.
    #[error("Simulation error: {0}")]
    Sim(#[from] tfim_sim::SimError),

    /// Program or binding error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] tfim_ir::IrError),
}

/// Result type for VQE operations.
pub type VqeResult<T> = Result<T, VqeError>;
