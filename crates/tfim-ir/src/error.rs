//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building or resolving programs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index is outside the register.
    #[error("Qubit {qubit} is out of range for a {num_qubits}-qubit register{}", format_gate_context(.gate_name))]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Register width.
        num_qubits: usize,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Same qubit listed twice in one instruction.
    #[error("Duplicate qubit {qubit} in instruction{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Instruction is structurally invalid for a reason other than its qubits.
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),

    /// Gate matrix shape does not describe a unitary on the targeted qubits.
    #[error("Malformed gate '{gate_name}': {reason}")]
    MalformedGate {
        /// Name of the gate.
        gate_name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Parameter is referenced but has no value.
    #[error("Parameter '{0}' is unbound")]
    UnboundParameter(String),

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
}

impl IrError {
    /// True for the errors that mean "bad qubit operands".
    pub fn is_invalid_instruction(&self) -> bool {
        matches!(
            self,
            IrError::QubitOutOfRange { .. }
                | IrError::DuplicateQubit { .. }
                | IrError::InvalidInstruction(_)
        )
    }
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
