//! Instructions: a gate bound to its target qubits and parameter symbols.

use std::borrow::Cow;

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind, Matrix, StandardGate};
use crate::parameter::Bindings;
use crate::qubit::QubitId;

/// A gate applied to an ordered list of qubits.
///
/// `bits[j]` is matched to gate axis `j`, so for CNOT `bits[0]` is the
/// control. For parametric gates `symbols[j]` names the program-level value
/// fed into free parameter `j`. Instructions are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    gate: Gate,
    bits: Vec<QubitId>,
    symbols: Vec<String>,
}

impl Instruction {
    /// Create an instruction with explicit symbol names.
    ///
    /// Fails when `bits` is empty or repeats a qubit, when the gate width does
    /// not match `bits.len()`, or when `symbols` does not line up with the
    /// gate's free parameters.
    pub fn new(
        gate: impl Into<Gate>,
        bits: impl IntoIterator<Item = QubitId>,
        symbols: impl IntoIterator<Item = String>,
    ) -> IrResult<Self> {
        let gate = gate.into();
        let bits: Vec<QubitId> = bits.into_iter().collect();
        let symbols: Vec<String> = symbols.into_iter().collect();

        if bits.is_empty() {
            return Err(IrError::InvalidInstruction(format!(
                "gate '{}' has no target qubits",
                gate.name()
            )));
        }
        for (i, q) in bits.iter().enumerate() {
            if bits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: Some(gate.name().to_string()),
                });
            }
        }
        if gate.num_qubits() != bits.len() {
            return Err(IrError::MalformedGate {
                gate_name: gate.name().to_string(),
                reason: format!(
                    "acts on {} qubit(s) but {} were given",
                    gate.num_qubits(),
                    bits.len()
                ),
            });
        }
        if symbols.len() != gate.num_params() {
            return Err(IrError::DimensionMismatch {
                context: format!("symbols of '{}'", gate.name()),
                expected: gate.num_params(),
                got: symbols.len(),
            });
        }

        Ok(Self {
            gate,
            bits,
            symbols,
        })
    }

    /// Create an instruction whose symbols are the gate's own parameter names.
    pub fn on(gate: impl Into<Gate>, bits: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        let gate = gate.into();
        let symbols = match gate.kind() {
            GateKind::Fixed(_) => Vec::new(),
            GateKind::Parametric(p) => p.params().to_vec(),
        };
        Self::new(gate, bits, symbols)
    }

    /// Single-qubit standard gate.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> IrResult<Self> {
        Self::on(gate, [qubit])
    }

    /// Two-qubit standard gate.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> IrResult<Self> {
        Self::on(gate, [q1, q2])
    }

    /// The gate.
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Target qubits, in gate-axis order.
    pub fn bits(&self) -> &[QubitId] {
        &self.bits
    }

    /// Symbol names consumed by the gate, in parameter order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Get the name of this instruction.
    pub fn name(&self) -> &str {
        self.gate.name()
    }

    /// Check if the gate needs bound symbols.
    pub fn is_parametric(&self) -> bool {
        self.gate.is_parametric()
    }

    /// Check that every target qubit lies in `[0, num_qubits)`.
    pub fn validate_for(&self, num_qubits: usize) -> IrResult<()> {
        match self.bits.iter().find(|q| q.index() >= num_qubits) {
            Some(q) => Err(IrError::QubitOutOfRange {
                qubit: *q,
                num_qubits,
                gate_name: Some(self.gate.name().to_string()),
            }),
            None => Ok(()),
        }
    }

    /// Resolve the gate to a numeric matrix.
    ///
    /// Fixed gates borrow their matrix and ignore `bindings`. Parametric gates
    /// look up every symbol; a missing binding or missing value fails with
    /// `UnboundParameter` naming the first absent symbol.
    pub fn resolve(&self, bindings: Option<&Bindings>) -> IrResult<Cow<'_, Matrix>> {
        if !self.gate.is_parametric() {
            return self.gate.resolve(&[]);
        }
        let values = match bindings {
            Some(b) => self
                .symbols
                .iter()
                .map(|s| b.require(s))
                .collect::<IrResult<Vec<f64>>>()?,
            None => {
                let first = self.symbols.first().cloned().unwrap_or_default();
                return Err(IrError::UnboundParameter(first));
            }
        };
        self.gate.resolve(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{Pauli, cnot, rotation};

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::two_qubit_gate(StandardGate::CX, QubitId(3), QubitId(0)).unwrap();
        assert_eq!(inst.bits(), &[QubitId(3), QubitId(0)]);
        assert!(inst.symbols().is_empty());
        assert_eq!(inst.name(), "cx");
    }

    #[test]
    fn test_duplicate_bits_rejected() {
        let err = Instruction::on(cnot(), [QubitId(1), QubitId(1)]).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { qubit: QubitId(1), .. }));
        assert!(err.is_invalid_instruction());
    }

    #[test]
    fn test_empty_bits_rejected() {
        let err = Instruction::on(StandardGate::H, []).unwrap_err();
        assert!(err.is_invalid_instruction());
    }

    #[test]
    fn test_arity_mismatch_is_malformed() {
        let err = Instruction::on(cnot(), [QubitId(0)]).unwrap_err();
        assert!(matches!(err, IrError::MalformedGate { .. }));
    }

    #[test]
    fn test_symbol_count_mismatch() {
        let gate = rotation(Pauli::X, "theta").unwrap();
        let err = Instruction::new(gate, [QubitId(0)], vec![]).unwrap_err();
        assert!(matches!(err, IrError::DimensionMismatch { expected: 1, got: 0, .. }));
    }

    #[test]
    fn test_out_of_range() {
        let inst = Instruction::single_qubit_gate(StandardGate::X, QubitId(5)).unwrap();
        assert!(inst.validate_for(6).is_ok());
        let err = inst.validate_for(5).unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { num_qubits: 5, .. }));
        assert!(err.is_invalid_instruction());
    }

    #[test]
    fn test_resolve_uses_instruction_symbols() {
        let gate = rotation(Pauli::Z, "local").unwrap();
        let inst = Instruction::new(gate, [QubitId(0)], vec!["theta_2".to_string()]).unwrap();
        let bindings = Bindings::new().with("theta_2", 0.0);
        let m = inst.resolve(Some(&bindings)).unwrap();
        assert!((m[[0, 0]].re - 1.0).abs() < 1e-12);

        let wrong = Bindings::new().with("local", 0.0);
        assert!(matches!(
            inst.resolve(Some(&wrong)),
            Err(IrError::UnboundParameter(name)) if name == "theta_2"
        ));
        assert!(matches!(inst.resolve(None), Err(IrError::UnboundParameter(_))));
    }
}
