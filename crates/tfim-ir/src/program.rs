//! Ordered instruction sequences with a builder API.

use crate::error::IrResult;
use crate::gate::{Gate, Pauli, StandardGate};
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// An ordered sequence of instructions; order is execution order.
///
/// Programs are register-agnostic: qubit ranges are checked against a
/// concrete width by [`Program::validate`] or when the engine runs them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a prebuilt instruction.
    pub fn push(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    // =========================================================================
    // Fixed gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::H, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::X, [qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Y, [qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Z, [qubit])
    }

    /// Apply identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::I, [qubit])
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::CX, [control, target])
    }

    fn standard<const N: usize>(
        &mut self,
        gate: StandardGate,
        bits: [QubitId; N],
    ) -> IrResult<&mut Self> {
        self.instructions.push(Instruction::on(gate, bits)?);
        Ok(self)
    }

    // =========================================================================
    // Parametric gates
    // =========================================================================

    /// Apply `exp(-i·symbol/2·pauli)` on `qubit`, reading the angle from `symbol`.
    pub fn rotation(
        &mut self,
        pauli: Pauli,
        symbol: impl Into<String>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        let symbol = symbol.into();
        let gate = Gate::rotation(pauli, symbol.clone())?;
        self.instructions
            .push(Instruction::new(gate, [qubit], [symbol])?);
        Ok(self)
    }

    /// Apply RX with a symbolic angle.
    pub fn rx(&mut self, symbol: impl Into<String>, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(Pauli::X, symbol, qubit)
    }

    /// Apply RY with a symbolic angle.
    pub fn ry(&mut self, symbol: impl Into<String>, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(Pauli::Y, symbol, qubit)
    }

    /// Apply RZ with a symbolic angle.
    pub fn rz(&mut self, symbol: impl Into<String>, qubit: QubitId) -> IrResult<&mut Self> {
        self.rotation(Pauli::Z, symbol, qubit)
    }

    /// Apply a Pauli-string rotation; `paulis[j]` acts on `qubits[j]`.
    pub fn pauli_rotation(
        &mut self,
        paulis: Vec<Pauli>,
        symbol: impl Into<String>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let symbol = symbol.into();
        let gate = Gate::pauli_rotation(paulis, symbol.clone())?;
        self.instructions
            .push(Instruction::new(gate, qubits, [symbol])?);
        Ok(self)
    }

    /// Apply an arbitrary gate; parametric gates read their own parameter names.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.instructions.push(Instruction::on(gate, qubits)?);
        Ok(self)
    }

    /// Append every instruction of `other`.
    pub fn extend(&mut self, other: &Program) -> &mut Self {
        self.instructions.extend(other.instructions.iter().cloned());
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The instructions in execution order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterate over the instructions.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Distinct symbol names in order of first use.
    pub fn symbols(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for s in self.instructions.iter().flat_map(|i| i.symbols()) {
            if !seen.contains(&s.as_str()) {
                seen.push(s);
            }
        }
        seen
    }

    /// Smallest register width that holds every target qubit.
    pub fn min_qubits(&self) -> usize {
        self.instructions
            .iter()
            .flat_map(|i| i.bits())
            .map(|q| q.index() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Check every instruction against a register of `num_qubits` qubits.
    pub fn validate(&self, num_qubits: usize) -> IrResult<()> {
        self.instructions
            .iter()
            .try_for_each(|inst| inst.validate_for(num_qubits))
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}
