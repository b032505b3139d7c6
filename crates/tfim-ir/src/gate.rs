//! Quantum gate types and the gate library.
//!
//! A [`Gate`] is either a fixed unitary matrix or a parametric generator that
//! turns a vector of real parameters into a matrix. Matrices act on `k` qubits
//! and have shape `(2^k, 2^k)`; row and column indices are read with the first
//! targeted qubit as the most significant bit.

use std::borrow::Cow;

use ndarray::linalg::kron;
use ndarray::{Array2, array};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// Dense complex matrix used for gate unitaries.
pub type Matrix = Array2<Complex64>;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl Pauli {
    /// The 2×2 matrix of this operator.
    pub fn matrix(self) -> Matrix {
        match self {
            Pauli::I => array![[ONE, ZERO], [ZERO, ONE]],
            Pauli::X => array![[ZERO, ONE], [ONE, ZERO]],
            Pauli::Y => array![[ZERO, -I], [I, ZERO]],
            Pauli::Z => array![[ONE, ZERO], [ZERO, -ONE]],
        }
    }

    /// Lower-case letter used in gate names.
    pub fn letter(self) -> char {
        match self {
            Pauli::I => 'i',
            Pauli::X => 'x',
            Pauli::Y => 'y',
            Pauli::Z => 'z',
        }
    }
}

/// Fixed gates with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// Controlled-X (CNOT); control is the first target, the flipped qubit the second.
    CX,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::CX => "cx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(self) -> usize {
        match self {
            StandardGate::CX => 2,
            _ => 1,
        }
    }

    /// The unitary matrix of this gate.
    pub fn matrix(self) -> Matrix {
        match self {
            StandardGate::I => Pauli::I.matrix(),
            StandardGate::X => Pauli::X.matrix(),
            StandardGate::Y => Pauli::Y.matrix(),
            StandardGate::Z => Pauli::Z.matrix(),
            StandardGate::H => {
                let s = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
                array![[s, s], [s, -s]]
            }
            StandardGate::CX => array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE],
                [ZERO, ZERO, ONE, ZERO],
            ],
        }
    }
}

/// Evaluator of a parametric gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Generator {
    /// `exp(-i·θ/2·P₁⊗…⊗P_k)` for a Pauli string of length `k`.
    ///
    /// Because every Pauli string squares to the identity this equals
    /// `cos(θ/2)·I - i·sin(θ/2)·P`. The half-angle is part of the contract.
    PauliRotation(Vec<Pauli>),
}

impl Generator {
    /// Number of qubits the generated matrix acts on.
    pub fn num_qubits(&self) -> usize {
        match self {
            Generator::PauliRotation(paulis) => paulis.len(),
        }
    }

    /// Number of real parameters the generator consumes.
    pub fn num_params(&self) -> usize {
        match self {
            Generator::PauliRotation(_) => 1,
        }
    }

    /// Name in the `rx` / `rzz` style.
    pub fn name(&self) -> String {
        match self {
            Generator::PauliRotation(paulis) => {
                std::iter::once('r').chain(paulis.iter().map(|p| p.letter())).collect()
            }
        }
    }

    /// Evaluate the generator. `params.len()` must equal [`Generator::num_params`].
    fn evaluate(&self, params: &[f64]) -> Matrix {
        match self {
            Generator::PauliRotation(paulis) => {
                let half = params[0] / 2.0;
                let string = paulis
                    .iter()
                    .fold(Matrix::eye(1), |acc, p| kron(&acc, &p.matrix()));
                let dim = string.nrows();
                Matrix::eye(dim).mapv(|v| v * half.cos())
                    - string.mapv(|v| v * Complex64::new(0.0, half.sin()))
            }
        }
    }
}

/// A gate whose matrix depends on named free parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametricGate {
    params: Vec<String>,
    generator: Generator,
}

impl ParametricGate {
    /// Free parameter names, in evaluation order.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// The evaluator.
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Evaluate with one value per free parameter.
    pub fn evaluate(&self, values: &[f64]) -> IrResult<Matrix> {
        if values.len() != self.params.len() {
            return Err(IrError::DimensionMismatch {
                context: format!("parameters of '{}'", self.generator.name()),
                expected: self.params.len(),
                got: values.len(),
            });
        }
        Ok(self.generator.evaluate(values))
    }
}

/// Representation of a gate: fixed matrix or parametric generator.
#[derive(Debug, Clone, PartialEq)]
pub enum GateKind {
    /// A concrete unitary.
    Fixed(Matrix),
    /// A generator over named parameters.
    Parametric(ParametricGate),
}

/// A gate with an optional label.
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    kind: GateKind,
    label: Option<String>,
}

impl Gate {
    /// Create a gate from a user-supplied matrix.
    ///
    /// The matrix must be square with a power-of-two dimension of at least 2.
    pub fn fixed(matrix: Matrix) -> IrResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(IrError::MalformedGate {
                gate_name: "unitary".into(),
                reason: format!("matrix is {rows}x{cols}, not square"),
            });
        }
        if rows < 2 || !rows.is_power_of_two() {
            return Err(IrError::MalformedGate {
                gate_name: "unitary".into(),
                reason: format!("dimension {rows} is not a power of two"),
            });
        }
        Ok(Self {
            kind: GateKind::Fixed(matrix),
            label: None,
        })
    }

    /// Create a gate from the standard library.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Fixed(gate.matrix()),
            label: Some(gate.name().to_string()),
        }
    }

    /// Create a parametric gate from a generator and its free parameter names.
    pub fn parametric(generator: Generator, params: Vec<String>) -> IrResult<Self> {
        if generator.num_qubits() == 0 {
            return Err(IrError::MalformedGate {
                gate_name: generator.name(),
                reason: "generator acts on no qubits".into(),
            });
        }
        if params.len() != generator.num_params() {
            return Err(IrError::DimensionMismatch {
                context: format!("free parameters of '{}'", generator.name()),
                expected: generator.num_params(),
                got: params.len(),
            });
        }
        let label = generator.name();
        Ok(Self {
            kind: GateKind::Parametric(ParametricGate { params, generator }),
            label: Some(label),
        })
    }

    /// Rotation `exp(-i·θ/2·pauli)` with `θ` left as the free parameter `theta`.
    pub fn rotation(pauli: Pauli, theta: impl Into<String>) -> IrResult<Self> {
        if pauli == Pauli::I {
            return Err(IrError::MalformedGate {
                gate_name: "ri".into(),
                reason: "rotation axis must be X, Y or Z".into(),
            });
        }
        Self::parametric(Generator::PauliRotation(vec![pauli]), vec![theta.into()])
    }

    /// Multi-qubit rotation `exp(-i·θ/2·P₁⊗…⊗P_k)`.
    pub fn pauli_rotation(paulis: Vec<Pauli>, theta: impl Into<String>) -> IrResult<Self> {
        Self::parametric(Generator::PauliRotation(paulis), vec![theta.into()])
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The gate representation.
    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or("unitary")
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        match &self.kind {
            GateKind::Fixed(m) => m.nrows().trailing_zeros() as usize,
            GateKind::Parametric(p) => p.generator.num_qubits(),
        }
    }

    /// Number of free parameters (0 for fixed gates).
    pub fn num_params(&self) -> usize {
        match &self.kind {
            GateKind::Fixed(_) => 0,
            GateKind::Parametric(p) => p.params.len(),
        }
    }

    /// Check if this gate has free parameters.
    pub fn is_parametric(&self) -> bool {
        matches!(self.kind, GateKind::Parametric(_))
    }

    /// Resolve to a numeric matrix. Fixed gates ignore `values` and borrow.
    pub fn resolve(&self, values: &[f64]) -> IrResult<Cow<'_, Matrix>> {
        match &self.kind {
            GateKind::Fixed(m) => Ok(Cow::Borrowed(m)),
            GateKind::Parametric(p) => p.evaluate(values).map(Cow::Owned),
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

/// Check `U·U† = I` within `tol` (max-abs entry difference).
pub fn is_unitary(matrix: &Matrix, tol: f64) -> bool {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return false;
    }
    let adjoint = matrix.t().mapv(|v| v.conj());
    let product = matrix.dot(&adjoint);
    product
        .indexed_iter()
        .all(|((r, c), v)| (v - if r == c { ONE } else { ZERO }).norm() <= tol)
}

// =========================================================================
// Gate library
// =========================================================================

/// Identity gate.
pub fn identity() -> Gate {
    Gate::standard(StandardGate::I)
}

/// Pauli-X gate.
pub fn pauli_x() -> Gate {
    Gate::standard(StandardGate::X)
}

/// Pauli-Y gate.
pub fn pauli_y() -> Gate {
    Gate::standard(StandardGate::Y)
}

/// Pauli-Z gate.
pub fn pauli_z() -> Gate {
    Gate::standard(StandardGate::Z)
}

/// Hadamard gate.
pub fn hadamard() -> Gate {
    Gate::standard(StandardGate::H)
}

/// CNOT gate.
pub fn cnot() -> Gate {
    Gate::standard(StandardGate::CX)
}

/// Parametric rotation `exp(-i·theta/2·pauli)`, see [`Gate::rotation`].
pub fn rotation(pauli: Pauli, theta: impl Into<String>) -> IrResult<Gate> {
    Gate::rotation(pauli, theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn assert_matrix_eq(a: &Matrix, b: &Matrix) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).norm() < 1e-12, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(hadamard().name(), "h");
        assert_eq!(cnot().num_qubits(), 2);
        assert!(!cnot().is_parametric());
    }

    #[test]
    fn test_standard_gates_are_unitary() {
        for g in [
            StandardGate::I,
            StandardGate::X,
            StandardGate::Y,
            StandardGate::Z,
            StandardGate::H,
            StandardGate::CX,
        ] {
            assert!(is_unitary(&g.matrix(), 1e-12), "{} not unitary", g.name());
        }
    }

    #[test]
    fn test_rotation_at_zero_is_identity() {
        for p in [Pauli::X, Pauli::Y, Pauli::Z] {
            let gate = rotation(p, "theta").unwrap();
            let m = gate.resolve(&[0.0]).unwrap();
            assert_matrix_eq(&m, &Matrix::eye(2));
        }
    }

    #[test]
    fn test_rotation_half_angle_convention() {
        // RX(π) = -i·X
        let gate = rotation(Pauli::X, "theta").unwrap();
        let m = gate.resolve(&[PI]).unwrap();
        let expected = Pauli::X.matrix().mapv(|v| v * Complex64::new(0.0, -1.0));
        assert_matrix_eq(&m, &expected);

        // RZ(θ) = diag(e^{-iθ/2}, e^{iθ/2})
        let gate = rotation(Pauli::Z, "phi").unwrap();
        let m = gate.resolve(&[0.7]).unwrap();
        assert!((m[[0, 0]] - Complex64::from_polar(1.0, -0.35)).norm() < 1e-12);
        assert!((m[[1, 1]] - Complex64::from_polar(1.0, 0.35)).norm() < 1e-12);
        assert!(m[[0, 1]].norm() < 1e-12);
    }

    #[test]
    fn test_rotation_identity_axis_rejected() {
        assert!(matches!(
            rotation(Pauli::I, "theta"),
            Err(IrError::MalformedGate { .. })
        ));
    }

    #[test]
    fn test_rzz_is_diagonal_and_unitary() {
        let gate = Gate::pauli_rotation(vec![Pauli::Z, Pauli::Z], "t").unwrap();
        assert_eq!(gate.num_qubits(), 2);
        assert_eq!(gate.name(), "rzz");
        let m = gate.resolve(&[1.3]).unwrap();
        assert!(is_unitary(&m, 1e-12));
        assert!(m[[0, 1]].norm() < 1e-12);
        assert!((m[[0, 0]] - Complex64::from_polar(1.0, -0.65)).norm() < 1e-12);
        assert!((m[[1, 1]] - Complex64::from_polar(1.0, 0.65)).norm() < 1e-12);
    }

    #[test]
    fn test_parametric_wrong_value_count() {
        let gate = rotation(Pauli::Y, "theta").unwrap();
        assert!(matches!(
            gate.resolve(&[]),
            Err(IrError::DimensionMismatch { expected: 1, got: 0, .. })
        ));
    }

    #[test]
    fn test_fixed_gate_validation() {
        assert!(Gate::fixed(Matrix::eye(4)).is_ok());
        assert_eq!(Gate::fixed(Matrix::eye(8)).unwrap().num_qubits(), 3);
        assert!(matches!(
            Gate::fixed(Matrix::eye(3)),
            Err(IrError::MalformedGate { .. })
        ));
        assert!(matches!(
            Gate::fixed(Matrix::zeros((2, 4))),
            Err(IrError::MalformedGate { .. })
        ));
    }

    #[test]
    fn test_fixed_resolve_borrows() {
        let g = pauli_x();
        assert!(matches!(g.resolve(&[]).unwrap(), Cow::Borrowed(_)));
    }
}
