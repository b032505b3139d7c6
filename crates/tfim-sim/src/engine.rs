//! Circuit execution by tensor contraction.

use ndarray::{ArrayD, IxDyn};
use num_complex::Complex64;
use tracing::{debug, trace};

use tfim_ir::{Bindings, Instruction, IrError, Matrix, Program};

use crate::error::{SimError, SimResult};
use crate::state::{MAX_QUBITS, QubitState, StateTensor, check_width};

/// Executes programs on dense state tensors.
///
/// Each call allocates a fresh tensor of `2^n` amplitudes; the engine itself
/// holds no state besides its register ceiling and can be shared freely.
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    max_qubits: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            max_qubits: MAX_QUBITS,
        }
    }
}

impl Engine {
    /// Engine with the default ceiling of [`MAX_QUBITS`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a lower register ceiling. Values above [`MAX_QUBITS`] are clamped.
    pub fn with_max_qubits(max_qubits: usize) -> Self {
        Self {
            max_qubits: max_qubits.min(MAX_QUBITS),
        }
    }

    /// Register ceiling.
    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    /// Run `program` on `num_qubits` qubits.
    ///
    /// `initial` lists one vector per qubit (default all `|0⟩`). `bindings`
    /// must cover every symbol a parametric instruction references. The
    /// whole program is range-checked before any contraction happens.
    pub fn run(
        &self,
        program: &Program,
        num_qubits: usize,
        initial: Option<&[QubitState]>,
        bindings: Option<&Bindings>,
    ) -> SimResult<StateTensor> {
        check_width(num_qubits, self.max_qubits)?;
        program.validate(num_qubits)?;

        let state = match initial {
            Some(qubits) if qubits.len() != num_qubits => {
                return Err(SimError::DimensionMismatch {
                    context: "initial qubit states".into(),
                    expected: num_qubits,
                    got: qubits.len(),
                });
            }
            Some(qubits) => StateTensor::product(qubits)?,
            None => StateTensor::zero(num_qubits)?,
        };

        debug!(
            num_qubits,
            instructions = program.len(),
            "Executing program"
        );

        program
            .iter()
            .try_fold(state, |state, inst| self.apply(state, inst, bindings))
    }

    /// Apply a single instruction.
    pub fn apply(
        &self,
        state: StateTensor,
        instruction: &Instruction,
        bindings: Option<&Bindings>,
    ) -> SimResult<StateTensor> {
        let num_qubits = state.num_qubits();
        instruction.validate_for(num_qubits)?;

        let matrix = instruction.resolve(bindings)?;
        let k = instruction.bits().len();
        let dim = 1usize << k;
        if matrix.dim() != (dim, dim) {
            return Err(IrError::MalformedGate {
                gate_name: instruction.name().to_string(),
                reason: format!(
                    "matrix is {}x{}, expected {dim}x{dim} for {k} qubit(s)",
                    matrix.nrows(),
                    matrix.ncols()
                ),
            }
            .into());
        }

        let bits: Vec<usize> = instruction.bits().iter().map(|q| q.index()).collect();
        trace!(gate = instruction.name(), ?bits, "Contracting gate");

        let tensor = contract(state.into_tensor(), &matrix, &bits)?;
        Ok(StateTensor::from_tensor(tensor))
    }
}

/// Contract `gate` (shape `(2^k, 2^k)`) against the state axes `bits`.
///
/// The gate's input axis `j` meets state axis `bits[j]`. Untouched axes are
/// moved to the front, the state is flattened to `(2^(n-k), 2^k)` and
/// multiplied by `gateᵀ`, which leaves the output axes at the back in `bits`
/// order. The inverse permutation then restores qubit order.
fn contract(
    state: ArrayD<Complex64>,
    gate: &Matrix,
    bits: &[usize],
) -> SimResult<ArrayD<Complex64>> {
    let n = state.ndim();
    let k = bits.len();

    let order: Vec<usize> = (0..n)
        .filter(|axis| !bits.contains(axis))
        .chain(bits.iter().copied())
        .collect();

    let moved = state
        .permuted_axes(IxDyn(&order))
        .as_standard_layout()
        .into_owned();
    let flat = moved.into_shape_with_order((1usize << (n - k), 1usize << k))?;

    // out[r, o] = Σ_i flat[r, i] · gate[o, i]
    let applied = flat.dot(&gate.t());

    let mut inverse = vec![0usize; n];
    for (pos, &axis) in order.iter().enumerate() {
        inverse[axis] = pos;
    }

    let tensor = applied.into_shape_with_order(IxDyn(&vec![2usize; n]))?;
    Ok(tensor
        .permuted_axes(IxDyn(&inverse))
        .as_standard_layout()
        .into_owned())
}

/// Run `program` with the default [`Engine`].
pub fn run(
    program: &Program,
    num_qubits: usize,
    initial: Option<&[QubitState]>,
    bindings: Option<&Bindings>,
) -> SimResult<StateTensor> {
    Engine::new().run(program, num_qubits, initial, bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;
    use tfim_ir::QubitId;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_hadamard() {
        let mut p = Program::new();
        p.h(QubitId(0)).unwrap();
        let s = run(&p, 1, None, None).unwrap();
        assert!(approx_eq(s.amplitudes()[0], Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(s.amplitudes()[1], Complex64::new(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut p = Program::new();
        p.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let s = run(&p, 2, None, None).unwrap();
        let amps = s.amplitudes();
        assert!(approx_eq(amps[0], Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(amps[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(amps[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(amps[3], Complex64::new(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_reversed_cnot() {
        // control on the higher axis, target on the lower
        let mut p = Program::new();
        p.x(QubitId(2)).unwrap().cx(QubitId(2), QubitId(0)).unwrap();
        let s = run(&p, 3, None, None).unwrap();
        assert!(approx_eq(s.amplitude(&[1, 0, 1]).unwrap(), Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_contract_preserves_axis_order() {
        // X on the middle qubit of |100⟩ gives |110⟩
        let state = StateTensor::basis(&[1, 0, 0]).unwrap();
        let out = contract(state.into_tensor(), &tfim_ir::StandardGate::X.matrix(), &[1]).unwrap();
        assert!(approx_eq(out[IxDyn(&[1, 1, 0])], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_width_checks() {
        let p = Program::new();
        assert!(matches!(run(&p, 0, None, None), Err(SimError::EmptyRegister)));
        let engine = Engine::with_max_qubits(4);
        assert!(matches!(
            engine.run(&p, 5, None, None),
            Err(SimError::TooManyQubits { requested: 5, max: 4 })
        ));
    }

    #[test]
    fn test_initial_length_mismatch() {
        let p = Program::new();
        let init = [crate::state::ZERO_STATE; 2];
        assert!(matches!(
            run(&p, 3, Some(&init[..]), None),
            Err(SimError::DimensionMismatch { expected: 3, got: 2, .. })
        ));
    }
}
