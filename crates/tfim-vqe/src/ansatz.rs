//! Three-parameter entangling ansatz for the Ising ring.

use tfim_ir::{Bindings, Program, QubitId};

use crate::error::{VqeError, VqeResult};

/// Symbol names in parameter-vector order.
pub const SYMBOLS: [&str; 3] = ["theta_1", "theta_2", "theta_3"];

/// The two measurement programs the objective runs.
///
/// The entangling program is `RY(θ₁)` and `RZ(θ₂)` on qubit 0, a CNOT chain
/// `(0,1), (1,2), …, (n-2,n-1)`, then `RY(θ₃)` on every qubit. Its
/// computational-basis counts give the Z-Z correlators. The X-basis program
/// appends a Hadamard on every qubit. With `θ = (π/2, 0, 0)` the entangling
/// program prepares the GHZ state.
#[derive(Debug, Clone)]
pub struct Ansatz {
    num_qubits: usize,
    entangling: Program,
    x_basis: Program,
}

impl Ansatz {
    /// Build both programs for a ring of `num_qubits`.
    pub fn new(num_qubits: usize) -> VqeResult<Self> {
        if num_qubits == 0 {
            return Err(VqeError::InvalidConfig(
                "ansatz needs at least one qubit".into(),
            ));
        }
        let last = u32::try_from(num_qubits - 1).map_err(|_| {
            VqeError::InvalidConfig(format!("{num_qubits} qubits cannot be addressed"))
        })?;

        let mut entangling = Program::new();
        entangling
            .ry(SYMBOLS[0], QubitId(0))?
            .rz(SYMBOLS[1], QubitId(0))?;
        for q in 0..last {
            entangling.cx(QubitId(q), QubitId(q + 1))?;
        }
        for q in 0..=last {
            entangling.ry(SYMBOLS[2], QubitId(q))?;
        }

        let mut x_basis = entangling.clone();
        for q in 0..=last {
            x_basis.h(QubitId(q))?;
        }

        Ok(Self {
            num_qubits,
            entangling,
            x_basis,
        })
    }

    /// Ring width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of variational parameters.
    pub fn num_params(&self) -> usize {
        SYMBOLS.len()
    }

    /// Program measured in the computational basis.
    pub fn entangling(&self) -> &Program {
        &self.entangling
    }

    /// Program measured after rotating into the X basis.
    pub fn x_basis(&self) -> &Program {
        &self.x_basis
    }

    /// Bind a parameter vector to the ansatz symbols.
    pub fn bind(&self, theta: &[f64]) -> VqeResult<Bindings> {
        if theta.len() != SYMBOLS.len() {
            return Err(VqeError::DimensionMismatch {
                context: "parameter vector".into(),
                expected: SYMBOLS.len(),
                got: theta.len(),
            });
        }
        Ok(Bindings::from_vector(&SYMBOLS, theta)?)
    }
}
