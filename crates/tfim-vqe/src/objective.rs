//! Ising-ring energy of an ansatz parameter vector.

use serde::{Deserialize, Serialize};
use tfim_sim::{Engine, SamplingMode, sample_with};

use crate::ansatz::Ansatz;
use crate::error::{VqeError, VqeResult};
use crate::observables::{expectation_x, expectation_zz};

/// Default shot count per measurement basis.
pub const DEFAULT_SHOTS: u32 = 1000;

/// The two expectation values and the energy they combine into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyBreakdown {
    /// `Σ ⟨Z_i Z_{i+1}⟩` over the ring.
    pub zz: f64,
    /// `Σ ⟨X_i⟩`.
    pub x: f64,
    /// `J·(-1/4)·zz + h·(-1/2)·x`.
    pub energy: f64,
}

/// Energy of the ring Hamiltonian `-(J/4)·Σ Z_i Z_{i+1} - (h/2)·Σ X_i`.
pub fn ising_energy(zz: f64, x: f64, coupling: f64, field: f64) -> f64 {
    coupling * (-0.25) * zz + field * (-0.5) * x
}

/// Maps a parameter vector and a field strength to the ring energy.
///
/// Each evaluation binds the vector, runs the entangling and X-basis
/// programs, samples both and combines the estimators. Evaluations are
/// deterministic for a fixed sampling mode.
#[derive(Debug, Clone)]
pub struct Objective {
    ansatz: Ansatz,
    coupling: f64,
    shots: u32,
    sampling: SamplingMode,
    engine: Engine,
}

impl Objective {
    /// Objective on a ring of `num_qubits` with `J = 1` and 1000 shots.
    pub fn new(num_qubits: usize) -> VqeResult<Self> {
        Ok(Self {
            ansatz: Ansatz::new(num_qubits)?,
            coupling: 1.0,
            shots: DEFAULT_SHOTS,
            sampling: SamplingMode::Expected,
            engine: Engine::new(),
        })
    }

    /// Set the Z-Z coupling `J`.
    #[must_use]
    pub fn with_coupling(mut self, coupling: f64) -> Self {
        self.coupling = coupling;
        self
    }

    /// Set the shots per basis.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Set the sampling mode.
    #[must_use]
    pub fn with_sampling(mut self, sampling: SamplingMode) -> Self {
        self.sampling = sampling;
        self
    }

    /// Use a specific engine (for example one with a lower qubit ceiling).
    #[must_use]
    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    /// The ansatz.
    pub fn ansatz(&self) -> &Ansatz {
        &self.ansatz
    }

    /// Ring width.
    pub fn num_qubits(&self) -> usize {
        self.ansatz.num_qubits()
    }

    /// Coupling `J`.
    pub fn coupling(&self) -> f64 {
        self.coupling
    }

    /// Both expectation values and the energy at `theta`, `field`.
    pub fn breakdown(&self, theta: &[f64], field: f64) -> VqeResult<EnergyBreakdown> {
        let bindings = self.ansatz.bind(theta)?;
        let n = self.ansatz.num_qubits();

        let z_state = self
            .engine
            .run(self.ansatz.entangling(), n, None, Some(&bindings))?;
        let z_counts = sample_with(&z_state, self.shots, self.sampling)?;

        let x_state = self
            .engine
            .run(self.ansatz.x_basis(), n, None, Some(&bindings))?;
        let x_counts = sample_with(&x_state, self.shots, self.sampling)?;

        let zz = expectation_zz(&z_counts, n)?;
        let x = expectation_x(&x_counts, n)?;
        let energy = ising_energy(zz, x, self.coupling, field);
        if !energy.is_finite() {
            return Err(VqeError::NonFiniteObjective {
                params: theta.to_vec(),
            });
        }
        Ok(EnergyBreakdown { zz, x, energy })
    }

    /// Energy at `theta`, `field`.
    pub fn energy(&self, theta: &[f64], field: f64) -> VqeResult<f64> {
        self.breakdown(theta, field).map(|b| b.energy)
    }
}
