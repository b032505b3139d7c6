//! Variational ground-state search for the transverse-field Ising ring.
//!
//! The ring Hamiltonian on `n` sites is
//!
//! ```text
//! H = -(J/4)·Σ Z_i Z_{i+1 mod n} - (h/2)·Σ X_i
//! ```
//!
//! A three-parameter [`Ansatz`] is simulated twice per evaluation, once in
//! the computational basis for the Z-Z terms and once after a Hadamard layer
//! for the X terms. The [`Objective`] combines both estimators into an
//! energy, an [`Optimizer`] minimises it, and the [`Driver`] repeats that
//! from several random starts for each field value of a scan.
//! [`reference::energy_per_site`] gives the infinite-chain ground-state
//! energy to compare against.
//!
//! # Example
//!
//! ```rust
//! use tfim_vqe::{Driver, NelderMead, Objective};
//!
//! let objective = Objective::new(2).unwrap();
//! let optimizer = NelderMead::new().with_max_iterations(100);
//! let driver = Driver::new(objective, optimizer).with_restarts(2);
//!
//! let points = driver.scan(&[0.0, 1.0]).unwrap();
//! assert_eq!(points.len(), 2);
//! assert!(points[0].best_energy <= -0.49);
//! ```

pub mod ansatz;
pub mod config;
pub mod driver;
pub mod error;
pub mod objective;
pub mod observables;
pub mod optimizer;
pub mod reference;

pub use ansatz::{Ansatz, SYMBOLS};
pub use config::{
    ConfigError, ModelConfig, OptimizerConfig, SamplingConfig, SamplingKind, ScanConfig,
    VqeConfig,
};
pub use driver::{Driver, RestartResult, ScanPoint, field_grid, random_start, restart_seed};
pub use error::{VqeError, VqeResult};
pub use objective::{DEFAULT_SHOTS, EnergyBreakdown, Objective, ising_energy};
pub use observables::{expectation_x, expectation_z, expectation_zz, parity};
pub use optimizer::{NelderMead, OptimizationResult, Optimizer};
