//! Field scan with random restarts.
//!
//! For every field value `h` the driver starts the optimizer `R` times from
//! independent random points in `[0, 2π)^3` and keeps the lowest energy. Each
//! `(h, restart)` pair gets its own generator seeded from the master seed and
//! the pair's indices, so results do not depend on scheduling and all pairs
//! can run in parallel.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{VqeError, VqeResult};
use crate::objective::Objective;
use crate::optimizer::{OptimizationResult, Optimizer};

/// Best result for one field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanPoint {
    /// Transverse field `h`.
    pub field: f64,
    /// Lowest energy over all restarts.
    pub best_energy: f64,
    /// `best_energy / n`.
    pub energy_per_site: f64,
    /// Parameters that reached `best_energy`.
    pub best_params: Vec<f64>,
    /// Restarts run.
    pub restarts: usize,
    /// Restarts whose optimizer reported convergence.
    pub converged_restarts: usize,
    /// Objective evaluations summed over restarts.
    pub evaluations: usize,
}

/// One optimizer run.
#[derive(Debug, Clone)]
pub struct RestartResult {
    /// Index of the field value in the scan.
    pub field_index: usize,
    /// Restart number within that field value.
    pub restart: usize,
    /// Random starting point.
    pub initial_params: Vec<f64>,
    /// What the optimizer returned.
    pub result: OptimizationResult,
}

/// `steps` evenly spaced values from `min` to `max` inclusive.
///
/// A single step yields `[min]`.
pub fn field_grid(min: f64, max: f64, steps: usize) -> VqeResult<Vec<f64>> {
    if steps == 0 {
        return Err(VqeError::InvalidConfig("field grid needs at least one step".into()));
    }
    if !min.is_finite() || !max.is_finite() || max < min {
        return Err(VqeError::InvalidConfig(format!(
            "field range [{min}, {max}] is not a finite increasing interval"
        )));
    }
    if steps == 1 {
        return Ok(vec![min]);
    }
    let step = (max - min) / (steps - 1) as f64;
    Ok((0..steps)
        .map(|i| if i + 1 == steps { max } else { min + step * i as f64 })
        .collect())
}

/// Seed for restart `restart` of field value `field_index`.
///
/// SplitMix64 finaliser over the master seed and both indices.
pub fn restart_seed(master: u64, field_index: usize, restart: usize) -> u64 {
    let mut z = master
        ^ (field_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (restart as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Uniform random point in `[0, 2π)^dim`.
pub fn random_start(seed: u64, dim: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..dim).map(|_| rng.gen_range(0.0..TAU)).collect()
}

/// Runs the optimizer over a field grid.
#[derive(Debug, Clone)]
pub struct Driver<O> {
    objective: Objective,
    optimizer: O,
    restarts: usize,
    seed: u64,
}

impl<O> Driver<O>
where
    O: Optimizer + Sync,
{
    /// Driver with 5 restarts and master seed 42.
    pub fn new(objective: Objective, optimizer: O) -> Self {
        Self {
            objective,
            optimizer,
            restarts: 5,
            seed: 42,
        }
    }

    /// Set restarts per field value.
    #[must_use]
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Set the master seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The objective.
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Restarts per field value.
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// Run one restart.
    pub fn run_restart(
        &self,
        field_index: usize,
        field: f64,
        restart: usize,
    ) -> VqeResult<RestartResult> {
        let dim = self.objective.ansatz().num_params();
        let initial_params = random_start(restart_seed(self.seed, field_index, restart), dim);
        let result = self.optimizer.minimize(
            |theta| self.objective.energy(theta, field),
            initial_params.clone(),
        )?;
        if !result.converged {
            warn!(
                field,
                restart,
                value = result.optimal_value,
                "Restart stopped at the iteration budget"
            );
        }
        Ok(RestartResult {
            field_index,
            restart,
            initial_params,
            result,
        })
    }

    /// Optimise a single field value.
    pub fn optimize_field(&self, field_index: usize, field: f64) -> VqeResult<ScanPoint> {
        self.check_restarts()?;
        let runs = (0..self.restarts)
            .into_par_iter()
            .map(|r| self.run_restart(field_index, field, r))
            .collect::<VqeResult<Vec<_>>>()?;
        self.summarize(field, runs)
    }

    /// Optimise every field value.
    pub fn scan(&self, fields: &[f64]) -> VqeResult<Vec<ScanPoint>> {
        self.scan_with_progress(fields, || {})
    }

    /// Optimise every field value, calling `on_restart` as each restart finishes.
    ///
    /// All `(h, restart)` pairs run on the rayon pool; results come back in
    /// field order.
    pub fn scan_with_progress<P>(&self, fields: &[f64], on_restart: P) -> VqeResult<Vec<ScanPoint>>
    where
        P: Fn() + Sync,
    {
        self.check_restarts()?;
        let restarts = self.restarts;
        let runs = (0..fields.len() * restarts)
            .into_par_iter()
            .map(|job| {
                let (field_index, restart) = (job / restarts, job % restarts);
                let run = self.run_restart(field_index, fields[field_index], restart);
                on_restart();
                run
            })
            .collect::<VqeResult<Vec<_>>>()?;

        let mut runs = runs.into_iter();
        fields
            .iter()
            .map(|&field| {
                let chunk: Vec<_> = runs.by_ref().take(restarts).collect();
                self.summarize(field, chunk)
            })
            .collect()
    }

    fn check_restarts(&self) -> VqeResult<()> {
        if self.restarts == 0 {
            return Err(VqeError::InvalidConfig("restarts must be at least 1".into()));
        }
        Ok(())
    }

    fn summarize(&self, field: f64, runs: Vec<RestartResult>) -> VqeResult<ScanPoint> {
        let restarts = runs.len();
        let converged_restarts = runs.iter().filter(|r| r.result.converged).count();
        let evaluations = runs.iter().map(|r| r.result.num_evaluations).sum();

        // strict `<` keeps the earliest restart on ties
        let best = runs
            .into_iter()
            .reduce(|best, r| {
                if r.result.optimal_value < best.result.optimal_value {
                    r
                } else {
                    best
                }
            })
            .ok_or_else(|| VqeError::InvalidConfig("restarts must be at least 1".into()))?;

        let best_energy = best.result.optimal_value;
        let energy_per_site = best_energy / self.objective.num_qubits() as f64;
        info!(
            field,
            best_energy,
            energy_per_site,
            converged = converged_restarts,
            restarts,
            "Field value done"
        );

        Ok(ScanPoint {
            field,
            best_energy,
            energy_per_site,
            best_params: best.result.optimal_params,
            restarts,
            converged_restarts,
            evaluations,
        })
    }
}
