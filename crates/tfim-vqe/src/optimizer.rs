//! Derivative-free minimisation of the energy objective.
//!
//! The driver only needs the [`Optimizer`] seam: a black box that takes an
//! objective, a starting vector and a budget, calls the objective finitely
//! many times with vectors of the starting dimension, and returns the best
//! point it saw. [`NelderMead`] is the bundled implementation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{VqeError, VqeResult};

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Optimal parameter values.
    pub optimal_params: Vec<f64>,
    /// Optimal objective value.
    pub optimal_value: f64,
    /// Number of function evaluations.
    pub num_evaluations: usize,
    /// Number of iterations.
    pub num_iterations: usize,
    /// Best value after each improving iteration, starting with the initial point.
    pub history: Vec<f64>,
    /// Whether the optimization converged before the budget ran out.
    pub converged: bool,
}

/// A black-box minimiser.
pub trait Optimizer {
    /// Minimise `objective` starting from `initial_params`.
    ///
    /// An error from the objective aborts the run and is returned unchanged.
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> VqeResult<OptimizationResult>
    where
        F: FnMut(&[f64]) -> VqeResult<f64>;
}

/// Nelder–Mead downhill simplex.
///
/// Deterministic: the same objective and starting point always give the same
/// result. One iteration is one reflect/expand/contract/shrink step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NelderMead {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Stop when the spread of simplex values drops below this.
    pub tolerance: f64,
    /// Offset of the initial simplex vertices along each axis.
    pub initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-6,
            initial_step: 0.5,
        }
    }
}

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

impl NelderMead {
    /// Create a new optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the initial simplex step.
    #[must_use]
    pub fn with_initial_step(mut self, initial_step: f64) -> Self {
        self.initial_step = initial_step;
        self
    }
}

/// Evaluation counter around the user objective.
struct Counted<F> {
    objective: F,
    evaluations: usize,
}

impl<F> Counted<F>
where
    F: FnMut(&[f64]) -> VqeResult<f64>,
{
    fn eval(&mut self, x: &[f64]) -> VqeResult<f64> {
        self.evaluations += 1;
        let value = (self.objective)(x)?;
        if value.is_nan() {
            return Err(VqeError::NonFiniteObjective { params: x.to_vec() });
        }
        Ok(value)
    }
}

/// `c + t·(p - c)` component-wise.
fn along(c: &[f64], p: &[f64], t: f64) -> Vec<f64> {
    c.iter().zip(p).map(|(ci, pi)| ci + t * (pi - ci)).collect()
}

impl Optimizer for NelderMead {
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> VqeResult<OptimizationResult>
    where
        F: FnMut(&[f64]) -> VqeResult<f64>,
    {
        let n = initial_params.len();
        if n == 0 {
            return Err(VqeError::DimensionMismatch {
                context: "optimizer start point".into(),
                expected: 1,
                got: 0,
            });
        }
        let mut f = Counted {
            objective,
            evaluations: 0,
        };

        let start_value = f.eval(&initial_params)?;
        let mut history = vec![start_value];
        let mut simplex = vec![(initial_params.clone(), start_value)];
        for i in 0..n {
            let mut point = initial_params.clone();
            point[i] += self.initial_step;
            let value = f.eval(&point)?;
            simplex.push((point, value));
        }
        let lowest = simplex
            .iter()
            .map(|v| v.1)
            .min_by(f64::total_cmp)
            .unwrap_or(start_value);
        if lowest < start_value {
            history.push(lowest);
        }

        let mut converged = false;
        let mut iterations = 0;
        while iterations < self.max_iterations {
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
            let best = simplex[0].1;
            let worst = simplex[n].1;
            if (worst - best).abs() < self.tolerance {
                converged = true;
                break;
            }
            iterations += 1;

            let mut centroid = vec![0.0; n];
            for (point, _) in &simplex[..n] {
                for (c, p) in centroid.iter_mut().zip(point) {
                    *c += p / n as f64;
                }
            }

            let reflected = along(&centroid, &simplex[n].0, -REFLECT);
            let f_reflected = f.eval(&reflected)?;

            if f_reflected < best {
                let expanded = along(&centroid, &simplex[n].0, -EXPAND);
                let f_expanded = f.eval(&expanded)?;
                simplex[n] = if f_expanded < f_reflected {
                    (expanded, f_expanded)
                } else {
                    (reflected, f_reflected)
                };
            } else if f_reflected < simplex[n - 1].1 {
                simplex[n] = (reflected, f_reflected);
            } else {
                // outside contraction if the reflection beat the worst point
                let (toward, f_toward) = if f_reflected < worst {
                    (&reflected, f_reflected)
                } else {
                    (&simplex[n].0, worst)
                };
                let contracted = along(&centroid, toward, CONTRACT);
                let f_contracted = f.eval(&contracted)?;
                if f_contracted < f_toward {
                    simplex[n] = (contracted, f_contracted);
                } else {
                    let anchor = simplex[0].0.clone();
                    for vertex in simplex.iter_mut().skip(1) {
                        vertex.0 = along(&anchor, &vertex.0, SHRINK);
                        vertex.1 = f.eval(&vertex.0)?;
                    }
                }
            }

            let current = simplex
                .iter()
                .map(|v| v.1)
                .min_by(f64::total_cmp)
                .unwrap_or(best);
            if history.last().is_some_and(|&last| current < last) {
                history.push(current);
            }
        }

        let (optimal_params, optimal_value) = simplex
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((initial_params, start_value));

        debug!(
            evaluations = f.evaluations,
            iterations,
            optimal_value,
            converged,
            "Nelder-Mead finished"
        );

        Ok(OptimizationResult {
            optimal_params,
            optimal_value,
            num_evaluations: f.evaluations,
            num_iterations: iterations,
            history,
            converged,
        })
    }
}
