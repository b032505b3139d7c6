//! Shot simulation: turning a state tensor into outcome counts.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::state::{StateTensor, index_to_bits};

/// Below this total probability mass a state is treated as empty.
pub const MIN_PROBABILITY_MASS: f64 = 1e-12;

/// Basis label, one entry (0 or 1) per qubit, qubit 0 first.
pub type Outcome = Vec<u8>;

/// How counts are derived from the probability distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SamplingMode {
    /// `count = probability × shots`; fractional, noise-free.
    #[default]
    Expected,
    /// Draw `shots` independent outcomes from a seeded generator.
    Multinomial {
        /// Generator seed.
        seed: u64,
    },
}

/// Outcome → count mapping. Only strictly positive counts are stored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Counts {
    num_qubits: usize,
    counts: BTreeMap<Outcome, f64>,
}

impl Counts {
    /// Empty counts for a register of `num_qubits`.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            counts: BTreeMap::new(),
        }
    }

    /// Build from `(outcome, count)` pairs; every outcome must have
    /// `num_qubits` entries, each 0 or 1. Non-positive counts are dropped.
    pub fn from_pairs(
        num_qubits: usize,
        pairs: impl IntoIterator<Item = (Outcome, f64)>,
    ) -> SimResult<Self> {
        let mut counts = Self::new(num_qubits);
        for (outcome, count) in pairs {
            counts.add(outcome, count)?;
        }
        Ok(counts)
    }

    /// Accumulate `count` onto `outcome`.
    pub fn add(&mut self, outcome: Outcome, count: f64) -> SimResult<()> {
        if outcome.len() != self.num_qubits {
            return Err(SimError::DimensionMismatch {
                context: "outcome length".into(),
                expected: self.num_qubits,
                got: outcome.len(),
            });
        }
        if let Some((qubit, &value)) = outcome.iter().enumerate().find(|&(_, &b)| b > 1) {
            return Err(SimError::InvalidOutcome { qubit, value });
        }
        if count > 0.0 {
            *self.counts.entry(outcome).or_insert(0.0) += count;
        }
        Ok(())
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Count for `outcome` (0 if absent).
    pub fn get(&self, outcome: &[u8]) -> f64 {
        self.counts.get(outcome).copied().unwrap_or(0.0)
    }

    /// Total mass.
    pub fn total(&self) -> f64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if no outcome has positive mass.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate in lexicographic outcome order.
    pub fn iter(&self) -> impl Iterator<Item = (&Outcome, f64)> {
        self.counts.iter().map(|(k, &v)| (k, v))
    }

    /// Counts keyed by bit strings such as `"011"`.
    pub fn to_bitstrings(&self) -> BTreeMap<String, f64> {
        self.counts
            .iter()
            .map(|(k, &v)| (k.iter().map(|b| char::from(b'0' + b)).collect(), v))
            .collect()
    }
}

/// Expected-frequency counts for `shots` measurements.
///
/// Each count is exactly `p·shots`, possibly fractional. No pseudo-random
/// draws are made, so energies estimated from these counts carry no shot
/// noise and the objective the optimizer sees is smooth in its parameters.
/// Use [`sample_with`] with [`SamplingMode::Multinomial`] to opt into
/// seeded finite-shot draws instead.
pub fn sample(state: &StateTensor, shots: u32) -> SimResult<Counts> {
    sample_with(state, shots, SamplingMode::Expected)
}

/// Counts for `shots` measurements under `mode`.
///
/// Probabilities are divided by the total mass, so the counts always add up
/// to `shots` even for an unnormalised state.
pub fn sample_with(state: &StateTensor, shots: u32, mode: SamplingMode) -> SimResult<Counts> {
    if shots == 0 {
        return Err(SimError::InvalidShotCount(shots));
    }
    let probabilities = state.probabilities();
    let mass: f64 = probabilities.iter().sum();
    if !mass.is_finite() || mass < MIN_PROBABILITY_MASS {
        return Err(SimError::UnnormalizedState { mass });
    }

    let num_qubits = state.num_qubits();
    let mut counts = Counts::new(num_qubits);
    match mode {
        SamplingMode::Expected => {
            let scale = f64::from(shots) / mass;
            for (index, p) in probabilities.iter().enumerate() {
                if *p > 0.0 {
                    counts.add(index_to_bits(index, num_qubits), p * scale)?;
                }
            }
        }
        SamplingMode::Multinomial { seed } => {
            let dist = WeightedIndex::new(&probabilities)
                .map_err(|_| SimError::UnnormalizedState { mass })?;
            let mut rng = StdRng::seed_from_u64(seed);
            let mut tally = vec![0u32; probabilities.len()];
            for _ in 0..shots {
                tally[dist.sample(&mut rng)] += 1;
            }
            for (index, n) in tally.into_iter().enumerate() {
                if n > 0 {
                    counts.add(index_to_bits(index, num_qubits), f64::from(n))?;
                }
            }
        }
    }

    debug!(shots, outcomes = counts.len(), ?mode, "Sampled state");
    Ok(counts)
}
