//! Shared helpers for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use tfim_vqe::{SamplingKind, VqeConfig};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Model and sampling overrides.
#[derive(Debug, Clone, Default, Args)]
pub struct ModelArgs {
    /// Number of ring sites
    #[arg(short = 'n', long)]
    pub qubits: Option<usize>,

    /// Z-Z coupling J
    #[arg(long, allow_hyphen_values = true)]
    pub coupling: Option<f64>,

    /// Shots per measurement basis
    #[arg(short, long)]
    pub shots: Option<u32>,

    /// Sampling mode (expected, multinomial)
    #[arg(long)]
    pub sampling: Option<SamplingKind>,

    /// Seed for multinomial sampling
    #[arg(long)]
    pub sampling_seed: Option<u64>,
}

/// Field grid and optimizer overrides.
#[derive(Debug, Clone, Default, Args)]
pub struct ScanArgs {
    /// Smallest field value
    #[arg(long, allow_hyphen_values = true)]
    pub h_min: Option<f64>,

    /// Largest field value
    #[arg(long, allow_hyphen_values = true)]
    pub h_max: Option<f64>,

    /// Number of field values
    #[arg(long)]
    pub h_steps: Option<usize>,

    /// Random restarts per field value
    #[arg(short, long)]
    pub restarts: Option<usize>,

    /// Optimizer iteration cap per restart
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Master seed for restart starting points
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ModelArgs {
    fn apply(&self, config: &mut VqeConfig) {
        if let Some(n) = self.qubits {
            config.model.num_qubits = n;
        }
        if let Some(j) = self.coupling {
            config.model.coupling = j;
        }
        if let Some(shots) = self.shots {
            config.sampling.shots = shots;
        }
        if let Some(mode) = self.sampling {
            config.sampling.mode = mode;
        }
        if let Some(seed) = self.sampling_seed {
            config.sampling.seed = seed;
        }
    }
}

impl ScanArgs {
    fn apply(&self, config: &mut VqeConfig) {
        if let Some(v) = self.h_min {
            config.scan.h_min = v;
        }
        if let Some(v) = self.h_max {
            config.scan.h_max = v;
        }
        if let Some(v) = self.h_steps {
            config.scan.h_steps = v;
        }
        if let Some(v) = self.restarts {
            config.optimizer.restarts = v;
        }
        if let Some(v) = self.max_iterations {
            config.optimizer.max_iterations = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
    }
}

/// Effective configuration: defaults, then file, then `TFIM_*`, then flags.
pub fn resolve_config(
    path: Option<&Path>,
    model: &ModelArgs,
    scan: Option<&ScanArgs>,
) -> Result<VqeConfig> {
    let mut config = match path {
        Some(p) => VqeConfig::from_file(p)
            .with_context(|| format!("Failed to load config: {}", p.display()))?,
        None => VqeConfig::default(),
    }
    .merge_env()
    .context("Failed to apply TFIM_* environment overrides")?;

    model.apply(&mut config);
    if let Some(scan) = scan {
        scan.apply(&mut config);
    }
    config.validate()?;
    Ok(config)
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| anyhow::anyhow!("JSON serialization failed: {e}"))?;
    println!("{json}");
    Ok(())
}
