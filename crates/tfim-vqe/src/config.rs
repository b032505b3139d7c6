//! Configuration for VQE scans.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with TFIM_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line flags (applied by the caller)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tfim_sim::{MAX_QUBITS, SamplingMode};

use crate::driver::{Driver, field_grid};
use crate::error::VqeResult;
use crate::objective::Objective;
use crate::optimizer::NelderMead;

/// Complete scan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VqeConfig {
    /// Ising ring parameters
    #[serde(default)]
    pub model: ModelConfig,
    /// Transverse field grid
    #[serde(default)]
    pub scan: ScanConfig,
    /// Optimizer budget
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    /// Shot simulation
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Master seed for restart starting points
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Ising ring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of sites (qubits) on the ring
    #[serde(default = "default_num_qubits")]
    pub num_qubits: usize,
    /// Z-Z coupling J
    #[serde(default = "default_coupling")]
    pub coupling: f64,
}

/// Transverse field grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Smallest field value
    #[serde(default = "default_h_min")]
    pub h_min: f64,
    /// Largest field value
    #[serde(default = "default_h_max")]
    pub h_max: f64,
    /// Number of evenly spaced field values
    #[serde(default = "default_h_steps")]
    pub h_steps: usize,
}

/// Optimizer budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Random restarts per field value
    #[serde(default = "default_restarts")]
    pub restarts: usize,
    /// Iteration cap per restart
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Convergence tolerance on the simplex value spread
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Initial simplex step
    #[serde(default = "default_initial_step")]
    pub initial_step: f64,
}

/// How counts are drawn from a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingKind {
    /// Expected frequencies
    #[default]
    Expected,
    /// Seeded multinomial draws
    Multinomial,
}

impl FromStr for SamplingKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "expected" => Ok(SamplingKind::Expected),
            "multinomial" => Ok(SamplingKind::Multinomial),
            other => Err(ConfigError::ValidationError(format!(
                "Unknown sampling mode: {other}"
            ))),
        }
    }
}

/// Shot simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Shots per measurement basis
    #[serde(default = "default_shots")]
    pub shots: u32,
    /// `expected` or `multinomial`
    #[serde(default)]
    pub mode: SamplingKind,
    /// Seed for multinomial draws
    #[serde(default = "default_sampling_seed")]
    pub seed: u64,
}

// Default value functions

fn default_num_qubits() -> usize {
    4
}

fn default_coupling() -> f64 {
    1.0
}

fn default_h_min() -> f64 {
    0.0
}

fn default_h_max() -> f64 {
    2.0
}

fn default_h_steps() -> usize {
    11
}

fn default_restarts() -> usize {
    5
}

fn default_max_iterations() -> usize {
    200
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_initial_step() -> f64 {
    0.5
}

fn default_shots() -> u32 {
    1000
}

fn default_sampling_seed() -> u64 {
    7
}

fn default_seed() -> u64 {
    42
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            num_qubits: default_num_qubits(),
            coupling: default_coupling(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            h_min: default_h_min(),
            h_max: default_h_max(),
            h_steps: default_h_steps(),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            restarts: default_restarts(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            initial_step: default_initial_step(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            shots: default_shots(),
            mode: SamplingKind::default(),
            seed: default_sampling_seed(),
        }
    }
}

impl Default for VqeConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            scan: ScanConfig::default(),
            optimizer: OptimizerConfig::default(),
            sampling: SamplingConfig::default(),
            seed: default_seed(),
        }
    }
}

/// Parse `raw` into `slot`, naming `key` on failure.
fn parse_into<T: FromStr>(slot: &mut T, key: &str, raw: &str) -> Result<(), ConfigError> {
    *slot = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{key}={raw:?} is not a valid value")))?;
    Ok(())
}

impl VqeConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::IoError(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML text. Missing fields take defaults.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialise to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml_ng::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration with full precedence handling.
    ///
    /// Starts from the file (or defaults), applies `TFIM_*` environment
    /// variables, then validates.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `TFIM_*` process environment variables into this configuration.
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Merge variables supplied by `lookup` into this configuration.
    ///
    /// Only variables `lookup` returns override the current values. A value
    /// that does not parse is an error rather than being skipped.
    pub fn merge_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Model
        if let Some(v) = lookup("TFIM_NUM_QUBITS") {
            parse_into(&mut self.model.num_qubits, "TFIM_NUM_QUBITS", &v)?;
        }
        if let Some(v) = lookup("TFIM_COUPLING") {
            parse_into(&mut self.model.coupling, "TFIM_COUPLING", &v)?;
        }

        // Scan
        if let Some(v) = lookup("TFIM_H_MIN") {
            parse_into(&mut self.scan.h_min, "TFIM_H_MIN", &v)?;
        }
        if let Some(v) = lookup("TFIM_H_MAX") {
            parse_into(&mut self.scan.h_max, "TFIM_H_MAX", &v)?;
        }
        if let Some(v) = lookup("TFIM_H_STEPS") {
            parse_into(&mut self.scan.h_steps, "TFIM_H_STEPS", &v)?;
        }

        // Optimizer
        if let Some(v) = lookup("TFIM_RESTARTS") {
            parse_into(&mut self.optimizer.restarts, "TFIM_RESTARTS", &v)?;
        }
        if let Some(v) = lookup("TFIM_MAX_ITERATIONS") {
            parse_into(&mut self.optimizer.max_iterations, "TFIM_MAX_ITERATIONS", &v)?;
        }
        if let Some(v) = lookup("TFIM_TOLERANCE") {
            parse_into(&mut self.optimizer.tolerance, "TFIM_TOLERANCE", &v)?;
        }
        if let Some(v) = lookup("TFIM_INITIAL_STEP") {
            parse_into(&mut self.optimizer.initial_step, "TFIM_INITIAL_STEP", &v)?;
        }

        // Sampling
        if let Some(v) = lookup("TFIM_SHOTS") {
            parse_into(&mut self.sampling.shots, "TFIM_SHOTS", &v)?;
        }
        if let Some(v) = lookup("TFIM_SAMPLING_MODE") {
            self.sampling.mode = v.parse()?;
        }
        if let Some(v) = lookup("TFIM_SAMPLING_SEED") {
            parse_into(&mut self.sampling.seed, "TFIM_SAMPLING_SEED", &v)?;
        }

        if let Some(v) = lookup("TFIM_SEED") {
            parse_into(&mut self.seed, "TFIM_SEED", &v)?;
        }

        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.model.num_qubits;
        if n == 0 || n > MAX_QUBITS {
            return Err(ConfigError::ValidationError(format!(
                "num_qubits must be between 1 and {MAX_QUBITS}, got {n}"
            )));
        }

        let finite = [
            ("coupling", self.model.coupling),
            ("h_min", self.scan.h_min),
            ("h_max", self.scan.h_max),
            ("tolerance", self.optimizer.tolerance),
            ("initial_step", self.optimizer.initial_step),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be finite, got {value}"
            )));
        }

        if self.scan.h_steps == 0 {
            return Err(ConfigError::ValidationError(
                "h_steps must be greater than 0".to_string(),
            ));
        }
        if self.scan.h_max < self.scan.h_min {
            return Err(ConfigError::ValidationError(format!(
                "h_max ({}) must not be below h_min ({})",
                self.scan.h_max, self.scan.h_min
            )));
        }
        if self.optimizer.restarts == 0 {
            return Err(ConfigError::ValidationError(
                "restarts must be greater than 0".to_string(),
            ));
        }
        if self.optimizer.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        if self.optimizer.tolerance < 0.0 {
            return Err(ConfigError::ValidationError(
                "tolerance must not be negative".to_string(),
            ));
        }
        if self.optimizer.initial_step == 0.0 {
            return Err(ConfigError::ValidationError(
                "initial_step must be non-zero".to_string(),
            ));
        }
        if self.sampling.shots == 0 {
            return Err(ConfigError::ValidationError(
                "shots must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Sampling mode for the shot simulator.
    pub fn sampling_mode(&self) -> SamplingMode {
        match self.sampling.mode {
            SamplingKind::Expected => SamplingMode::Expected,
            SamplingKind::Multinomial => SamplingMode::Multinomial {
                seed: self.sampling.seed,
            },
        }
    }

    /// Field values to scan.
    pub fn fields(&self) -> VqeResult<Vec<f64>> {
        field_grid(self.scan.h_min, self.scan.h_max, self.scan.h_steps)
    }

    /// Objective for the configured ring.
    pub fn objective(&self) -> VqeResult<Objective> {
        Ok(Objective::new(self.model.num_qubits)?
            .with_coupling(self.model.coupling)
            .with_shots(self.sampling.shots)
            .with_sampling(self.sampling_mode()))
    }

    /// Nelder–Mead with the configured budget.
    pub fn optimizer(&self) -> NelderMead {
        NelderMead::new()
            .with_max_iterations(self.optimizer.max_iterations)
            .with_tolerance(self.optimizer.tolerance)
            .with_initial_step(self.optimizer.initial_step)
    }

    /// Driver wired from this configuration.
    pub fn driver(&self) -> VqeResult<Driver<NelderMead>> {
        Ok(Driver::new(self.objective()?, self.optimizer())
            .with_restarts(self.optimizer.restarts)
            .with_seed(self.seed))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = VqeConfig::default();
        assert_eq!(config.model.num_qubits, 4);
        assert_eq!(config.sampling.shots, 1000);
        assert_eq!(config.sampling.mode, SamplingKind::Expected);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_takes_defaults() {
        let yaml = r"
model:
  num_qubits: 6
sampling:
  mode: multinomial
";
        let config = VqeConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.model.num_qubits, 6);
        assert_eq!(config.model.coupling, 1.0);
        assert_eq!(config.scan, ScanConfig::default());
        assert_eq!(config.sampling_mode(), SamplingMode::Multinomial { seed: 7 });
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = VqeConfig::default();
        config.scan.h_steps = 3;
        let yaml = config.to_yaml().unwrap();
        assert_eq!(VqeConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_env_overrides_file() {
        let config = VqeConfig::from_yaml("model:\n  num_qubits: 6\n").unwrap();
        let config = config
            .merge_env_from(env(&[
                ("TFIM_NUM_QUBITS", "3"),
                ("TFIM_SAMPLING_MODE", "Multinomial"),
                ("TFIM_H_MAX", "1.5"),
            ]))
            .unwrap();
        assert_eq!(config.model.num_qubits, 3);
        assert_eq!(config.sampling.mode, SamplingKind::Multinomial);
        assert_eq!(config.scan.h_max, 1.5);
        assert_eq!(config.optimizer, OptimizerConfig::default());
    }

    #[test]
    fn test_env_parse_error() {
        let err = VqeConfig::default()
            .merge_env_from(env(&[("TFIM_SHOTS", "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        let err = VqeConfig::default()
            .merge_env_from(env(&[("TFIM_SAMPLING_MODE", "exact")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validation() {
        let cases: [fn(&mut VqeConfig); 9] = [
            |c| c.model.num_qubits = 0,
            |c| c.model.num_qubits = MAX_QUBITS + 1,
            |c| c.sampling.shots = 0,
            |c| c.optimizer.restarts = 0,
            |c| c.optimizer.max_iterations = 0,
            |c| c.scan.h_steps = 0,
            |c| c.scan.h_max = -1.0,
            |c| c.model.coupling = f64::NAN,
            |c| c.optimizer.initial_step = 0.0,
        ];
        for mutate in cases {
            let mut config = VqeConfig::default();
            mutate(&mut config);
            assert!(
                matches!(config.validate(), Err(ConfigError::ValidationError(_))),
                "{config:?}"
            );
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            VqeConfig::from_file("/nonexistent/tfim.yaml"),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    fn test_builders() {
        let mut config = VqeConfig::default();
        config.scan.h_steps = 3;
        config.model.num_qubits = 2;
        assert_eq!(config.fields().unwrap(), vec![0.0, 1.0, 2.0]);
        let driver = config.driver().unwrap();
        assert_eq!(driver.restarts(), 5);
        assert_eq!(driver.objective().num_qubits(), 2);
        assert_eq!(config.optimizer().max_iterations, 200);
    }
}
