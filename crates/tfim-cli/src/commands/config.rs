//! Config command implementation.

use std::path::Path;

use anyhow::Result;

use super::common::{ModelArgs, ScanArgs, resolve_config};

/// Print the effective configuration as YAML.
pub fn execute(config_path: Option<&Path>, model: &ModelArgs, scan: &ScanArgs) -> Result<()> {
    let config = resolve_config(config_path, model, Some(scan))?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
