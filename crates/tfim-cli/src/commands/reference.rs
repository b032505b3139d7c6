//! Reference command implementation.
//!
//! Print the infinite-chain ground-state energy per site over the field grid.

use std::path::Path;

use anyhow::Result;
use console::style;
use serde::Serialize;

use tfim_vqe::reference;

use super::common::{ModelArgs, OutputFormat, ScanArgs, print_json, resolve_config};

#[derive(Debug, Serialize)]
struct ReferencePoint {
    field: f64,
    energy_per_site: f64,
}

/// Execute the reference command.
pub fn execute(
    config_path: Option<&Path>,
    model: &ModelArgs,
    scan: &ScanArgs,
    format: OutputFormat,
) -> Result<()> {
    let config = resolve_config(config_path, model, Some(scan))?;
    let coupling = config.model.coupling;
    let points: Vec<ReferencePoint> = reference::curve(&config.fields()?, coupling)
        .into_iter()
        .map(|(field, energy_per_site)| ReferencePoint {
            field,
            energy_per_site,
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&points)?,
        OutputFormat::Table => {
            println!(
                "{} Infinite transverse-field Ising chain, J = {}",
                style("→").cyan().bold(),
                coupling
            );
            println!("\n  {:>8}  {:>12}", "h", "e(h)");
            for p in &points {
                println!("  {:>8.4}  {:>12.6}", p.field, p.energy_per_site);
            }
        }
    }

    Ok(())
}
