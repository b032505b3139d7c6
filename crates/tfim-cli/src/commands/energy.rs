//! Energy command implementation.
//!
//! Evaluate the ring energy of a single parameter vector.

use std::path::Path;

use anyhow::Result;
use console::style;
use serde::Serialize;

use tfim_vqe::{EnergyBreakdown, reference};

use super::common::{ModelArgs, OutputFormat, print_json, resolve_config};

#[derive(Debug, Serialize)]
struct EnergyReport<'a> {
    num_qubits: usize,
    coupling: f64,
    field: f64,
    shots: u32,
    theta: &'a [f64],
    #[serde(flatten)]
    breakdown: EnergyBreakdown,
    energy_per_site: f64,
    reference_per_site: f64,
}

/// Execute the energy command.
pub fn execute(
    config_path: Option<&Path>,
    model: &ModelArgs,
    theta: &[f64],
    field: f64,
    format: OutputFormat,
) -> Result<()> {
    let config = resolve_config(config_path, model, None)?;
    let objective = config.objective()?;
    let breakdown = objective.breakdown(theta, field)?;

    let n = config.model.num_qubits;
    let report = EnergyReport {
        num_qubits: n,
        coupling: config.model.coupling,
        field,
        shots: config.sampling.shots,
        theta,
        breakdown,
        energy_per_site: breakdown.energy / n as f64,
        reference_per_site: reference::energy_per_site(field, config.model.coupling),
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            println!(
                "{} {}-site ring, J = {}, h = {}, {} shots",
                style("→").cyan().bold(),
                report.num_qubits,
                report.coupling,
                report.field,
                report.shots
            );
            println!("  θ          {:?}", report.theta);
            println!("  Σ⟨ZZ⟩      {:>12.6}", breakdown.zz);
            println!("  Σ⟨X⟩       {:>12.6}", breakdown.x);
            println!("  E          {}", style(format!("{:>12.6}", breakdown.energy)).green());
            println!("  E/n        {:>12.6}", report.energy_per_site);
            println!(
                "  e(h) ref   {}",
                style(format!("{:>12.6}", report.reference_per_site)).dim()
            );
        }
    }

    Ok(())
}
