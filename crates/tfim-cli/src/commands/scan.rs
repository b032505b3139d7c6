//! Scan command implementation.
//!
//! Runs the restarted VQE over the configured field grid and compares each
//! point against the infinite-chain reference.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use tfim_vqe::{ScanPoint, VqeConfig, reference};

use super::common::{ModelArgs, OutputFormat, ScanArgs, print_json, resolve_config};

#[derive(Debug, Serialize)]
struct ScanRow {
    #[serde(flatten)]
    point: ScanPoint,
    reference_per_site: f64,
    error_per_site: f64,
}

#[derive(Debug, Serialize)]
struct ScanReport {
    config: VqeConfig,
    elapsed_ms: u128,
    points: Vec<ScanRow>,
}

/// Execute the scan command.
pub fn execute(
    config_path: Option<&Path>,
    model: &ModelArgs,
    scan: &ScanArgs,
    format: OutputFormat,
    output: Option<&Path>,
    progress: bool,
) -> Result<()> {
    let config = resolve_config(config_path, model, Some(scan))?;
    let fields = config.fields()?;
    let driver = config.driver()?;

    let total = (fields.len() * config.optimizer.restarts) as u64;
    let bar = if progress {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} restarts ({eta})")?
                .progress_chars("█▓░"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    info!(
        num_qubits = config.model.num_qubits,
        fields = fields.len(),
        restarts = config.optimizer.restarts,
        "Starting scan"
    );
    let started = Instant::now();
    let points = driver.scan_with_progress(&fields, || bar.inc(1))?;
    let elapsed = started.elapsed();
    bar.finish_and_clear();

    let coupling = config.model.coupling;
    let rows: Vec<ScanRow> = points
        .into_iter()
        .map(|point| {
            let reference_per_site = reference::energy_per_site(point.field, coupling);
            ScanRow {
                error_per_site: point.energy_per_site - reference_per_site,
                reference_per_site,
                point,
            }
        })
        .collect();

    let report = ScanReport {
        config,
        elapsed_ms: elapsed.as_millis(),
        points: rows,
    };

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| anyhow::anyhow!("JSON serialization failed: {e}"))?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
    }

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_table(&report),
    }

    Ok(())
}

fn print_table(report: &ScanReport) {
    println!(
        "\n{} {}-site ring, J = {}, {} restarts × {} iterations ({} ms)",
        style("✓").green().bold(),
        report.config.model.num_qubits,
        report.config.model.coupling,
        report.config.optimizer.restarts,
        report.config.optimizer.max_iterations,
        style(report.elapsed_ms).yellow()
    );
    println!(
        "\n  {:>8}  {:>12}  {:>12}  {:>10}  {:>9}",
        "h", "E/n (VQE)", "e(h) ref", "Δ", "converged"
    );
    for row in &report.points {
        let p = &row.point;
        println!(
            "  {:>8.4}  {:>12.6}  {:>12.6}  {:>10.2e}  {:>5}/{:<3}",
            p.field,
            p.energy_per_site,
            style(row.reference_per_site).dim(),
            row.error_per_site,
            p.converged_restarts,
            p.restarts
        );
    }
}
