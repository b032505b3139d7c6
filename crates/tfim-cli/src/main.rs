//! tfim Command-Line Interface
//!
//! Evaluates the three-parameter Ising-ring ansatz, runs VQE field scans and
//! prints the infinite-chain reference curve.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{ModelArgs, OutputFormat, ScanArgs};
use commands::{config, energy, reference, scan};

/// tfim - variational ground states of the transverse-field Ising ring
#[derive(Parser)]
#[command(name = "tfim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(short, long, global = true, env = "TFIM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the energy of one parameter vector
    Energy {
        /// Ansatz parameters (theta_1,theta_2,theta_3)
        #[arg(short, long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
        theta: Vec<f64>,

        /// Transverse field h
        #[arg(long, default_value = "0.0")]
        field: f64,

        #[command(flatten)]
        model: ModelArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Run the VQE scan over a field grid
    Scan {
        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        scan: ScanArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write the JSON report to this file as well
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Print the infinite-chain reference energy per site
    Reference {
        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        scan: ScanArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print the effective configuration as YAML
    Config {
        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        scan: ScanArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG wins over -v
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    // Execute command
    let result = match cli.command {
        Commands::Energy {
            theta,
            field,
            model,
            format,
        } => energy::execute(config_path, &model, &theta, field, format),

        Commands::Scan {
            model,
            scan: scan_args,
            format,
            output,
            no_progress,
        } => scan::execute(
            config_path,
            &model,
            &scan_args,
            format,
            output.as_deref(),
            !no_progress,
        ),

        Commands::Reference {
            model,
            scan: scan_args,
            format,
        } => reference::execute(config_path, &model, &scan_args, format),

        Commands::Config {
            model,
            scan: scan_args,
        } => config::execute(config_path, &model, &scan_args),
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
