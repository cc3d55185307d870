//! diskbench - disk-cleanup benchmark report generator
//!
//! Reads a CSV of benchmark trials, averages repeated runs of each
//! (image, option, intensity) combination, and writes a Markdown summary
//! with a Mermaid chart.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Usage error, malformed input, or I/O failure

mod analysis;
mod cli;
mod config;
mod loader;
mod models;
mod report;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let args = match Args::try_parse_args() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => std::process::exit(0),
                _ => std::process::exit(1),
            }
        }
    };

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    if let Err(e) = run(&args, &config) {
        error!("Aggregation failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .diskbench.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("Created {} with default settings.", CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr; stdout carries the summary only.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    // Only fails if a subscriber is already installed.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        Some(ref config_path) => Config::load(config_path)?,
        None => Config::load_default()?.unwrap_or_default(),
    };
    config.merge_with_args(args);
    Ok(config)
}

/// Load, aggregate, render and write.
fn run(args: &Args, config: &Config) -> Result<()> {
    let input = args.input.as_deref().context("Missing input path")?;
    let output = args.output.as_deref().context("Missing output path")?;

    info!("Loading benchmark results from {}", input.display());
    let data = loader::load_records(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    info!(
        "Loaded {} records ({} schema)",
        data.records.len(),
        data.schema
    );

    let groups = analysis::aggregate(&data.records);
    info!(
        "Aggregated {} trials into {} groups",
        analysis::total_trials(&groups),
        groups.len()
    );
    for (key, acc) in &groups {
        debug!("{}: {} trials", key, acc.count);
    }

    let report = report::build_report(&groups, data.schema, config);
    let mut stdout = std::io::stdout().lock();

    match args.format {
        OutputFormat::Markdown => {
            report::write_report(&report, output, &mut stdout)?;
        }
        OutputFormat::Json => {
            let json = report::generate_json_report(&groups, data.schema)?;
            report::write_output(output, &json)?;
            writeln!(stdout, "{}", report.summary).context("Failed to echo summary")?;
        }
    }

    info!("Report saved to {}", output.display());
    Ok(())
}
