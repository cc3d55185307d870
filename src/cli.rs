//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// aggregate - disk-cleanup benchmark summarizer
///
/// Reads a CSV of benchmark trials, averages repeated runs of each
/// (image, option, intensity) combination, and writes a Markdown
/// summary with a Mermaid chart.
///
/// Examples:
///   aggregate combined.csv summary.md
///   aggregate combined.csv summary.json --format json
///   aggregate combined.csv summary.md --max-chart-points 20
///   aggregate --init-config
#[derive(Parser, Debug, Clone)]
#[command(name = "aggregate", author, version, about, long_about = None)]
pub struct Args {
    /// CSV file of benchmark trials
    #[arg(value_name = "INPUT", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Destination for the report
    #[arg(value_name = "OUTPUT", required_unless_present = "init_config")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .diskbench.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Maximum number of groups plotted on the chart
    ///
    /// Groups past the cap still appear in the table.
    #[arg(long, value_name = "COUNT")]
    pub max_chart_points: Option<usize>,

    /// Do not append the chart block
    #[arg(long)]
    pub no_chart: bool,

    /// Generate a default .diskbench.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown summary with chart (default)
    #[default]
    Markdown,
    /// JSON group averages
    Json,
}

impl Args {
    /// Parse command-line arguments, returning clap's error instead of exiting.
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.max_chart_points == Some(0) {
            return Err("--max-chart-points must be at least 1".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
