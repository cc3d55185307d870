//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.diskbench.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".diskbench.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Markdown report settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// H2 title of the summary.
    #[serde(default = "default_title")]
    pub title: String,

    /// Include the "Understanding the Metrics" bullet list.
    #[serde(default = "default_true")]
    pub include_notes: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            include_notes: true,
        }
    }
}

fn default_title() -> String {
    "Disk Space Benchmark Summary".to_string()
}

fn default_true() -> bool {
    true
}

/// Y-axis scaling of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    /// Fixed 0 --> 100 GiB range.
    #[default]
    Fixed,
    /// Let the renderer pick the range.
    Auto,
}

/// How groups are labelled on the chart's x-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelStyle {
    /// `option/intensity`
    #[default]
    OptionIntensity,
    /// `image/option/intensity`
    Full,
}

/// Mermaid chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Append the chart block to the output file.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Chart title.
    #[serde(default = "default_chart_title")]
    pub title: String,

    /// Maximum number of groups plotted.
    #[serde(default = "default_max_points")]
    pub max_points: usize,

    /// Y-axis scaling.
    #[serde(default)]
    pub y_axis: YAxis,

    /// X-axis label style.
    #[serde(default)]
    pub label: LabelStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: default_chart_title(),
            max_points: default_max_points(),
            y_axis: YAxis::default(),
            label: LabelStyle::default(),
        }
    }
}

fn default_chart_title() -> String {
    "Avg Workspace Freed (GiB)".to_string()
}

fn default_max_points() -> usize {
    50
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(max_points) = args.max_chart_points {
            self.chart.max_points = max_points;
        }

        if args.no_chart {
            self.chart.enabled = false;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.report.title, "Disk Space Benchmark Summary");
        assert!(config.report.include_notes);
        assert!(config.chart.enabled);
        assert_eq!(config.chart.max_points, 50);
        assert_eq!(config.chart.y_axis, YAxis::Fixed);
        assert_eq!(config.chart.label, LabelStyle::OptionIntensity);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true

[report]
include_notes = false

[chart]
max_points = 10
y_axis = "auto"
label = "full"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert!(!config.report.include_notes);
        assert_eq!(config.report.title, "Disk Space Benchmark Summary");
        assert_eq!(config.chart.max_points, 10);
        assert_eq!(config.chart.y_axis, YAxis::Auto);
        assert_eq!(config.chart.label, LabelStyle::Full);
        assert!(config.chart.enabled);
    }

    #[test]
    fn test_parse_rejects_unknown_axis() {
        let result: Result<Config, _> = toml::from_str("[chart]\ny_axis = \"log\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[report]\ntitle = \"Nightly\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.report.title, "Nightly");
        assert_eq!(config.chart.max_points, 50);
    }

    #[test]
    fn test_default_toml_round_trips() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[chart]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
