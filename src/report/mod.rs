//! Report rendering and output.

pub mod chart;
pub mod generator;

pub use generator::{build_report, generate_json_report};

use crate::models::Report;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Write the report document to `path` and echo the summary to `out`.
pub fn write_report<W: Write>(report: &Report, path: &Path, out: &mut W) -> Result<()> {
    write_output(path, &report.document())?;
    writeln!(out, "{}", report.summary).context("Failed to echo summary")?;
    Ok(())
}

/// Write `content` to `path`, replacing any existing file.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");
        let report = Report {
            summary: "## Title\n".to_string(),
            chart: Some("```mermaid\n```\n".to_string()),
        };

        let mut echoed = Vec::new();
        write_report(&report, &path, &mut echoed).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "## Title\n\n\n```mermaid\n```\n");
        assert_eq!(String::from_utf8(echoed).unwrap(), "## Title\n\n");
    }

    #[test]
    fn test_write_output_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("summary.md");
        assert!(write_output(&path, "x").is_err());
    }
}
