//! Markdown report generation.
//!
//! This module turns the final group accumulators into the Markdown
//! summary: a title, the metric notes and one table row per group.

use crate::analysis::GroupMap;
use crate::config::Config;
use crate::models::{GroupSummary, Report, Schema, GIB};
use anyhow::Result;
use serde::Serialize;

use super::chart::generate_chart;

/// Columns shown for every schema.
const MINIMAL_HEADERS: [&str; 6] = [
    "Image",
    "Option",
    "Intensity",
    "Freed (WS)",
    "Freed (Root)",
    "Duration",
];

/// Columns shown when available-after data is present.
const EXTENDED_HEADERS: [&str; 9] = [
    "Image",
    "Option",
    "Intensity",
    "Freed (WS)",
    "Freed (Root)",
    "Avail After (WS)",
    "Avail After (Root)",
    "Duration",
    "GiB/sec",
];

/// Format bytes as GiB with two decimal places.
pub fn format_gib(bytes: i128) -> String {
    format!("{:.2} GiB", bytes as f64 / GIB)
}

/// Format a duration in whole seconds.
pub fn format_duration(seconds: i128) -> String {
    format!("{}s", seconds)
}

/// Format a throughput rate with three decimal places.
pub fn format_rate(gib_per_sec: f64) -> String {
    format!("{:.3}", gib_per_sec)
}

/// Average every group, in key order.
pub fn summarize(groups: &GroupMap) -> Vec<GroupSummary> {
    groups
        .iter()
        .map(|(key, acc)| GroupSummary {
            key: key.clone(),
            averages: acc.averages(),
        })
        .collect()
}

/// Build the complete report from the aggregated groups.
pub fn build_report(groups: &GroupMap, schema: Schema, config: &Config) -> Report {
    let rows = summarize(groups);

    let chart = if config.chart.enabled {
        Some(generate_chart(&rows, &config.chart))
    } else {
        None
    };

    Report {
        summary: generate_summary(&rows, schema, config),
        chart,
    }
}

/// Generate the header and table.
pub fn generate_summary(rows: &[GroupSummary], schema: Schema, config: &Config) -> String {
    let mut output = String::new();

    output.push_str(&format!("## {}\n\n", config.report.title));

    if config.report.include_notes {
        output.push_str(&generate_notes_section());
    }

    output.push_str(&generate_table(rows, schema));

    output
}

/// Generate the metric explanations.
fn generate_notes_section() -> String {
    let mut section = String::new();

    section.push_str("### Understanding the Metrics\n\n");
    section.push_str(
        "- **Root (/)**: The system partition where the OS and most software is installed. \
         This is typically ~84 GB on GitHub runners.\n",
    );
    section.push_str(
        "- **Workspace**: Your build directory (`$GITHUB_WORKSPACE`). On some actions \
         (like easimon), this may be on a separate LVM volume.\n",
    );
    section.push_str("- **Freed Space**: How much space was reclaimed by the cleanup action.\n");
    section.push_str(
        "- **Available After**: Total free space remaining after cleanup. Higher is better \
         for comparing runner images.\n",
    );
    section.push_str(
        "- **⚠️ easimon Note**: Shows negative root freed because it creates an LVM volume by \
         consuming root space, then remounts workspace there. The workspace freed is what \
         matters.\n",
    );
    section.push('\n');

    section
}

/// Generate the pipe table, one row per group.
fn generate_table(rows: &[GroupSummary], schema: Schema) -> String {
    let headers: &[&str] = if schema.is_extended() {
        &EXTENDED_HEADERS
    } else {
        &MINIMAL_HEADERS
    };

    let mut table = String::new();
    table.push_str(&headers.join(" | "));
    table.push('\n');
    table.push_str(&vec!["---"; headers.len()].join(" | "));
    table.push('\n');

    for row in rows {
        table.push_str(&generate_row(row, schema));
        table.push('\n');
    }

    table
}

fn generate_row(row: &GroupSummary, schema: Schema) -> String {
    let key = &row.key;
    let avg = &row.averages;

    let mut cells = vec![
        key.image.clone(),
        key.option.clone(),
        key.intensity.clone(),
        format_gib(avg.freed_ws),
        format_gib(avg.freed_root),
    ];

    if schema.is_extended() {
        cells.push(format_gib(avg.after_ws));
        cells.push(format_gib(avg.after_root));
        cells.push(format_duration(avg.duration_seconds));
        cells.push(format_rate(avg.gib_per_sec));
    } else {
        cells.push(format_duration(avg.duration_seconds));
    }

    cells.join(" | ")
}

/// JSON document written with `--format json`.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    schema: Schema,
    groups: &'a [GroupSummary],
}

/// Generate a JSON report of every group's averages.
pub fn generate_json_report(groups: &GroupMap, schema: Schema) -> Result<String> {
    let rows = summarize(groups);
    let doc = JsonReport {
        schema,
        groups: &rows,
    };
    serde_json::to_string_pretty(&doc).map_err(Into::into)
}
