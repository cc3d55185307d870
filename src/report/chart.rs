//! Mermaid chart emission.
//!
//! Renders an `xychart-beta` bar chart of the average workspace space
//! freed per group.

use crate::config::{ChartConfig, LabelStyle, YAxis};
use crate::models::{GroupSummary, GIB};
use tracing::debug;

/// Generate the fenced Mermaid block for the given rows.
///
/// Only the first `max_points` rows are plotted.
pub fn generate_chart(rows: &[GroupSummary], config: &ChartConfig) -> String {
    let plotted = &rows[..rows.len().min(config.max_points)];
    if plotted.len() < rows.len() {
        debug!(
            "Chart capped at {} of {} groups",
            plotted.len(),
            rows.len()
        );
    }

    let labels: Vec<String> = plotted
        .iter()
        .map(|row| format!("\"{}\"", chart_label(row, config.label)))
        .collect();

    let values: Vec<String> = plotted
        .iter()
        .map(|row| format!("{:.2}", row.averages.freed_ws as f64 / GIB))
        .collect();

    let mut chart = String::new();
    chart.push_str("```mermaid\n");
    chart.push_str("xychart-beta\n");
    chart.push_str(&format!("  title \"{}\"\n", escape(&config.title)));
    chart.push_str(&format!("  x-axis [{}]\n", labels.join(", ")));
    match config.y_axis {
        YAxis::Fixed => chart.push_str("  y-axis \"GiB\" 0 --> 100\n"),
        YAxis::Auto => chart.push_str("  y-axis \"GiB\"\n"),
    }
    chart.push_str(&format!("  bar [{}]\n", values.join(", ")));
    chart.push_str("```\n");

    chart
}

fn chart_label(row: &GroupSummary, style: LabelStyle) -> String {
    let label = match style {
        LabelStyle::OptionIntensity => row.key.short_label(),
        LabelStyle::Full => row.key.full_label(),
    };
    escape(&label)
}

// Mermaid has no escape for a double quote inside a quoted string.
fn escape(text: &str) -> String {
    text.replace('"', "'")
}
