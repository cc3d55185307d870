//! Data models for the benchmark aggregator.
//!
//! This module contains the core data structures used throughout
//! the application: loaded trial records, group keys and accumulators,
//! and the averaged view the reporter renders.

use serde::Serialize;
use std::fmt;

/// Bytes in one gibibyte.
pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Which optional columns the input carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    /// Freed space and duration only.
    #[default]
    Minimal,
    /// Also carries `after_root` and `after_ws`.
    Extended,
}

impl Schema {
    /// Returns true when available-after columns are present.
    pub fn is_extended(&self) -> bool {
        matches!(self, Schema::Extended)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Minimal => write!(f, "minimal"),
            Schema::Extended => write!(f, "extended"),
        }
    }
}

/// One benchmark trial, as read from a single CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Runner image identifier.
    pub image: String,
    /// Cleanup method identifier.
    pub option: String,
    /// Cleanup aggressiveness level.
    pub intensity: String,
    /// Bytes freed on the root partition (may be negative).
    pub freed_root: i64,
    /// Bytes freed on the workspace volume.
    pub freed_ws: i64,
    /// Wall-clock duration of the cleanup in seconds.
    pub duration_seconds: i64,
    /// Bytes available on the root partition after cleanup.
    pub after_root: Option<i64>,
    /// Bytes available on the workspace volume after cleanup.
    pub after_ws: Option<i64>,
}

impl Record {
    /// Returns the grouping key for this record.
    pub fn key(&self) -> GroupKey {
        GroupKey {
            image: self.image.clone(),
            option: self.option.clone(),
            intensity: self.intensity.clone(),
        }
    }
}

/// Identifies one benchmark configuration across repeated trials.
///
/// Field order matters: the derived `Ord` sorts by image, then option,
/// then intensity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupKey {
    pub image: String,
    pub option: String,
    pub intensity: String,
}

impl GroupKey {
    /// Short chart label: `option/intensity`.
    pub fn short_label(&self) -> String {
        format!("{}/{}", self.option, self.intensity)
    }

    /// Full chart label: `image/option/intensity`.
    pub fn full_label(&self) -> String {
        format!("{}/{}/{}", self.image, self.option, self.intensity)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.image, self.option, self.intensity)
    }
}

/// Running sums for one group key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupAccumulator {
    /// Number of trials folded in.
    pub count: u64,
    pub sum_freed_root: i128,
    pub sum_freed_ws: i128,
    pub sum_duration: i128,
    pub sum_after_root: i128,
    pub sum_after_ws: i128,
}

impl GroupAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record into every sum and bumps the count.
    pub fn add(&mut self, record: &Record) {
        self.count += 1;
        self.sum_freed_root += i128::from(record.freed_root);
        self.sum_freed_ws += i128::from(record.freed_ws);
        self.sum_duration += i128::from(record.duration_seconds);
        self.sum_after_root += i128::from(record.after_root.unwrap_or(0));
        self.sum_after_ws += i128::from(record.after_ws.unwrap_or(0));
    }

    /// Computes floor-divided averages and the derived throughput rate.
    ///
    /// A zero count is treated as one.
    pub fn averages(&self) -> GroupAverages {
        let divisor = i128::from(self.count.max(1));
        let avg = |sum: i128| sum.div_euclid(divisor);

        let freed_ws = avg(self.sum_freed_ws);
        let duration_seconds = avg(self.sum_duration);

        GroupAverages {
            trials: self.count,
            freed_root: avg(self.sum_freed_root),
            freed_ws,
            after_root: avg(self.sum_after_root),
            after_ws: avg(self.sum_after_ws),
            duration_seconds,
            gib_per_sec: throughput(freed_ws, duration_seconds),
        }
    }
}

/// Workspace GiB freed per second; zero when the duration is not positive.
pub fn throughput(freed_ws: i128, duration_seconds: i128) -> f64 {
    if duration_seconds > 0 {
        (freed_ws as f64 / GIB) / duration_seconds as f64
    } else {
        0.0
    }
}

/// Per-group averaged values as rendered in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverages {
    /// Number of trials averaged.
    pub trials: u64,
    pub freed_root: i128,
    pub freed_ws: i128,
    pub after_root: i128,
    pub after_ws: i128,
    pub duration_seconds: i128,
    /// Average workspace GiB freed per second.
    pub gib_per_sec: f64,
}

/// One row of the summary, keyed and averaged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    #[serde(flatten)]
    pub key: GroupKey,
    #[serde(flatten)]
    pub averages: GroupAverages,
}

/// The rendered benchmark report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Header and table; echoed to standard output.
    pub summary: String,
    /// Fenced chart block, if charting is enabled.
    pub chart: Option<String>,
}

impl Report {
    /// Returns the full document written to the destination file.
    pub fn document(&self) -> String {
        match self.chart {
            Some(ref chart) => format!("{}\n\n{}", self.summary, chart),
            None => self.summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(freed_root: i64, freed_ws: i64, duration_seconds: i64) -> Record {
        Record {
            image: "imgA".to_string(),
            option: "zap".to_string(),
            intensity: "low".to_string(),
            freed_root,
            freed_ws,
            duration_seconds,
            after_root: None,
            after_ws: None,
        }
    }

    #[test]
    fn test_group_key_ordering() {
        let a = GroupKey {
            image: "a".to_string(),
            option: "z".to_string(),
            intensity: "z".to_string(),
        };
        let b = GroupKey {
            image: "b".to_string(),
            option: "a".to_string(),
            intensity: "a".to_string(),
        };
        let c = GroupKey {
            image: "b".to_string(),
            option: "a".to_string(),
            intensity: "b".to_string(),
        };
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_accumulator_averages_floor() {
        let mut acc = GroupAccumulator::new();
        acc.add(&record(100, 200, 10));
        acc.add(&record(301, 401, 31));

        let avg = acc.averages();
        assert_eq!(avg.trials, 2);
        assert_eq!(avg.freed_root, 200);
        assert_eq!(avg.freed_ws, 300);
        assert_eq!(avg.duration_seconds, 20);
    }

    #[test]
    fn test_negative_average_floors_down() {
        let mut acc = GroupAccumulator::new();
        acc.add(&record(-1, 0, 0));
        acc.add(&record(-2, 0, 0));

        // floor(-3 / 2) == -2
        assert_eq!(acc.averages().freed_root, -2);
    }

    #[test]
    fn test_zero_count_uses_unit_divisor() {
        let acc = GroupAccumulator {
            count: 0,
            sum_freed_ws: 42,
            ..GroupAccumulator::default()
        };
        let avg = acc.averages();
        assert_eq!(avg.freed_ws, 42);
        assert_eq!(avg.gib_per_sec, 0.0);
    }

    #[test]
    fn test_throughput() {
        assert_eq!(throughput(1 << 30, 0), 0.0);
        assert_eq!(throughput(1 << 30, -5), 0.0);
        assert!((throughput(4 << 30, 2) - 2.0).abs() < f64::EPSILON);
        assert!(throughput(300, 20) > 0.0);
    }

    #[test]
    fn test_report_document() {
        let report = Report {
            summary: "table\n".to_string(),
            chart: Some("```mermaid\n```\n".to_string()),
        };
        assert_eq!(report.document(), "table\n\n\n```mermaid\n```\n");

        let plain = Report {
            summary: "table\n".to_string(),
            chart: None,
        };
        assert_eq!(plain.document(), "table\n");
    }
}
