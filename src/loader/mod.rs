//! CSV loader for benchmark trial records.
//!
//! Columns are resolved by header name, so their order in the file does
//! not matter and unknown columns are ignored.

use crate::models::{Record, Schema};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading the input file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed input at line {line}: {message}")]
    MalformedInput { line: u64, message: String },
}

impl LoadError {
    pub fn malformed<T: Into<String>>(line: u64, msg: T) -> Self {
        LoadError::MalformedInput {
            line,
            message: msg.into(),
        }
    }
}

/// Records loaded from one input, in file order.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub schema: Schema,
    pub records: Vec<Record>,
}

/// Header positions of the columns we read.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    image: usize,
    option: usize,
    intensity: usize,
    freed_root: usize,
    freed_ws: usize,
    duration_seconds: usize,
    after: Option<(usize, usize)>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, LoadError> {
        // A repeated header name resolves to its last occurrence.
        let find = |name: &str| headers.iter().collect::<Vec<_>>().iter().rposition(|h| *h == name);

        let require = |name: &str| {
            find(name).ok_or_else(|| {
                LoadError::malformed(1, format!("missing required column '{}'", name))
            })
        };

        let after = match (find("after_root"), find("after_ws")) {
            (Some(root), Some(ws)) => Some((root, ws)),
            (None, None) => None,
            (root, _) => {
                let present = if root.is_some() { "after_root" } else { "after_ws" };
                warn!(
                    "Column '{}' present without its pair; ignoring available-after data",
                    present
                );
                None
            }
        };

        Ok(Self {
            image: require("image")?,
            option: require("option")?,
            intensity: require("intensity")?,
            freed_root: require("freed_root")?,
            freed_ws: require("freed_ws")?,
            duration_seconds: require("duration_seconds")?,
            after,
        })
    }

    fn schema(&self) -> Schema {
        if self.after.is_some() {
            Schema::Extended
        } else {
            Schema::Minimal
        }
    }
}

/// Load all records from the CSV file at `path`.
pub fn load_records(path: &Path) -> Result<LoadedData, LoadError> {
    debug!("Opening input: {}", path.display());
    let file = File::open(path)?;
    parse_records(file)
}

/// Parse records from any CSV source with a header row.
pub fn parse_records<R: Read>(source: R) -> Result<LoadedData, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;
    let schema = columns.schema();
    debug!("Detected {} schema", schema);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        records.push(parse_row(&row, &columns, line)?);
    }

    Ok(LoadedData { schema, records })
}

fn parse_row(row: &StringRecord, columns: &ColumnIndex, line: u64) -> Result<Record, LoadError> {
    let text = move |idx: usize, name: &str| {
        row.get(idx)
            .ok_or_else(|| LoadError::malformed(line, format!("missing column '{}'", name)))
    };
    let int = move |idx: usize, name: &str| -> Result<i64, LoadError> {
        let raw = text(idx, name)?;
        raw.trim().parse::<i64>().map_err(|_| {
            LoadError::malformed(
                line,
                format!("column '{}' is not an integer: {:?}", name, raw),
            )
        })
    };

    let (after_root, after_ws) = match columns.after {
        Some((root, ws)) => (Some(int(root, "after_root")?), Some(int(ws, "after_ws")?)),
        None => (None, None),
    };

    Ok(Record {
        image: text(columns.image, "image")?.to_string(),
        option: text(columns.option, "option")?.to_string(),
        intensity: text(columns.intensity, "intensity")?.to_string(),
        freed_root: int(columns.freed_root, "freed_root")?,
        freed_ws: int(columns.freed_ws, "freed_ws")?,
        duration_seconds: int(columns.duration_seconds, "duration_seconds")?,
        after_root,
        after_ws,
    })
}
