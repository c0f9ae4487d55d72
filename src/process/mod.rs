// src/process/mod.rs
use anyhow::{Context, Result};
use csv::ReaderBuilder;

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::{debug, warn};

pub mod normalize;
pub mod utils;

pub use normalize::{normalize, CanonicalRow};

#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names exactly as the file spells them (BOM and padding included).
    pub headers: Vec<String>,
    /// Every data row, one String per header. Short rows are padded with "".
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Cell lookup that never panics on ragged rows.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Open `path` and read it as a headered CSV.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path.as_ref()))?;
    let table = read_csv(BufReader::new(file))
        .with_context(|| format!("Failed to parse CSV file: {:?}", path.as_ref()))?;
    debug!(
        headers = table.headers.len(),
        rows = table.rows.len(),
        "loaded season table"
    );
    Ok(table)
}

/// Same as [`load_csv`] for an in-memory buffer.
pub fn parse_csv_bytes(data: &[u8]) -> Result<RawTable> {
    read_csv(data)
}

fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // spreadsheet exports often drop trailing empty cells
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("CSV header row is unreadable")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    let mut blank = 0usize;
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;
        // Rows of empty cells are kept; they normalize to an unnamed owner.
        if record.iter().all(|c| c.trim().is_empty()) {
            blank += 1;
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.len() > headers.len() {
            warn!(
                record = idx,
                cells = row.len(),
                headers = headers.len(),
                "row has more cells than headers; extra cells ignored"
            );
            row.truncate(headers.len());
        }
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    if blank > 0 {
        debug!(blank, "rows with only empty cells kept");
    }
    Ok(RawTable { headers, rows })
}
