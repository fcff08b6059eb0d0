//! CSV exporter for the current result set.
//!
//! Output shape:
//!
//! - header row: [`display_columns`] of the result set (storage order, lead
//!   column first), quoted only when necessary;
//! - one data row per record in the same column order, every field
//!   double-quoted with inner quotes doubled;
//! - null or missing values are empty fields;
//! - `\n` record terminator.

use crate::types::{display_columns, Record};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

/// File name used when no export path is configured.
pub const DEFAULT_EXPORT_FILE: &str = "results.csv";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("nothing to export: the result set is empty")]
    Empty,
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialise `records` as CSV into `out`. Returns the number of data rows.
pub fn write_csv<W: Write>(
    out: W,
    records: &[Record],
    lead: Option<&str>,
) -> Result<usize, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }
    let columns = display_columns(records, lead);

    let mut header = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    header.write_record(&columns)?;
    let out = header.into_inner().map_err(|e| e.into_error())?;

    let mut rows = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    for record in records {
        let fields: Vec<Cow<'_, str>> = columns.iter().map(|c| record.text(c)).collect();
        rows.write_record(fields.iter().map(|f| f.as_bytes()))?;
    }
    rows.flush()?;

    Ok(records.len())
}

/// Serialise `records` to a CSV string.
pub fn to_csv(records: &[Record], lead: Option<&str>) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records, lead)?;
    // csv only writes the UTF-8 text it was given.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `records` to `path`, creating parent directories as needed.
/// Returns the number of data rows written.
pub fn export_to_path(
    path: &Path,
    records: &[Record],
    lead: Option<&str>,
) -> Result<usize, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let rows = write_csv(std::io::BufWriter::new(file), records, lead)?;
    tracing::info!(path = %path.display(), rows, "exported results");
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
