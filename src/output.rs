//! Output of the year-over-year table outside the HTTP service.
//!
//! Supports pretty-printing through the log and CSV export.

use anyhow::Result;
use tracing::{debug, info};

use crate::analyzers::types::DeltaRow;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;

/// Logs each table row using Rust's debug pretty-print format.
pub fn print_pretty(rows: &[DeltaRow]) {
    for row in rows {
        info!("{:#?}", row);
    }
}

/// Serializes the table rows as CSV, with a single header line, into `writer`.
pub fn write_table<W: Write>(writer: W, rows: &[DeltaRow]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the table to a CSV file at `path`, replacing any existing file.
pub fn save_table(path: &str, rows: &[DeltaRow]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing table CSV");
    let file = File::create(path)?;
    write_table(file, rows)
}
