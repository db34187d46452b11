#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the traffic-accident CSV export into in-memory records.
//!
//! The same export feeds two visualizations: [`accidents`] extracts
//! categorized, timestamped events for the bar chart race and
//! [`speed_limits`] extracts year/speed pairs for the histogram. Rows that
//! cannot be used are dropped and counted, never fatal; a missing required
//! column or an unreadable file is.

pub mod accidents;
pub mod progress;
pub mod speed_limits;

use std::path::Path;

pub use accidents::{LoadedEvents, load_accident_events, load_accident_events_from_path};
pub use speed_limits::{LoadedSpeedRecords, load_speed_records, load_speed_records_from_path};

use thiserror::Error;

/// Errors that can occur while loading a CSV export.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The CSV header row could not be parsed.
    #[error("CSV error in {origin}: {source}")]
    Csv {
        /// File path or other description of the input.
        origin: String,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// A required column is absent from the header row.
    #[error("{origin} has no '{column}' column (found: {found})")]
    MissingColumn {
        /// File path or other description of the input.
        origin: String,
        /// The required column.
        column: &'static str,
        /// Comma-separated header names that were present.
        found: String,
    },
}

/// Reads a whole file, returning its bytes and an estimate of its data rows.
fn read_file(path: &Path) -> Result<(Vec<u8>, u64), IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let lines = bytes.iter().filter(|b| **b == b'\n').count() as u64;
    log::debug!("Read {} bytes (~{lines} lines) from {}", bytes.len(), path.display());
    Ok((bytes, lines.saturating_sub(1)))
}

/// Checks that every column in `required` is in the header row.
fn require_columns<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    origin: &str,
    required: &[&'static str],
) -> Result<(), IngestError> {
    let headers = reader.headers().map_err(|source| IngestError::Csv {
        origin: origin.to_string(),
        source,
    })?;

    for column in required {
        if !headers.iter().any(|h| h.trim() == *column) {
            return Err(IngestError::MissingColumn {
                origin: origin.to_string(),
                column,
                found: headers.iter().collect::<Vec<_>>().join(", "),
            });
        }
    }
    Ok(())
}

/// Trims `value` and returns it unless it is empty.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
