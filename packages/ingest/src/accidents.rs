//! Accident events for the bar chart race.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use crash_viz_race_models::AccidentEvent;
use serde::Deserialize;

use crate::progress::ProgressCallback;
use crate::{IngestError, non_empty, read_file, require_columns};

/// Column holding the accident's attributed circumstance.
pub const CATEGORY_COLUMN: &str = "circumstance";

/// Column holding the crash timestamp.
pub const TIMESTAMP_COLUMN: &str = "crash_date_time";

/// Circumstance values that do not name a cause.
pub const EXCLUDED_CATEGORIES: &[&str] = &["Not Applicable", "Unknown"];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %I:%M:%S %p",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Events loaded from one export.
#[derive(Debug, Clone, Default)]
pub struct LoadedEvents {
    /// Usable events in file order.
    pub events: Vec<AccidentEvent>,
    /// Rows that were skipped: excluded or missing circumstance, or an
    /// unparseable timestamp.
    pub dropped: u64,
}

#[derive(Debug, Deserialize)]
struct AccidentRow {
    circumstance: Option<String>,
    crash_date_time: Option<String>,
}

impl AccidentRow {
    fn to_event(&self) -> Option<AccidentEvent> {
        let category = non_empty(self.circumstance.as_deref())?;
        if EXCLUDED_CATEGORIES.contains(&category) {
            return None;
        }
        let occurred_at = parse_crash_date_time(non_empty(self.crash_date_time.as_deref())?)?;
        Some(AccidentEvent {
            category: category.to_string(),
            occurred_at,
        })
    }
}

/// Parses a crash timestamp in any of the ISO or US layouts seen in the
/// county exports. Date-only values are taken as midnight; RFC 3339 values
/// keep their local wall-clock time.
#[must_use]
pub fn parse_crash_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Loads accident events from CSV data with a header row.
///
/// # Errors
///
/// Returns an error if the header row is unreadable or lacks the
/// `circumstance` or `crash_date_time` column.
pub fn load_accident_events(
    reader: impl Read,
    progress: &dyn ProgressCallback,
) -> Result<LoadedEvents, IngestError> {
    read_events(reader, "accident CSV", progress)
}

/// Loads accident events from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or lacks a required column.
pub fn load_accident_events_from_path(
    path: &Path,
    progress: &dyn ProgressCallback,
) -> Result<LoadedEvents, IngestError> {
    let (bytes, rows) = read_file(path)?;
    progress.set_total(rows);
    read_events(bytes.as_slice(), &path.display().to_string(), progress)
}

fn read_events(
    reader: impl Read,
    origin: &str,
    progress: &dyn ProgressCallback,
) -> Result<LoadedEvents, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    require_columns(&mut reader, origin, &[CATEGORY_COLUMN, TIMESTAMP_COLUMN])?;

    let mut loaded = LoadedEvents::default();

    for (line, result) in reader.deserialize::<AccidentRow>().enumerate() {
        progress.row_read();
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                log::trace!("  skipping malformed row {}: {e}", line + 2);
                loaded.dropped += 1;
                continue;
            }
        };

        if let Some(event) = row.to_event() {
            loaded.events.push(event);
        } else {
            log::trace!("  dropping row {}: {row:?}", line + 2);
            loaded.dropped += 1;
        }
    }

    log::info!(
        "Loaded {} accident events from {origin} ({} rows dropped)",
        loaded.events.len(),
        loaded.dropped
    );
    progress.loaded(loaded.events.len() as u64, loaded.dropped);

    Ok(loaded)
}
