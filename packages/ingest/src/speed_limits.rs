//! Year and speed-limit records for the histogram.

use std::io::Read;
use std::path::Path;

use crash_viz_histogram_models::SpeedRecord;
use serde::Deserialize;

use crate::progress::ProgressCallback;
use crate::{IngestError, non_empty, read_file, require_columns};

/// Column holding the crash year.
pub const YEAR_COLUMN: &str = "year";

/// Column holding the posted speed limit.
pub const SPEED_LIMIT_COLUMN: &str = "speed_limit";

/// Speed records loaded from one export.
#[derive(Debug, Clone, Default)]
pub struct LoadedSpeedRecords {
    /// Usable records in file order.
    pub records: Vec<SpeedRecord>,
    /// Rows skipped for a non-numeric year or a zero or unparseable speed
    /// limit.
    pub dropped: u64,
}

#[derive(Debug, Deserialize)]
struct SpeedRow {
    year: Option<String>,
    speed_limit: Option<String>,
}

impl SpeedRow {
    fn to_record(&self) -> Option<SpeedRecord> {
        let year = non_empty(self.year.as_deref())?.parse::<i32>().ok()?;
        let speed_limit = parse_speed_limit(non_empty(self.speed_limit.as_deref())?)?;
        Some(SpeedRecord { year, speed_limit })
    }
}

/// Parses a posted speed limit, accepting whole-number decimals such as
/// `"35.0"`. Zero means "not recorded" and yields `None`.
#[must_use]
pub fn parse_speed_limit(value: &str) -> Option<u32> {
    let value = value.trim();
    let speed = value.parse::<u32>().ok().or_else(|| {
        let float = value.parse::<f64>().ok()?;
        if float.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&float) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = float as u32;
        Some(whole)
    })?;
    (speed != 0).then_some(speed)
}

/// Loads speed records from CSV data with a header row.
///
/// # Errors
///
/// Returns an error if the header row is unreadable or lacks the `year` or
/// `speed_limit` column.
pub fn load_speed_records(
    reader: impl Read,
    progress: &dyn ProgressCallback,
) -> Result<LoadedSpeedRecords, IngestError> {
    read_records(reader, "speed-limit CSV", progress)
}

/// Loads speed records from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or lacks a required column.
pub fn load_speed_records_from_path(
    path: &Path,
    progress: &dyn ProgressCallback,
) -> Result<LoadedSpeedRecords, IngestError> {
    let (bytes, rows) = read_file(path)?;
    progress.set_total(rows);
    read_records(bytes.as_slice(), &path.display().to_string(), progress)
}

fn read_records(
    reader: impl Read,
    origin: &str,
    progress: &dyn ProgressCallback,
) -> Result<LoadedSpeedRecords, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    require_columns(&mut reader, origin, &[YEAR_COLUMN, SPEED_LIMIT_COLUMN])?;

    let mut loaded = LoadedSpeedRecords::default();

    for result in reader.deserialize::<SpeedRow>() {
        progress.row_read();
        match result.map(|row| row.to_record()) {
            Ok(Some(record)) => loaded.records.push(record),
            Ok(None) => loaded.dropped += 1,
            Err(e) => {
                log::trace!("  skipping malformed row: {e}");
                loaded.dropped += 1;
            }
        }
    }

    log::info!(
        "Loaded {} speed-limit records from {origin} ({} rows dropped)",
        loaded.records.len(),
        loaded.dropped
    );
    progress.loaded(loaded.records.len() as u64, loaded.dropped);

    Ok(loaded)
}
