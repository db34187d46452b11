//! Row progress for CSV loading.
//!
//! A multi-year crash export has hundreds of thousands of rows, so the
//! loaders report each row through [`ProgressCallback`]. The terminal
//! implementation lives in `crash_viz_cli_utils`; tests and headless callers
//! use [`NullProgress`].

/// Receives row counts from a loader.
///
/// Implementations must be `Send + Sync` so a callback can be shared with
/// spawned tasks behind an `Arc`.
pub trait ProgressCallback: Send + Sync {
    /// Number of data rows expected. Only called when loading from a file.
    fn set_total(&self, rows: u64);

    /// One data row was read, whether it was kept or dropped.
    fn row_read(&self);

    /// The whole input was read: `kept` rows became records, `dropped` did not.
    fn loaded(&self, kept: u64, dropped: u64);

    /// Remove the progress indicator.
    fn finish_and_clear(&self);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _rows: u64) {}
    fn row_read(&self) {}
    fn loaded(&self, _kept: u64, _dropped: u64) {}
    fn finish_and_clear(&self) {}
}
