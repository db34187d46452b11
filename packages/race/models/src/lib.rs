#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bar chart race data types.
//!
//! These types describe every stage of the race pipeline: the raw accident
//! events, the cumulative per-month snapshots derived from them, the ranked
//! keyframes produced by interpolation, and the configuration that shapes
//! the whole chain. They carry no behavior beyond small accessors; the
//! pipeline itself lives in `crash_viz_race`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A single accident record with its classifying circumstance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentEvent {
    /// Circumstance the accident was attributed to (e.g. "Speeding").
    pub category: String,
    /// When the crash happened.
    pub occurred_at: NaiveDateTime,
}

impl AccidentEvent {
    /// Creates an event at midnight of the given date.
    #[must_use]
    pub fn on_date(category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            category: category.into(),
            occurred_at: date.and_time(chrono::NaiveTime::MIN),
        }
    }
}

/// Cumulative per-category totals as of the end of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeSnapshot {
    /// Last day of the month this snapshot closes.
    pub period: NaiveDate,
    /// Running count per category, including every category seen so far
    /// in the input (zero when it has not occurred yet).
    pub totals: BTreeMap<Arc<str>, u64>,
}

impl CumulativeSnapshot {
    /// Cumulative count for `category`, or zero when it is unknown.
    #[must_use]
    pub fn total(&self, category: &str) -> u64 {
        self.totals.get(category).copied().unwrap_or(0)
    }

    /// The snapshot's period as an instant (midnight of the period date).
    #[must_use]
    pub fn instant(&self) -> NaiveDateTime {
        self.period.and_time(chrono::NaiveTime::MIN)
    }
}

/// Snapshots together with the category set they were built over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSeries {
    /// Every category present in the input, in first-seen order.
    pub categories: Vec<Arc<str>>,
    /// One snapshot per month, ascending.
    pub snapshots: Vec<CumulativeSnapshot>,
}

/// One category's value and position at a single instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    /// Category name.
    pub category: Arc<str>,
    /// Possibly fractional (interpolated) cumulative count.
    pub value: f64,
    /// 0-based position, clamped to the configured top-N boundary.
    pub rank: usize,
}

/// One rendered instant of the race timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    /// Interpolated point in time.
    pub instant: NaiveDateTime,
    /// All categories, ordered by value descending.
    pub entries: Vec<RankedEntry>,
}

impl Keyframe {
    /// Value of the leading entry, if the keyframe has any entries.
    #[must_use]
    pub fn top_value(&self) -> Option<f64> {
        self.entries.first().map(|e| e.value)
    }

    /// Looks up the entry for `category`.
    #[must_use]
    pub fn entry(&self, category: &str) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| &*e.category == category)
    }
}

/// Arena address of one [`RankedEntry`]: the keyframe it belongs to and
/// its position within that keyframe's entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId {
    /// Keyframe index.
    pub frame: usize,
    /// Position within [`Keyframe::entries`].
    pub slot: usize,
}

impl EntryId {
    /// Creates an id.
    #[must_use]
    pub const fn new(frame: usize, slot: usize) -> Self {
        Self { frame, slot }
    }
}

/// Lifecycle of a playback run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaybackState {
    /// Nothing rendered yet.
    Idle,
    /// First keyframe rendered, waiting for the start trigger.
    AwaitingStart,
    /// Advancing through keyframes.
    Playing,
    /// Every keyframe's transition completed.
    Done,
    /// Stopped by the invalidation signal or a dropped start trigger.
    Cancelled,
}

impl PlaybackState {
    /// Whether no further transitions can happen from this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

const fn default_top_n() -> usize {
    10
}

const fn default_sub_steps() -> usize {
    4
}

const fn default_transition_ms() -> u64 {
    100
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 31).unwrap_or_default()
}

fn default_cutoff_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default()
}

/// Parameters that shape the race timeline and its playback.
///
/// Any change to these values means rebuilding the whole timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RaceConfig {
    /// Number of bars shown; every lower position shares this rank.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Interpolated keyframes per pair of adjacent months.
    #[serde(default = "default_sub_steps")]
    pub sub_steps: usize,
    /// Length of each keyframe's transition in milliseconds.
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    /// First month of the race (any day within it).
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    /// Last date the race may reach, even if the data goes further.
    #[serde(default = "default_cutoff_date")]
    pub cutoff_date: NaiveDate,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            sub_steps: default_sub_steps(),
            transition_ms: default_transition_ms(),
            start_date: default_start_date(),
            cutoff_date: default_cutoff_date(),
        }
    }
}

impl RaceConfig {
    /// Transition length as a [`Duration`].
    #[must_use]
    pub const fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_published_race() {
        let config = RaceConfig::default();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.sub_steps, 4);
        assert_eq!(config.transition_duration(), Duration::from_millis(100));
        assert_eq!(config.start_date.to_string(), "2015-01-31");
        assert_eq!(config.cutoff_date.to_string(), "2024-12-31");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: RaceConfig = toml::from_str("top_n = 5\ncutoff_date = \"2016-06-30\"").unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.sub_steps, 4);
        assert_eq!(config.cutoff_date.to_string(), "2016-06-30");
    }

    #[test]
    fn snapshot_total_defaults_to_zero() {
        let snapshot = CumulativeSnapshot {
            period: NaiveDate::from_ymd_opt(2015, 1, 31).unwrap(),
            totals: BTreeMap::from([(Arc::from("Speeding"), 3)]),
        };
        assert_eq!(snapshot.total("Speeding"), 3);
        assert_eq!(snapshot.total("Distraction"), 0);
    }

    #[test]
    fn playback_state_terminality() {
        assert!(PlaybackState::Done.is_terminal());
        assert!(PlaybackState::Cancelled.is_terminal());
        assert!(!PlaybackState::AwaitingStart.is_terminal());
        assert_eq!(PlaybackState::AwaitingStart.to_string(), "AWAITING_START");
    }
}
