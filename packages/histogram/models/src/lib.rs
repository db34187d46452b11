#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Types for the speed-limit histogram.
//!
//! A [`SpeedRecord`] is one crash with its year and posted speed limit.
//! Records are counted per speed limit either across all years
//! ([`HistogramMode::Total`]) or side by side for two years
//! ([`HistogramMode::Compare`]).

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One crash record reduced to what the histogram needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedRecord {
    /// Calendar year of the crash.
    pub year: i32,
    /// Posted speed limit in mph. Never zero.
    pub speed_limit: u32,
}

/// Which histogram to draw, without its parameters.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum HistogramKind {
    /// Counts across all years.
    #[default]
    Total,
    /// Two years side by side.
    Compare,
}

/// A fully resolved histogram mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramMode {
    /// Counts per speed limit across all records.
    Total,
    /// Counts per speed limit for two distinct years.
    Compare {
        /// Year drawn first (left bar of each group).
        first: i32,
        /// Year drawn second.
        second: i32,
    },
}

impl HistogramMode {
    /// Chart title for this mode.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::Total => "Speed Limit Distribution (All Years)".to_string(),
            Self::Compare { first, second } => {
                format!("Speed Limit Comparison: {first} vs {second}")
            }
        }
    }
}

/// Count of records at one speed limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpeedBin {
    /// Speed limit in mph.
    pub speed_limit: u32,
    /// Number of records.
    pub count: u64,
}

/// Counts at one speed limit for both compared years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompareBin {
    /// Speed limit in mph.
    pub speed_limit: u32,
    /// Records in the first year (zero when absent).
    pub first: u64,
    /// Records in the second year (zero when absent).
    pub second: u64,
}

/// Histogram bins, ascending by speed limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistogramBins {
    /// One bin per speed limit.
    Total(Vec<SpeedBin>),
    /// One grouped bin per speed limit present in either year.
    Compare {
        /// First compared year.
        first_year: i32,
        /// Second compared year.
        second_year: i32,
        /// Grouped bins.
        bins: Vec<CompareBin>,
    },
}

/// A computed histogram, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    /// Mode the histogram was computed for.
    pub mode: HistogramMode,
    /// Bins in ascending speed order.
    pub bins: HistogramBins,
}

impl Histogram {
    /// Chart title.
    #[must_use]
    pub fn title(&self) -> String {
        self.mode.title()
    }

    /// Largest single count, used as the shared value-axis maximum.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        match &self.bins {
            HistogramBins::Total(bins) => bins.iter().map(|b| b.count).max().unwrap_or(0),
            HistogramBins::Compare { bins, .. } => bins
                .iter()
                .map(|b| b.first.max(b.second))
                .max()
                .unwrap_or(0),
        }
    }

    /// Speed limits on the category axis.
    #[must_use]
    pub fn speed_limits(&self) -> Vec<u32> {
        match &self.bins {
            HistogramBins::Total(bins) => bins.iter().map(|b| b.speed_limit).collect(),
            HistogramBins::Compare { bins, .. } => bins.iter().map(|b| b.speed_limit).collect(),
        }
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.bins {
            HistogramBins::Total(bins) => bins.is_empty(),
            HistogramBins::Compare { bins, .. } => bins.is_empty(),
        }
    }
}

/// Histogram settings, loadable from the `[histogram]` table of the config
/// file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// Mode to draw when none is given on the command line.
    pub mode: HistogramKind,
    /// First compared year. Defaults to the earliest available year.
    pub first_year: Option<i32>,
    /// Second compared year. Defaults to the latest available year.
    pub second_year: Option<i32>,
    /// Earliest year offered for comparison.
    pub min_year: i32,
    /// Latest year offered for comparison.
    pub max_year: i32,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            mode: HistogramKind::Total,
            first_year: None,
            second_year: None,
            min_year: 2015,
            max_year: 2024,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn titles_match_mode() {
        assert_eq!(
            HistogramMode::Total.title(),
            "Speed Limit Distribution (All Years)"
        );
        assert_eq!(
            HistogramMode::Compare {
                first: 2015,
                second: 2024
            }
            .title(),
            "Speed Limit Comparison: 2015 vs 2024"
        );
    }

    #[test]
    fn max_count_spans_both_years() {
        let histogram = Histogram {
            mode: HistogramMode::Compare {
                first: 2016,
                second: 2017,
            },
            bins: HistogramBins::Compare {
                first_year: 2016,
                second_year: 2017,
                bins: vec![
                    CompareBin {
                        speed_limit: 25,
                        first: 3,
                        second: 0,
                    },
                    CompareBin {
                        speed_limit: 40,
                        first: 1,
                        second: 7,
                    },
                ],
            },
        };
        assert_eq!(histogram.max_count(), 7);
        assert_eq!(histogram.speed_limits(), vec![25, 40]);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(HistogramKind::from_str("Compare").unwrap(), HistogramKind::Compare);
        assert_eq!(HistogramKind::Total.to_string(), "total");
    }

    #[test]
    fn config_defaults_fill_missing_keys() {
        let config: HistogramConfig = toml::from_str("mode = \"compare\"\nfirst_year = 2018").unwrap();
        assert_eq!(config.mode, HistogramKind::Compare);
        assert_eq!(config.first_year, Some(2018));
        assert_eq!(config.second_year, None);
        assert_eq!(config.max_year, 2024);
    }
}
