#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Speed-limit histogram computation.
//!
//! Counts crash records per exact speed limit, either across every record or
//! for two selected years side by side.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use crash_viz_histogram_models::{
    CompareBin, Histogram, HistogramBins, HistogramConfig, HistogramKind, HistogramMode,
    SpeedBin, SpeedRecord,
};
use thiserror::Error;

/// Errors that can occur while resolving or computing a histogram.
#[derive(Debug, Error)]
pub enum HistogramError {
    /// Both compared years are the same.
    #[error("Cannot compare {year} with itself; choose two different years")]
    SameYear {
        /// The repeated year.
        year: i32,
    },

    /// A compared year has no records in the selectable range.
    #[error("Year {year} is not available (available: {available:?})")]
    UnknownYear {
        /// The requested year.
        year: i32,
        /// Years that can be compared.
        available: Vec<i32>,
    },

    /// Fewer than two years are available, so nothing can be compared.
    #[error("Comparison needs at least two years of data, found {found}")]
    NotEnoughYears {
        /// Number of available years.
        found: usize,
    },
}

/// Distinct record years inside `range`, ascending.
#[must_use]
pub fn available_years(records: &[SpeedRecord], range: RangeInclusive<i32>) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year)
        .filter(|year| range.contains(year))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Counts records per speed limit, ascending by speed.
#[must_use]
pub fn total_counts(records: &[SpeedRecord]) -> Vec<SpeedBin> {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.speed_limit).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(speed_limit, count)| SpeedBin { speed_limit, count })
        .collect()
}

/// Counts records per speed limit for `first` and `second`.
///
/// The speed axis is the union of speed limits seen in either year; a year
/// with no records at a speed gets a zero count there.
///
/// # Errors
///
/// Returns [`HistogramError::SameYear`] if `first == second`.
pub fn compare_counts(
    records: &[SpeedRecord],
    first: i32,
    second: i32,
) -> Result<Vec<CompareBin>, HistogramError> {
    if first == second {
        return Err(HistogramError::SameYear { year: first });
    }

    let mut counts: BTreeMap<u32, (u64, u64)> = BTreeMap::new();
    for record in records {
        if record.year == first {
            counts.entry(record.speed_limit).or_default().0 += 1;
        } else if record.year == second {
            counts.entry(record.speed_limit).or_default().1 += 1;
        }
    }

    Ok(counts
        .into_iter()
        .map(|(speed_limit, (first, second))| CompareBin {
            speed_limit,
            first,
            second,
        })
        .collect())
}

/// Computes the histogram for `mode`.
///
/// # Errors
///
/// Returns [`HistogramError::SameYear`] for a comparison of a year with
/// itself.
pub fn build(records: &[SpeedRecord], mode: HistogramMode) -> Result<Histogram, HistogramError> {
    let bins = match mode {
        HistogramMode::Total => HistogramBins::Total(total_counts(records)),
        HistogramMode::Compare { first, second } => HistogramBins::Compare {
            first_year: first,
            second_year: second,
            bins: compare_counts(records, first, second)?,
        },
    };

    let histogram = Histogram { mode, bins };
    log::debug!(
        "{}: {} speed limits, max count {}",
        histogram.title(),
        histogram.speed_limits().len(),
        histogram.max_count()
    );
    Ok(histogram)
}

/// Turns a kind and optional year choices into a concrete mode.
///
/// Compare years default to the first and last entries of `years`; explicit
/// years must be in `years` and must differ.
///
/// # Errors
///
/// Returns an error if a year is unavailable, both years are equal, or
/// fewer than two years exist to default from.
pub fn resolve_mode(
    kind: HistogramKind,
    first: Option<i32>,
    second: Option<i32>,
    years: &[i32],
) -> Result<HistogramMode, HistogramError> {
    if kind == HistogramKind::Total {
        return Ok(HistogramMode::Total);
    }

    let first = match first {
        Some(year) => year,
        None => *years
            .first()
            .ok_or(HistogramError::NotEnoughYears { found: years.len() })?,
    };
    let second = match second {
        Some(year) => year,
        None => *years
            .last()
            .ok_or(HistogramError::NotEnoughYears { found: years.len() })?,
    };

    for year in [first, second] {
        if !years.contains(&year) {
            return Err(HistogramError::UnknownYear {
                year,
                available: years.to_vec(),
            });
        }
    }

    if first == second {
        return Err(if years.len() < 2 {
            HistogramError::NotEnoughYears { found: years.len() }
        } else {
            HistogramError::SameYear { year: first }
        });
    }

    Ok(HistogramMode::Compare { first, second })
}

/// Resolves the mode from `config` (with optional overrides) and builds the
/// histogram.
///
/// # Errors
///
/// See [`resolve_mode`].
pub fn build_from_config(
    records: &[SpeedRecord],
    config: &HistogramConfig,
) -> Result<Histogram, HistogramError> {
    let years = available_years(records, config.min_year..=config.max_year);
    let mode = resolve_mode(config.mode, config.first_year, config.second_year, &years)?;
    build(records, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, speed_limit: u32) -> SpeedRecord {
        SpeedRecord { year, speed_limit }
    }

    fn records() -> Vec<SpeedRecord> {
        vec![
            record(2015, 35),
            record(2015, 25),
            record(2015, 35),
            record(2016, 40),
            record(2024, 25),
            record(2024, 55),
            record(2013, 35),
        ]
    }

    #[test]
    fn total_counts_every_record_by_speed() {
        let bins = total_counts(&records());
        assert_eq!(
            bins,
            vec![
                SpeedBin {
                    speed_limit: 25,
                    count: 2
                },
                SpeedBin {
                    speed_limit: 35,
                    count: 3
                },
                SpeedBin {
                    speed_limit: 40,
                    count: 1
                },
                SpeedBin {
                    speed_limit: 55,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn compare_uses_union_of_speeds_with_zero_fill() {
        let bins = compare_counts(&records(), 2015, 2024).unwrap();
        assert_eq!(
            bins,
            vec![
                CompareBin {
                    speed_limit: 25,
                    first: 1,
                    second: 1
                },
                CompareBin {
                    speed_limit: 35,
                    first: 2,
                    second: 0
                },
                CompareBin {
                    speed_limit: 55,
                    first: 0,
                    second: 1
                },
            ]
        );
    }

    #[test]
    fn compare_rejects_same_year() {
        assert!(matches!(
            compare_counts(&records(), 2016, 2016),
            Err(HistogramError::SameYear { year: 2016 })
        ));
    }

    #[test]
    fn available_years_are_bounded_and_sorted() {
        assert_eq!(available_years(&records(), 2015..=2024), vec![2015, 2016, 2024]);
    }

    #[test]
    fn compare_defaults_to_first_and_last_year() {
        let years = available_years(&records(), 2015..=2024);
        let mode = resolve_mode(HistogramKind::Compare, None, None, &years).unwrap();
        assert_eq!(
            mode,
            HistogramMode::Compare {
                first: 2015,
                second: 2024
            }
        );
    }

    #[test]
    fn resolve_rejects_unknown_and_single_year() {
        let years = vec![2015, 2016];
        assert!(matches!(
            resolve_mode(HistogramKind::Compare, Some(2013), None, &years),
            Err(HistogramError::UnknownYear { year: 2013, .. })
        ));
        assert!(matches!(
            resolve_mode(HistogramKind::Compare, None, None, &[2019]),
            Err(HistogramError::NotEnoughYears { found: 1 })
        ));
        assert!(matches!(
            resolve_mode(HistogramKind::Compare, None, None, &[]),
            Err(HistogramError::NotEnoughYears { found: 0 })
        ));
        assert_eq!(
            resolve_mode(HistogramKind::Total, Some(2013), None, &[]).unwrap(),
            HistogramMode::Total
        );
    }

    #[test]
    fn build_from_config_uses_total_mode_by_default() {
        let histogram = build_from_config(&records(), &HistogramConfig::default()).unwrap();
        assert_eq!(histogram.mode, HistogramMode::Total);
        assert_eq!(histogram.max_count(), 3);
    }
}
