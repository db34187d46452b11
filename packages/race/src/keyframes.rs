//! Linear interpolation of monthly snapshots into keyframes.

use chrono::{NaiveDateTime, TimeDelta};
use crash_viz_race_models::{CumulativeSnapshot, Keyframe};

use crate::RaceError;
use crate::rank::Ranker;

/// Builds the keyframe sequence for `snapshots`.
///
/// Each adjacent pair of snapshots contributes `sub_steps` keyframes at
/// fractions `i / sub_steps`, followed by one terminal keyframe holding the
/// last snapshot's own values. `N` snapshots therefore yield
/// `sub_steps * (N - 1) + 1` keyframes, and none at all when `N == 0`.
///
/// # Errors
///
/// Returns [`RaceError::InvalidConfig`] if `sub_steps` is zero.
pub fn interpolate(
    snapshots: &[CumulativeSnapshot],
    ranker: &Ranker,
    sub_steps: usize,
) -> Result<Vec<Keyframe>, RaceError> {
    if sub_steps == 0 {
        return Err(RaceError::InvalidConfig {
            message: "sub_steps must be at least 1".to_string(),
        });
    }

    let Some(last) = snapshots.last() else {
        return Ok(Vec::new());
    };

    let mut keyframes = Vec::with_capacity(sub_steps * (snapshots.len() - 1) + 1);

    for pair in snapshots.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (from, to) = (a.instant(), b.instant());

        for i in 0..sub_steps {
            let t = fraction(i, sub_steps);
            keyframes.push(Keyframe {
                instant: blend_instant(from, to, t),
                entries: ranker.rank(|name| blend(a.total(name), b.total(name), t)),
            });
        }
    }

    keyframes.push(Keyframe {
        instant: last.instant(),
        entries: ranker.rank(|name| as_value(last.total(name))),
    });

    Ok(keyframes)
}

/// `a * (1 - t) + b * t`.
#[must_use]
pub fn blend(a: u64, b: u64, t: f64) -> f64 {
    as_value(a).mul_add(1.0 - t, as_value(b) * t)
}

#[allow(clippy::cast_precision_loss)]
fn fraction(i: usize, of: usize) -> f64 {
    i as f64 / of as f64
}

#[allow(clippy::cast_precision_loss)]
fn as_value(count: u64) -> f64 {
    count as f64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn blend_instant(from: NaiveDateTime, to: NaiveDateTime, t: f64) -> NaiveDateTime {
    let span = (to - from).num_milliseconds() as f64;
    from + TimeDelta::milliseconds((span * t).round() as i64)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;

    fn snapshot(y: i32, m: u32, d: u32, totals: &[(&str, u64)]) -> CumulativeSnapshot {
        CumulativeSnapshot {
            period: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            totals: totals
                .iter()
                .map(|(name, value)| (Arc::from(*name), *value))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn ranker() -> Ranker {
        Ranker::new(
            vec![Arc::<str>::from("Speeding"), Arc::<str>::from("Distraction")],
            10,
        )
    }

    #[test]
    fn produces_expected_keyframe_count() {
        let snapshots = vec![
            snapshot(2015, 1, 31, &[("Speeding", 1)]),
            snapshot(2015, 2, 28, &[("Speeding", 2)]),
            snapshot(2015, 3, 31, &[("Speeding", 4)]),
        ];

        let keyframes = interpolate(&snapshots, &ranker(), 4).unwrap();

        assert_eq!(keyframes.len(), 9);
    }

    #[test]
    fn interpolated_values_match_linear_blend() {
        let snapshots = vec![
            snapshot(2015, 1, 31, &[("Speeding", 100)]),
            snapshot(2015, 2, 28, &[("Speeding", 200), ("Distraction", 8)]),
        ];

        let keyframes = interpolate(&snapshots, &ranker(), 4).unwrap();

        for (i, keyframe) in keyframes.iter().take(4).enumerate() {
            let t = fraction(i, 4);
            let speeding = keyframe.entry("Speeding").unwrap().value;
            let distraction = keyframe.entry("Distraction").unwrap().value;
            assert!((speeding - blend(100, 200, t)).abs() < 1e-9);
            assert!((distraction - blend(0, 8, t)).abs() < 1e-9);
        }
        assert!((keyframes[2].entry("Speeding").unwrap().value - 150.0).abs() < 1e-9);
    }

    #[test]
    fn instants_are_ordered_and_terminal_is_unblended() {
        let snapshots = vec![
            snapshot(2015, 1, 31, &[("Speeding", 1)]),
            snapshot(2015, 2, 28, &[("Speeding", 3)]),
            snapshot(2015, 3, 31, &[("Speeding", 6)]),
        ];

        let keyframes = interpolate(&snapshots, &ranker(), 3).unwrap();

        for pair in keyframes.windows(2) {
            assert!(pair[0].instant < pair[1].instant);
        }
        let last = keyframes.last().unwrap();
        assert_eq!(last.instant, snapshots[2].instant());
        assert!((last.entry("Speeding").unwrap().value - 6.0).abs() < f64::EPSILON);
        assert_eq!(keyframes[0].instant, snapshots[0].instant());
    }

    #[test]
    fn every_keyframe_is_fully_ranked() {
        let categories: Vec<Arc<str>> = (0..15).map(|i| Arc::from(format!("c{i}"))).collect();
        let ranker = Ranker::new(categories.clone(), 5);
        let totals_a: Vec<(String, u64)> = (0..15).map(|i| (format!("c{i}"), i)).collect();
        let totals_b: Vec<(String, u64)> = (0..15).map(|i| (format!("c{i}"), 30 - i)).collect();
        let to_snapshot = |m: u32, d: u32, totals: &[(String, u64)]| CumulativeSnapshot {
            period: NaiveDate::from_ymd_opt(2015, m, d).unwrap(),
            totals: totals
                .iter()
                .map(|(n, v)| (Arc::from(n.as_str()), *v))
                .collect(),
        };
        let snapshots = vec![to_snapshot(1, 31, &totals_a), to_snapshot(2, 28, &totals_b)];

        let keyframes = interpolate(&snapshots, &ranker, 4).unwrap();

        for keyframe in &keyframes {
            assert_eq!(keyframe.entries.len(), categories.len());
            assert!(keyframe.entries.iter().all(|e| e.rank <= 5));
            for pair in keyframe.entries.windows(2) {
                assert!(pair[0].value >= pair[1].value);
            }
        }
    }

    #[test]
    fn degenerate_inputs() {
        assert!(interpolate(&[], &ranker(), 4).unwrap().is_empty());

        let single = vec![snapshot(2015, 1, 31, &[("Speeding", 7)])];
        let keyframes = interpolate(&single, &ranker(), 4).unwrap();
        assert_eq!(keyframes.len(), 1);
        assert_eq!(keyframes[0].entries[0].rank, 0);

        assert!(matches!(
            interpolate(&single, &ranker(), 0),
            Err(RaceError::InvalidConfig { .. })
        ));
    }
}
