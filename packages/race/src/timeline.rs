//! The immutable race timeline.

use std::sync::Arc;

use crash_viz_race_models::{
    AccidentEvent, EntryId, Keyframe, RaceConfig, RankedEntry, SnapshotSeries,
};

use crate::RaceError;
use crate::aggregate::aggregate;
use crate::identity::IdentityMaps;
use crate::keyframes::interpolate;
use crate::rank::Ranker;

/// Everything derived from one event log under one [`RaceConfig`]:
/// monthly snapshots, keyframes and identity links.
///
/// Built once; a different configuration means building a new timeline.
#[derive(Debug, Clone)]
pub struct Timeline {
    config: RaceConfig,
    series: SnapshotSeries,
    keyframes: Vec<Keyframe>,
    identity: IdentityMaps,
}

impl Timeline {
    /// Aggregates `events` and builds the full timeline.
    ///
    /// # Errors
    ///
    /// Returns [`RaceError::InvalidConfig`] if `top_n` or `sub_steps` is zero.
    pub fn build(events: &[AccidentEvent], config: &RaceConfig) -> Result<Self, RaceError> {
        validate(config)?;
        let series = aggregate(events, config.start_date, config.cutoff_date);
        Self::from_series(series, config)
    }

    /// Builds the timeline from already aggregated snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`RaceError::InvalidConfig`] if `top_n` or `sub_steps` is zero.
    pub fn from_series(series: SnapshotSeries, config: &RaceConfig) -> Result<Self, RaceError> {
        validate(config)?;

        let ranker = Ranker::new(series.categories.clone(), config.top_n);
        let keyframes = interpolate(&series.snapshots, &ranker, config.sub_steps)?;
        let identity = IdentityMaps::build(&keyframes);

        log::info!(
            "Built race timeline: {} months, {} categories, {} keyframes",
            series.snapshots.len(),
            series.categories.len(),
            keyframes.len()
        );

        Ok(Self {
            config: config.clone(),
            series,
            keyframes,
            identity,
        })
    }

    /// Configuration the timeline was built with.
    #[must_use]
    pub const fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Categories in tie-breaking order.
    #[must_use]
    pub fn categories(&self) -> &[Arc<str>] {
        &self.series.categories
    }

    /// Monthly snapshots the keyframes were interpolated from.
    #[must_use]
    pub fn series(&self) -> &SnapshotSeries {
        &self.series
    }

    /// Keyframes in playback order.
    #[must_use]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Identity links between keyframes.
    #[must_use]
    pub const fn identity(&self) -> &IdentityMaps {
        &self.identity
    }

    /// Whether there is nothing to play.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Resolves an arena id to its entry.
    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&RankedEntry> {
        self.keyframes.get(id.frame)?.entries.get(id.slot)
    }

    /// Where the entry's category was one keyframe earlier, or the entry
    /// itself when it has no predecessor.
    #[must_use]
    pub fn prev_entry(&self, id: EntryId) -> Option<&RankedEntry> {
        self.entry(self.identity.prev_or_self(id))
    }

    /// Where the entry's category is one keyframe later, or the entry
    /// itself when it has no successor.
    #[must_use]
    pub fn next_entry(&self, id: EntryId) -> Option<&RankedEntry> {
        self.entry(self.identity.next_or_self(id))
    }
}

fn validate(config: &RaceConfig) -> Result<(), RaceError> {
    if config.top_n == 0 {
        return Err(RaceError::InvalidConfig {
            message: "top_n must be at least 1".to_string(),
        });
    }
    if config.sub_steps == 0 {
        return Err(RaceError::InvalidConfig {
            message: "sub_steps must be at least 1".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scenario_events() -> Vec<AccidentEvent> {
        vec![
            AccidentEvent::on_date("Speeding", date(2015, 1, 15)),
            AccidentEvent::on_date("Speeding", date(2015, 2, 15)),
            AccidentEvent::on_date("Distraction", date(2015, 2, 20)),
        ]
    }

    #[test]
    fn end_to_end_two_month_race() {
        let config = RaceConfig {
            top_n: 10,
            sub_steps: 1,
            start_date: date(2015, 1, 31),
            cutoff_date: date(2015, 2, 28),
            ..RaceConfig::default()
        };

        let timeline = Timeline::build(&scenario_events(), &config).unwrap();

        assert_eq!(timeline.series().snapshots.len(), 2);
        assert_eq!(timeline.keyframes().len(), 2);

        let terminal = timeline.keyframes().last().unwrap();
        assert_eq!(&*terminal.entries[0].category, "Speeding");
        assert!((terminal.entries[0].value - 2.0).abs() < f64::EPSILON);
        assert_eq!(terminal.entries[0].rank, 0);
        assert_eq!(&*terminal.entries[1].category, "Distraction");
        assert!((terminal.entries[1].value - 1.0).abs() < f64::EPSILON);
        assert_eq!(terminal.entries[1].rank, 1);
    }

    #[test]
    fn prev_and_next_entries_resolve_through_identity() {
        let config = RaceConfig {
            sub_steps: 2,
            start_date: date(2015, 1, 31),
            cutoff_date: date(2015, 2, 28),
            ..RaceConfig::default()
        };
        let timeline = Timeline::build(&scenario_events(), &config).unwrap();

        // Distraction enters at zero and trails Speeding throughout.
        let last = timeline.keyframes().len() - 1;
        let id = EntryId::new(last, 1);
        assert_eq!(&*timeline.entry(id).unwrap().category, "Distraction");
        let prev = timeline.prev_entry(id).unwrap();
        assert_eq!(&*prev.category, "Distraction");
        assert!(prev.value < 1.0);
        assert_eq!(timeline.next_entry(id).unwrap(), timeline.entry(id).unwrap());
    }

    #[test]
    fn rejects_zero_sized_configuration() {
        let zero_top = RaceConfig {
            top_n: 0,
            ..RaceConfig::default()
        };
        assert!(Timeline::build(&scenario_events(), &zero_top).is_err());

        let zero_steps = RaceConfig {
            sub_steps: 0,
            ..RaceConfig::default()
        };
        assert!(Timeline::build(&scenario_events(), &zero_steps).is_err());
    }

    #[test]
    fn empty_log_builds_empty_timeline() {
        let timeline = Timeline::build(&[], &RaceConfig::default()).unwrap();
        assert!(timeline.is_empty());
        assert!(timeline.identity().is_empty());
    }
}
