//! Cross-keyframe identity of category entries.
//!
//! A renderer animating a bar needs to know where that same category was in
//! the previous keyframe (for entering bars) and where it goes in the next
//! one (for exiting bars). Entries are addressed by [`EntryId`] and linked
//! to their temporal neighbours within the same category.

use std::collections::HashMap;

use crash_viz_race_models::{EntryId, Keyframe};

/// Predecessor and successor links between entries of the same category.
#[derive(Debug, Clone, Default)]
pub struct IdentityMaps {
    prev: HashMap<EntryId, EntryId>,
    next: HashMap<EntryId, EntryId>,
}

impl IdentityMaps {
    /// Groups every entry of `keyframes` by category, in keyframe order, and
    /// links each entry to its neighbours within its group.
    #[must_use]
    pub fn build(keyframes: &[Keyframe]) -> Self {
        let mut groups: HashMap<&str, Vec<EntryId>> = HashMap::new();

        for (frame, keyframe) in keyframes.iter().enumerate() {
            for (slot, entry) in keyframe.entries.iter().enumerate() {
                groups
                    .entry(&*entry.category)
                    .or_default()
                    .push(EntryId::new(frame, slot));
            }
        }

        let mut maps = Self::default();
        for ids in groups.values() {
            for pair in ids.windows(2) {
                maps.next.insert(pair[0], pair[1]);
                maps.prev.insert(pair[1], pair[0]);
            }
        }
        maps
    }

    /// The same category's entry in the preceding keyframe, if any.
    #[must_use]
    pub fn prev(&self, id: EntryId) -> Option<EntryId> {
        self.prev.get(&id).copied()
    }

    /// The same category's entry in the following keyframe, if any.
    #[must_use]
    pub fn next(&self, id: EntryId) -> Option<EntryId> {
        self.next.get(&id).copied()
    }

    /// [`Self::prev`], falling back to `id` itself at the start of a chain.
    #[must_use]
    pub fn prev_or_self(&self, id: EntryId) -> EntryId {
        self.prev(id).unwrap_or(id)
    }

    /// [`Self::next`], falling back to `id` itself at the end of a chain.
    #[must_use]
    pub fn next_or_self(&self, id: EntryId) -> EntryId {
        self.next(id).unwrap_or(id)
    }

    /// Number of links (equal for both directions).
    #[must_use]
    pub fn len(&self) -> usize {
        self.next.len()
    }

    /// Whether no entry has a neighbour.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use crash_viz_race_models::RankedEntry;

    use super::*;

    fn keyframe(day: u32, entries: &[(&str, f64)]) -> Keyframe {
        Keyframe {
            instant: NaiveDate::from_ymd_opt(2015, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            entries: entries
                .iter()
                .enumerate()
                .map(|(rank, (name, value))| RankedEntry {
                    category: Arc::from(*name),
                    value: *value,
                    rank,
                })
                .collect(),
        }
    }

    fn frames() -> Vec<Keyframe> {
        vec![
            keyframe(1, &[("a", 3.0), ("b", 2.0), ("c", 1.0)]),
            keyframe(2, &[("b", 4.0), ("a", 3.0), ("c", 1.0)]),
            keyframe(3, &[("c", 9.0), ("b", 4.0), ("a", 3.0)]),
        ]
    }

    #[test]
    fn follows_category_across_reordering() {
        let keyframes = frames();
        let maps = IdentityMaps::build(&keyframes);

        // "a" sits in slot 0, then 1, then 2.
        assert_eq!(maps.next(EntryId::new(0, 0)), Some(EntryId::new(1, 1)));
        assert_eq!(maps.next(EntryId::new(1, 1)), Some(EntryId::new(2, 2)));
        assert_eq!(maps.prev(EntryId::new(2, 0)), Some(EntryId::new(1, 2)));
    }

    #[test]
    fn next_chain_visits_every_occurrence_once() {
        let keyframes = frames();
        let maps = IdentityMaps::build(&keyframes);

        for (slot, entry) in keyframes[0].entries.iter().enumerate() {
            let mut id = EntryId::new(0, slot);
            let mut visited = vec![id];
            while let Some(next) = maps.next(id) {
                assert_eq!(keyframes[next.frame].entries[next.slot].category, entry.category);
                visited.push(next);
                id = next;
            }
            assert_eq!(visited.len(), keyframes.len());
            assert_eq!(id.frame, keyframes.len() - 1);
            assert!(maps.next(id).is_none());
        }
    }

    #[test]
    fn boundaries_fall_back_to_self() {
        let maps = IdentityMaps::build(&frames());

        let first = EntryId::new(0, 2);
        let last = EntryId::new(2, 0);
        assert!(maps.prev(first).is_none());
        assert_eq!(maps.prev_or_self(first), first);
        assert_eq!(maps.next_or_self(last), last);
        assert_eq!(maps.len(), 6);
    }

    #[test]
    fn single_keyframe_has_no_links() {
        let maps = IdentityMaps::build(&frames()[..1]);
        assert!(maps.is_empty());
    }
}
