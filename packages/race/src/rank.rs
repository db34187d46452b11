//! Ranking of categories at a single instant.

use std::sync::Arc;

use crash_viz_race_models::RankedEntry;

/// Orders a fixed category set by value and assigns clamped ranks.
///
/// Cloning a `Ranker` is cheap; category names are shared.
#[derive(Debug, Clone)]
pub struct Ranker {
    categories: Arc<[Arc<str>]>,
    top_n: usize,
}

impl Ranker {
    /// Creates a ranker over `categories`, whose iteration order breaks ties.
    #[must_use]
    pub fn new(categories: impl Into<Arc<[Arc<str>]>>, top_n: usize) -> Self {
        Self {
            categories: categories.into(),
            top_n,
        }
    }

    /// The category set, in tie-breaking order.
    #[must_use]
    pub fn categories(&self) -> &[Arc<str>] {
        &self.categories
    }

    /// Rank boundary; every position at or past it reports this rank.
    #[must_use]
    pub const fn top_n(&self) -> usize {
        self.top_n
    }

    /// Produces one entry per category, sorted by `value` descending.
    ///
    /// The sort is stable, so equal values keep category-set order. Ranks
    /// are `min(top_n, position)`, which keeps them inside `[0, top_n]`
    /// no matter how many categories there are.
    pub fn rank(&self, mut value: impl FnMut(&str) -> f64) -> Vec<RankedEntry> {
        let mut entries: Vec<RankedEntry> = self
            .categories
            .iter()
            .map(|category| RankedEntry {
                category: Arc::clone(category),
                value: value(category),
                rank: 0,
            })
            .collect();

        entries.sort_by(|a, b| b.value.total_cmp(&a.value));

        for (position, entry) in entries.iter_mut().enumerate() {
            entry.rank = position.min(self.top_n);
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<Arc<str>> {
        list.iter().map(|n| Arc::from(*n)).collect()
    }

    #[test]
    fn sorts_descending_with_sequential_ranks() {
        let ranker = Ranker::new(names(&["a", "b", "c"]), 10);

        let ranked = ranker.rank(|name| match name {
            "a" => 1.0,
            "b" => 3.0,
            _ => 2.0,
        });

        let order: Vec<(&str, usize)> = ranked.iter().map(|e| (&*e.category, e.rank)).collect();
        assert_eq!(order, vec![("b", 0), ("c", 1), ("a", 2)]);
    }

    #[test]
    fn ties_keep_category_order() {
        let ranker = Ranker::new(names(&["first", "second", "third"]), 10);

        let ranked = ranker.rank(|_| 5.0);

        let order: Vec<&str> = ranked.iter().map(|e| &*e.category).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn overflow_positions_share_boundary_rank() {
        let categories: Vec<Arc<str>> = (0..50).map(|i| Arc::from(format!("c{i}"))).collect();
        let ranker = Ranker::new(categories, 10);

        let ranked = ranker.rank(|name| name[1..].parse::<f64>().unwrap());

        for (position, entry) in ranked.iter().enumerate() {
            assert_eq!(entry.rank, position.min(10));
            assert!(entry.rank <= 10);
        }
        assert_eq!(ranked.iter().filter(|e| e.rank == 10).count(), 40);
        assert_eq!(&*ranked[0].category, "c49");
    }
}
