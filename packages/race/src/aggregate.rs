//! Monthly cumulative aggregation of accident events.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{Datelike as _, Months, NaiveDate};
use crash_viz_race_models::{AccidentEvent, CumulativeSnapshot, SnapshotSeries};

/// Buckets `events` into one cumulative snapshot per calendar month.
///
/// Months run from the month containing `start` through the month
/// containing `min(latest event date, cutoff)`, inclusive and without gaps.
/// Each snapshot is stamped with its month's last day. Events outside that
/// range never contribute to any total, but their categories still belong
/// to the category set (with a zero total).
///
/// Returns an empty series when there are no events or `start > cutoff`.
#[must_use]
pub fn aggregate(events: &[AccidentEvent], start: NaiveDate, cutoff: NaiveDate) -> SnapshotSeries {
    if events.is_empty() || start > cutoff {
        log::debug!(
            "Nothing to aggregate ({} events, start {start}, cutoff {cutoff})",
            events.len()
        );
        return SnapshotSeries::default();
    }

    let mut categories: Vec<Arc<str>> = Vec::new();
    let mut known: HashMap<&str, Arc<str>> = HashMap::new();
    let mut monthly: HashMap<(i32, u32), HashMap<Arc<str>, u64>> = HashMap::new();
    let mut latest = NaiveDate::MIN;

    for event in events {
        let name = known
            .entry(event.category.as_str())
            .or_insert_with(|| {
                let name: Arc<str> = Arc::from(event.category.as_str());
                categories.push(Arc::clone(&name));
                name
            })
            .clone();

        let date = event.occurred_at.date();
        latest = latest.max(date);
        *monthly
            .entry((date.year(), date.month()))
            .or_default()
            .entry(name)
            .or_insert(0) += 1;
    }

    let end = latest.min(cutoff);
    let mut cumulative: BTreeMap<Arc<str>, u64> =
        categories.iter().map(|c| (Arc::clone(c), 0)).collect();
    let mut snapshots = Vec::new();
    let mut month = first_of_month(start);

    while month <= end {
        if let Some(counts) = monthly.get(&(month.year(), month.month())) {
            for (name, count) in counts {
                if let Some(total) = cumulative.get_mut(name) {
                    *total += count;
                }
            }
        }

        let Some(next) = month.checked_add_months(Months::new(1)) else {
            break;
        };
        snapshots.push(CumulativeSnapshot {
            period: next.pred_opt().unwrap_or(month),
            totals: cumulative.clone(),
        });
        month = next;
    }

    log::debug!(
        "Aggregated {} events into {} monthly snapshots across {} categories",
        events.len(),
        snapshots.len(),
        categories.len()
    );

    SnapshotSeries {
        categories,
        snapshots,
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
