//! The in-memory drawing surface behind [`crate::TerminalRenderer`].
//!
//! Bars and labels are kept as sprites keyed by category. Each sprite
//! knows where it was drawn last (`from`) and where the running transition
//! takes it (`to`); drawing at a progress value tweens between the two.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crash_viz_race::playback::Frame;
use crash_viz_race::transition::tween;
use crash_viz_race_models::{EntryId, RankedEntry};

/// Position of a sprite: band (rank), value and horizontal extent in
/// columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Rank band.
    pub rank: f64,
    /// Displayed value.
    pub value: f64,
    /// Bar width or label column.
    pub extent: f64,
}

impl Placement {
    #[allow(clippy::cast_precision_loss)]
    fn of(entry: &RankedEntry, extent: &impl Fn(f64) -> f64) -> Self {
        Self {
            rank: entry.rank as f64,
            value: entry.value,
            extent: extent(entry.value),
        }
    }

    fn tween(self, to: Self, progress: f64) -> Self {
        Self {
            rank: tween(self.rank, to.rank, progress),
            value: tween(self.value, to.value, progress),
            extent: tween(self.extent, to.extent, progress),
        }
    }
}

/// One animated bar or label.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Entry this sprite was last bound to.
    pub id: EntryId,
    /// Category shown.
    pub category: Arc<str>,
    /// Placement when the running transition started.
    pub from: Placement,
    /// Placement when the running transition ends.
    pub to: Placement,
    /// Whether the sprite is leaving and will be removed once settled.
    pub exiting: bool,
}

impl Sprite {
    /// Placement at `progress` through the running transition.
    #[must_use]
    pub fn at(&self, progress: f64) -> Placement {
        self.from.tween(self.to, progress)
    }
}

/// A keyed set of sprites with enter, update and exit handling.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    sprites: BTreeMap<Arc<str>, Sprite>,
}

impl Layer {
    /// Binds the frame's visible entries.
    ///
    /// Updated sprites move from their settled placement. Entering sprites
    /// start where their category was one keyframe earlier; sprites whose
    /// category dropped out move to where it is one keyframe later and are
    /// marked exiting.
    pub fn bind(
        &mut self,
        frame: &Frame<'_>,
        visible: &[(EntryId, &RankedEntry)],
        extent: &impl Fn(f64) -> f64,
    ) {
        let mut bound: HashSet<&str> = HashSet::with_capacity(visible.len());

        for (id, entry) in visible {
            let to = Placement::of(entry, extent);
            bound.insert(&*entry.category);

            if let Some(sprite) = self.sprites.get_mut(&entry.category) {
                sprite.from = sprite.to;
                sprite.to = to;
                sprite.id = *id;
                sprite.exiting = false;
            } else {
                let prev = frame.prev_or_self(*id).unwrap_or(*entry);
                self.sprites.insert(
                    Arc::clone(&entry.category),
                    Sprite {
                        id: *id,
                        category: Arc::clone(&entry.category),
                        from: Placement::of(prev, extent),
                        to,
                        exiting: false,
                    },
                );
            }
        }

        for sprite in self.sprites.values_mut() {
            if bound.contains(&*sprite.category) {
                continue;
            }
            sprite.from = sprite.to;
            if let Some(next) = frame.next_or_self(sprite.id) {
                sprite.to = Placement::of(next, extent);
            }
            sprite.exiting = true;
        }
    }

    /// Ends the running transition: exiting sprites are removed and the
    /// rest rest at their target.
    pub fn settle(&mut self) {
        self.sprites.retain(|_, sprite| !sprite.exiting);
        for sprite in self.sprites.values_mut() {
            sprite.from = sprite.to;
        }
    }

    /// The sprite for `category`.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&Sprite> {
        self.sprites.get(category)
    }

    /// Number of sprites, exiting ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Whether the layer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// The sprite drawn in `row` at `progress`: the one whose tweened rank
    /// rounds to `row`, preferring the larger value.
    #[must_use]
    pub fn in_row(&self, row: usize, progress: f64) -> Option<(&Sprite, Placement)> {
        self.sprites
            .values()
            .map(|sprite| (sprite, sprite.at(progress)))
            .filter(|(_, placement)| row_of(placement.rank) == Some(row))
            .max_by(|a, b| a.1.value.total_cmp(&b.1.value))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn row_of(rank: f64) -> Option<usize> {
    let rounded = rank.round();
    (rounded.is_finite() && rounded >= 0.0).then_some(rounded as usize)
}

/// One value-axis tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Tick value.
    pub value: f64,
    /// Column of the tick.
    pub column: f64,
}

/// Everything the terminal renderer draws.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    /// Value-axis ticks for the current frame.
    pub axis: Vec<AxisTick>,
    /// Bars, keyed by category.
    pub bars: Layer,
    /// Name and value labels, keyed by category.
    pub labels: Layer,
    /// Year shown by the ticker.
    pub ticker: String,
    /// Ticker text waiting for the running transition to end.
    pub pending_ticker: Option<String>,
}

impl Surface {
    /// Ends the running transition on every layer.
    pub fn settle(&mut self) {
        self.bars.settle();
        self.labels.settle();
        if let Some(ticker) = self.pending_ticker.take() {
            self.ticker = ticker;
        }
    }
}
