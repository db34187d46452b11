#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal renderers.
//!
//! [`race::TerminalRenderer`] implements
//! [`crash_viz_race::playback::RaceRenderer`]: it keeps an in-memory
//! [`surface::Surface`] of axis ticks, bars, labels and the date ticker and
//! redraws it on a [`console::Term`] whenever a transition settles or is
//! interrupted. [`histogram::render_histogram`] draws the speed-limit
//! histogram as text.

pub mod format;
pub mod histogram;
pub mod palette;
pub mod race;
pub mod surface;

use serde::{Deserialize, Serialize};

pub use race::TerminalRenderer;

/// Terminal layout, loadable from the `[layout]` table of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Total drawing width in columns.
    pub width: u16,
    /// Columns reserved right of the longest bar for its label.
    pub label_width: u16,
    /// Approximate number of value-axis ticks.
    pub axis_ticks: usize,
    /// Whether to emit ANSI colours.
    pub colors: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 100,
            label_width: 32,
            axis_ticks: 5,
            colors: true,
        }
    }
}

impl LayoutConfig {
    /// Columns available to the longest bar.
    #[must_use]
    pub fn bar_columns(&self) -> u16 {
        self.width.saturating_sub(self.label_width).max(1)
    }

    /// Value-axis output range, in columns.
    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        (0.0, f64::from(self.bar_columns()))
    }
}
