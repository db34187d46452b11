#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The catalog of crash visualizations.
//!
//! Each [`Visualization`] carries the text shown on its page and a
//! [`VisualizationKind`] telling the shell how to present it: run the bar
//! chart race, draw the histogram, or point at an externally hosted page.

use std::str::FromStr as _;

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Base URL of the public Tableau server hosting the dashboards.
pub const TABLEAU_HOST: &str = "https://public.tableau.com";

/// Errors from catalog lookups.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No visualization has the requested id.
    #[error("Unknown visualization '{id}' (valid: {valid})")]
    UnknownId {
        /// The requested id.
        id: String,
        /// Comma-separated valid ids.
        valid: String,
    },
}

/// Stable identifier of a visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum VisualizationId {
    /// Bar chart race of crash circumstances.
    AccidentCircumstances,
    /// Speed-limit histogram.
    TrafficVolume,
    /// Animated crash location map.
    AccidentMap,
    /// Tableau dashboard on when crashes happen.
    WhenDashboard,
    /// Tableau dashboard on crash severity.
    HowDashboard,
}

impl VisualizationId {
    /// Every id, in menu order.
    pub const ALL: &[Self] = &[
        Self::AccidentCircumstances,
        Self::TrafficVolume,
        Self::AccidentMap,
        Self::WhenDashboard,
        Self::HowDashboard,
    ];
}

/// How a visualization is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualizationKind {
    /// The animated bar chart race.
    Race,
    /// The speed-limit histogram with total and compare modes.
    Histogram,
    /// A standalone page shipped alongside the data.
    EmbeddedPage {
        /// Path of the page relative to the site root.
        path: &'static str,
    },
    /// A dashboard published on Tableau Public.
    Tableau {
        /// Workbook name.
        workbook: &'static str,
        /// Sheet or dashboard name within the workbook.
        view: &'static str,
    },
}

impl VisualizationKind {
    /// Where the visualization lives outside this tool, if anywhere.
    #[must_use]
    pub fn url(&self) -> Option<String> {
        match self {
            Self::Race | Self::Histogram => None,
            Self::EmbeddedPage { path } => Some((*path).to_string()),
            Self::Tableau { workbook, view } => {
                Some(format!("{TABLEAU_HOST}/views/{workbook}/{view}"))
            }
        }
    }

    /// Static preview image, for Tableau dashboards.
    #[must_use]
    pub fn preview_image(&self) -> Option<String> {
        match self {
            Self::Tableau { workbook, view } => {
                let prefix: String = workbook.chars().take(2).collect();
                Some(format!(
                    "{TABLEAU_HOST}/static/images/{prefix}/{workbook}/{view}/1.png"
                ))
            }
            _ => None,
        }
    }

    /// Whether the visualization is drawn by this tool.
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::Race | Self::Histogram)
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Visualization {
    /// Stable id used on the command line.
    pub id: VisualizationId,
    /// Page title.
    pub title: &'static str,
    /// One-line teaser.
    pub description: &'static str,
    /// "About this visualization" paragraphs.
    pub details: &'static [&'static str],
    /// How it is presented.
    pub kind: VisualizationKind,
}

static CATALOG: [Visualization; 5] = [
    Visualization {
        id: VisualizationId::AccidentCircumstances,
        title: "What's Wrecking Our Roads? (2015-2024)",
        description: "The Great Circumstance Showdown: what is causing the most chaos on the roads?",
        details: &[
            "This bar chart race shows the cumulative number of traffic accidents by their \
             attributed circumstances from 2015 to 2024. The animation reveals which factors \
             have consistently been the most dangerous on our roads and how their relative \
             impact has changed over time.",
        ],
        kind: VisualizationKind::Race,
    },
    Visualization {
        id: VisualizationId::TrafficVolume,
        title: "Fast, Furious... and Frequently Crashed (2015-2024)",
        description: "From slow zones to high-speed stretches, the chart shows which speed limits \
                      see the most action, and potentially the most trouble.",
        details: &[
            "This histogram highlights the most common speed limits associated with road \
             incidents from 2015 to 2024.",
            "Use compare mode to explore how the frequency of incidents at different speed \
             limits has changed between any two years, and spot shifts or patterns in crash \
             distribution over time.",
        ],
        kind: VisualizationKind::Histogram,
    },
    Visualization {
        id: VisualizationId::AccidentMap,
        title: "Where It Hits Hardest (2015-2024)",
        description: "See the crash patterns unfold across Montgomery County, hour by hour and \
                      dot by dot.",
        details: &[
            "This animated heatmap shows the hourly geographic distribution of traffic \
             accidents across Montgomery County from 2015 to 2024. Each dot represents a crash \
             location, pulsing according to the time of day it occurred.",
        ],
        kind: VisualizationKind::EmbeddedPage { path: "map.html" },
    },
    Visualization {
        id: VisualizationId::WhenDashboard,
        title: "When are Traffic Accidents Most Frequent? Trends & High-Risk Periods",
        description: "Who knew rush hour could be so... crashy? This dashboard dives into when \
                      traffic accidents strike hardest, whether it's sleepy mornings, chaotic \
                      evenings, or even those deceptively peaceful holidays. Spoiler: no day is \
                      truly safe.",
        details: &[
            "This dashboard shows the yearly trend of traffic accidents, highlights high-risk \
             time periods across weekdays and weekends, and compares average accident rates on \
             holidays versus regular days.",
            "To explore a specific year in greater detail, click on a year along the x-axis of \
             the \"Yearly Trend of Traffic Accidents\" chart. This will filter the entire \
             dashboard accordingly.",
        ],
        kind: VisualizationKind::Tableau {
            workbook: "whenaccidents",
            view: "WHENDashboard",
        },
    },
    Visualization {
        id: VisualizationId::HowDashboard,
        title: "How Severe are Traffic Accidents? Exploring Injury Patterns and Causes",
        description: "From slippery roads to suspiciously sober drivers, this dashboard spills \
                      the tea on what really makes traffic accidents worse.",
        details: &[
            "This dashboard explores how various environmental conditions, substance abuse \
             factors, and safety measures impact the severity of traffic accidents.",
            "Filters are available to narrow down the data by year, month, and injury severity \
             for a more focused analysis.",
        ],
        kind: VisualizationKind::Tableau {
            workbook: "HowSeverearrTrafficAccidents",
            view: "joviDashboard",
        },
    },
];

/// Every visualization, in menu order.
#[must_use]
pub fn all() -> &'static [Visualization] {
    &CATALOG
}

/// The visualization with `id`.
#[must_use]
pub fn get(id: VisualizationId) -> &'static Visualization {
    CATALOG
        .iter()
        .find(|v| v.id == id)
        .unwrap_or(&CATALOG[0])
}

/// Looks up a visualization by its command-line id.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownId`] listing the valid ids if none
/// matches.
pub fn find(id: &str) -> Result<&'static Visualization, CatalogError> {
    crate::VisualizationId::from_str(id.trim())
        .map(get)
        .map_err(|_| CatalogError::UnknownId {
            id: id.to_string(),
            valid: VisualizationId::ALL
                .iter()
                .map(AsRef::<str>::as_ref)
                .collect::<Vec<&str>>()
                .join(", "),
        })
}
