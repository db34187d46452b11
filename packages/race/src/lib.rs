#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bar chart race engine.
//!
//! Turns a flat log of accident events into an animated, ranked timeline:
//!
//! 1. [`aggregate`] buckets events into cumulative per-month totals.
//! 2. [`rank::Ranker`] orders categories by value and clamps ranks at the
//!    top-N boundary.
//! 3. [`keyframes::interpolate`] blends adjacent months into evenly spaced
//!    keyframes.
//! 4. [`identity::IdentityMaps`] links each category's entries across
//!    keyframes so a renderer can animate one bar continuously.
//! 5. [`playback::Playback`] steps through the keyframes with timed,
//!    cancellable transitions.
//!
//! Steps 1-4 are pure and produce a [`Timeline`]; only playback touches a
//! renderer.

pub mod aggregate;
pub mod identity;
pub mod keyframes;
pub mod playback;
pub mod rank;
pub mod scale;
pub mod timeline;
pub mod transition;

pub use aggregate::aggregate;
pub use timeline::Timeline;

use thiserror::Error;

/// Errors that can occur while building a race timeline.
#[derive(Debug, Error)]
pub enum RaceError {
    /// A configuration value is outside its valid range.
    #[error("Invalid race configuration: {message}")]
    InvalidConfig {
        /// Description of what went wrong.
        message: String,
    },
}
