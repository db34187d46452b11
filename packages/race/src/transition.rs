//! Timed, interruptible transitions.

use std::sync::OnceLock;
use std::time::Duration;

use tokio::time::Instant;

/// How a transition's wait finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEnd {
    /// The full duration elapsed.
    Completed,
    /// The transition had been interrupted; it will never complete.
    Interrupted,
}

/// One linear transition from the currently rendered state to the next
/// keyframe.
///
/// Progress runs from 0 to 1 over [`Self::duration`]. Interrupting freezes
/// progress where it is; an interrupted transition never completes.
#[derive(Debug)]
pub struct Transition {
    duration: Duration,
    started_at: Instant,
    frozen: OnceLock<f64>,
}

impl Transition {
    /// Starts a transition now.
    #[must_use]
    pub fn start(duration: Duration) -> Self {
        Self {
            duration,
            started_at: Instant::now(),
            frozen: OnceLock::new(),
        }
    }

    /// A zero-length transition, already at its end.
    #[must_use]
    pub fn immediate() -> Self {
        Self::start(Duration::ZERO)
    }

    /// Total length.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Linear progress in `[0, 1]`, frozen once interrupted.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if let Some(progress) = self.frozen.get() {
            return *progress;
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.started_at.elapsed().as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Stops the transition at its current progress and returns it.
    /// Interrupting twice keeps the first value.
    pub fn interrupt(&self) -> f64 {
        let progress = self.progress();
        *self.frozen.get_or_init(|| progress)
    }

    /// Whether [`Self::interrupt`] has been called.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.frozen.get().is_some()
    }

    /// Waits until the full duration has elapsed.
    ///
    /// Returns immediately with [`TransitionEnd::Interrupted`] if the
    /// transition was already interrupted.
    pub async fn end(&self) -> TransitionEnd {
        if self.is_interrupted() {
            return TransitionEnd::Interrupted;
        }
        tokio::time::sleep_until(self.started_at + self.duration).await;
        if self.is_interrupted() {
            TransitionEnd::Interrupted
        } else {
            TransitionEnd::Completed
        }
    }
}

/// Linear interpolation between `from` and `to` at `progress`.
#[must_use]
pub fn tween(from: f64, to: f64, progress: f64) -> f64 {
    (to - from).mul_add(progress, from)
}
