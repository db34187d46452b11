//! Step-by-step race playback.
//!
//! [`Playback`] owns a [`RaceRenderer`] and walks it through a
//! [`Timeline`]: the first keyframe is drawn as soon as the driver is
//! created, playback begins on a one-shot start signal, and every keyframe
//! then gets one full [`Transition`] before the next is applied. An
//! [`Invalidation`] signal is raced against every wait and stops playback
//! mid-transition.

use std::sync::Arc;
use std::time::Duration;

use crash_viz_race_models::{EntryId, Keyframe, PlaybackState, RankedEntry};
use tokio::sync::{oneshot, watch};

use crate::Timeline;
use crate::scale::LinearScale;
use crate::transition::{Transition, TransitionEnd};

/// Receiving half of the one-shot start trigger.
pub type StartSignal = oneshot::Receiver<()>;

/// Creates a start trigger. Sending on the returned sender starts playback.
#[must_use]
pub fn start_signal() -> (oneshot::Sender<()>, StartSignal) {
    oneshot::channel()
}

/// Creates a linked invalidation handle and signal.
#[must_use]
pub fn invalidation() -> (InvalidationHandle, Invalidation) {
    let (tx, rx) = watch::channel(false);
    (InvalidationHandle { tx: Arc::new(tx) }, Invalidation { rx })
}

/// Fires the invalidation signal, e.g. on teardown.
#[derive(Debug, Clone)]
pub struct InvalidationHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl InvalidationHandle {
    /// Marks playback as invalidated. Idempotent.
    pub fn invalidate(&self) {
        self.tx.send_replace(true);
    }
}

/// Observes the invalidation signal.
///
/// If every [`InvalidationHandle`] is dropped without firing, the signal
/// never fires.
#[derive(Debug, Clone)]
pub struct Invalidation {
    rx: watch::Receiver<bool>,
}

impl Invalidation {
    /// Whether the signal has fired.
    #[must_use]
    pub fn is_invalidated(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the signal has fired (immediately if it already has).
    pub async fn fired(&mut self) {
        if self.rx.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// What a renderer sees for one keyframe.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    index: usize,
    keyframe: &'a Keyframe,
    timeline: &'a Timeline,
    x: &'a LinearScale,
}

impl<'a> Frame<'a> {
    /// Position of the keyframe in the timeline.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The keyframe being applied.
    #[must_use]
    pub const fn keyframe(&self) -> &'a Keyframe {
        self.keyframe
    }

    /// The timeline the keyframe belongs to.
    #[must_use]
    pub const fn timeline(&self) -> &'a Timeline {
        self.timeline
    }

    /// Value scale, with its domain already set for this keyframe.
    #[must_use]
    pub const fn x(&self) -> &'a LinearScale {
        self.x
    }

    /// The leading `top_n` entries with their arena ids.
    ///
    /// Returns `None` (and logs a warning) when the keyframe has no entries;
    /// renderers skip their update in that case.
    #[must_use]
    pub fn visible(&self) -> Option<Vec<(EntryId, &'a RankedEntry)>> {
        if self.keyframe.entries.is_empty() {
            log::warn!(
                "Keyframe {} at {} has no entries; skipping update",
                self.index,
                self.keyframe.instant
            );
            return None;
        }

        let top_n = self.timeline.config().top_n;
        Some(
            self.keyframe
                .entries
                .iter()
                .take(top_n)
                .enumerate()
                .map(|(slot, entry)| (EntryId::new(self.index, slot), entry))
                .collect(),
        )
    }

    /// The entry's state one keyframe earlier, or the entry itself.
    #[must_use]
    pub fn prev_or_self(&self, id: EntryId) -> Option<&'a RankedEntry> {
        self.timeline.prev_entry(id)
    }

    /// The entry's state one keyframe later, or the entry itself.
    #[must_use]
    pub fn next_or_self(&self, id: EntryId) -> Option<&'a RankedEntry> {
        self.timeline.next_entry(id)
    }
}

/// Rendering collaborators driven by [`Playback`].
///
/// For every keyframe the four `update_*` methods are called in declaration
/// order; later ones may rely on state set by earlier ones.
pub trait RaceRenderer {
    /// Updates the value axis to the frame's scale domain.
    fn update_axis(&mut self, frame: &Frame<'_>, transition: &Transition);

    /// Moves, adds and removes bars.
    fn update_bars(&mut self, frame: &Frame<'_>, transition: &Transition);

    /// Moves, adds and removes bar labels.
    fn update_labels(&mut self, frame: &Frame<'_>, transition: &Transition);

    /// Updates the date ticker.
    fn update_ticker(&mut self, frame: &Frame<'_>, transition: &Transition);

    /// Called once the frame's transition has run to completion.
    fn transition_ended(&mut self, _frame: &Frame<'_>, _transition: &Transition) {}

    /// Called when the frame's transition is interrupted; the renderer
    /// should freeze at the transition's current progress.
    fn interrupt(&mut self, _frame: &Frame<'_>, _transition: &Transition) {}
}

/// Result of a finished playback.
#[derive(Debug)]
pub struct PlaybackReport<R> {
    /// [`PlaybackState::Done`] or [`PlaybackState::Cancelled`].
    pub state: PlaybackState,
    /// Keyframes whose transition ran to completion after start.
    pub frames_played: usize,
    /// The renderer, in whatever state playback left it.
    pub renderer: R,
}

/// Cancellable animation driver for one timeline.
#[derive(Debug)]
pub struct Playback<R> {
    timeline: Arc<Timeline>,
    renderer: R,
    x: LinearScale,
    duration: Duration,
    state: PlaybackState,
    frames_played: usize,
}

impl<R: RaceRenderer> Playback<R> {
    /// Creates the driver and immediately renders the first keyframe with a
    /// zero-length transition.
    ///
    /// With an empty timeline nothing is rendered and the driver starts out
    /// [`PlaybackState::Done`].
    pub fn new(timeline: Arc<Timeline>, renderer: R, x: LinearScale) -> Self {
        let duration = timeline.config().transition_duration();
        let mut playback = Self {
            timeline,
            renderer,
            x,
            duration,
            state: PlaybackState::Idle,
            frames_played: 0,
        };

        if playback.timeline.is_empty() {
            log::info!("Timeline is empty; nothing to play");
            playback.state = PlaybackState::Done;
            return playback;
        }

        let transition = Transition::immediate();
        apply_keyframe(
            &mut playback.renderer,
            &playback.timeline,
            &mut playback.x,
            0,
            &transition,
        );
        let frame = frame(&playback.timeline, &playback.x, 0);
        playback.renderer.transition_ended(&frame, &transition);
        playback.state = PlaybackState::AwaitingStart;
        playback
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// The renderer and the artifact it has drawn so far.
    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The timeline being played.
    #[must_use]
    pub const fn timeline(&self) -> &Arc<Timeline> {
        &self.timeline
    }

    /// Waits for `start`, then plays every keyframe.
    ///
    /// `invalidation` is raced against the start gate and against every
    /// transition; when it fires the running transition is interrupted and
    /// playback ends [`PlaybackState::Cancelled`]. A start signal whose
    /// sender is dropped without firing also cancels.
    pub async fn play(mut self, start: StartSignal, mut invalidation: Invalidation) -> PlaybackReport<R> {
        if self.state != PlaybackState::AwaitingStart {
            return self.finish();
        }

        tokio::select! {
            biased;

            () = invalidation.fired() => {
                log::info!("Playback invalidated before start");
                self.state = PlaybackState::Cancelled;
                return self.finish();
            }

            started = start => {
                if started.is_err() {
                    log::warn!("Start trigger dropped before firing; cancelling playback");
                    self.state = PlaybackState::Cancelled;
                    return self.finish();
                }
            }
        }

        self.state = PlaybackState::Playing;
        let timeline = Arc::clone(&self.timeline);
        log::debug!("Playing {} keyframes", timeline.keyframes().len());

        for index in 0..timeline.keyframes().len() {
            let transition = Transition::start(self.duration);
            apply_keyframe(&mut self.renderer, &timeline, &mut self.x, index, &transition);

            let ended = tokio::select! {
                biased;

                () = invalidation.fired() => {
                    transition.interrupt();
                    TransitionEnd::Interrupted
                }

                ended = transition.end() => ended,
            };

            let frame = frame(&timeline, &self.x, index);
            if ended == TransitionEnd::Interrupted {
                log::info!(
                    "Playback invalidated during keyframe {index} at {:.0}% progress",
                    transition.progress() * 100.0
                );
                self.renderer.interrupt(&frame, &transition);
                self.state = PlaybackState::Cancelled;
                return self.finish();
            }

            self.renderer.transition_ended(&frame, &transition);
            self.frames_played += 1;
        }

        self.state = PlaybackState::Done;
        log::info!("Playback finished after {} keyframes", self.frames_played);
        self.finish()
    }

    fn finish(self) -> PlaybackReport<R> {
        PlaybackReport {
            state: self.state,
            frames_played: self.frames_played,
            renderer: self.renderer,
        }
    }
}

fn frame<'a>(timeline: &'a Timeline, x: &'a LinearScale, index: usize) -> Frame<'a> {
    Frame {
        index,
        keyframe: &timeline.keyframes()[index],
        timeline,
        x,
    }
}

fn apply_keyframe<R: RaceRenderer>(
    renderer: &mut R,
    timeline: &Timeline,
    x: &mut LinearScale,
    index: usize,
    transition: &Transition,
) {
    let keyframe = &timeline.keyframes()[index];
    if let Some(top) = keyframe.top_value() {
        x.set_domain((0.0, top));
    }

    let frame = frame(timeline, x, index);
    renderer.update_axis(&frame, transition);
    renderer.update_bars(&frame, transition);
    renderer.update_labels(&frame, transition);
    renderer.update_ticker(&frame, transition);
}
