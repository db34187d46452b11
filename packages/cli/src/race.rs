//! The bar chart race and keyframe export commands.

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use console::Term;
use crash_viz_cli_utils::{IndicatifProgress, MultiProgress};
use crash_viz_ingest::load_accident_events_from_path;
use crash_viz_race::Timeline;
use crash_viz_race::playback::{Playback, invalidation, start_signal};
use crash_viz_race::scale::LinearScale;
use crash_viz_race_models::{PlaybackState, RaceConfig};
use crash_viz_render::{LayoutConfig, TerminalRenderer};

const START_PROMPT: &str = "Press Enter to start the race (Ctrl-C stops it)";

/// Loads the accident CSV and builds the race timeline.
///
/// # Errors
///
/// Returns an error if the CSV cannot be loaded or the configuration is
/// invalid.
pub fn build_timeline(
    multi: &MultiProgress,
    csv: &Path,
    config: &RaceConfig,
) -> Result<Timeline, Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::rows_bar(multi, "Loading accidents");
    let loaded = load_accident_events_from_path(csv, progress.as_ref())?;
    progress.finish_and_clear();

    if loaded.dropped > 0 {
        log::info!("Skipped {} unusable accident rows", loaded.dropped);
    }

    let timeline = Timeline::build(&loaded.events, config)?;
    log::debug!(
        "Built {} keyframes from {} monthly snapshots of {} categories",
        timeline.keyframes().len(),
        timeline.series().snapshots.len(),
        timeline.categories().len()
    );
    Ok(timeline)
}

/// Runs the race in the terminal.
///
/// The first keyframe is drawn straight away. Playback starts on Enter, or
/// immediately with `autoplay`, and Ctrl-C invalidates it at any point.
///
/// # Errors
///
/// Returns an error if the timeline cannot be built.
pub async fn run(
    multi: &MultiProgress,
    csv: &Path,
    config: &RaceConfig,
    layout: &LayoutConfig,
    autoplay: bool,
) -> Result<PlaybackState, Box<dyn std::error::Error>> {
    let timeline = Arc::new(build_timeline(multi, csv, config)?);
    if timeline.is_empty() {
        println!("No accident events between {} and {}.", config.start_date, config.cutoff_date);
        return Ok(PlaybackState::Done);
    }

    let term = Term::stdout();
    let renderer = TerminalRenderer::new(term.clone(), layout.clone(), &timeline);
    let x = LinearScale::new(layout.x_range());
    let playback = Playback::new(Arc::clone(&timeline), renderer, x);

    let (start_tx, start) = start_signal();
    let (handle, invalidation) = invalidation();

    let teardown = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::debug!("Ctrl-C received");
            handle.invalidate();
        }
    });

    if autoplay {
        start_tx.send(()).ok();
    } else {
        tokio::task::spawn_blocking(move || {
            match wait_for_enter(&term) {
                Ok(()) => {
                    start_tx.send(()).ok();
                }
                Err(e) => log::warn!("Could not read the start trigger: {e}"),
            }
        });
    }

    let report = playback.play(start, invalidation).await;
    teardown.abort();

    log::info!(
        "Race {} after {} of {} keyframes",
        report.state,
        report.frames_played,
        timeline.keyframes().len()
    );
    Ok(report.state)
}

fn wait_for_enter(term: &Term) -> std::io::Result<()> {
    term.write_str(START_PROMPT)?;
    term.read_line()?;
    term.clear_last_lines(1)
}

/// Writes the race timeline's keyframes as JSON to `output`, or to stdout.
///
/// # Errors
///
/// Returns an error if the timeline cannot be built or the JSON cannot be
/// written.
pub fn export_keyframes(
    multi: &MultiProgress,
    csv: &Path,
    config: &RaceConfig,
    output: Option<&Path>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let timeline = build_timeline(multi, csv, config)?;

    let json = if pretty {
        serde_json::to_string_pretty(timeline.keyframes())?
    } else {
        serde_json::to_string(timeline.keyframes())?
    };

    if let Some(path) = output {
        std::fs::write(path, json)?;
        log::info!(
            "Wrote {} keyframes to {}",
            timeline.keyframes().len(),
            path.display()
        );
    } else {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}")?;
    }

    Ok(())
}
