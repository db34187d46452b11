//! Terminal bar chart race renderer.

use chrono::Datelike as _;
use console::{Style, Term};
use crash_viz_race::Timeline;
use crash_viz_race::playback::{Frame, RaceRenderer};
use crash_viz_race::transition::Transition;

use crate::LayoutConfig;
use crate::format::{bar_glyphs, format_count};
use crate::palette::{Palette, paint};
use crate::surface::{AxisTick, Surface};

/// Draws a race on a terminal.
///
/// Callbacks update the [`Surface`]; the surface is drawn when a transition
/// settles and, frozen at its progress, when one is interrupted. Without a
/// terminal (see [`Self::headless`]) frames are only kept in memory.
#[derive(Debug)]
pub struct TerminalRenderer {
    term: Option<Term>,
    layout: LayoutConfig,
    palette: Palette,
    top_n: usize,
    surface: Surface,
    drawn_lines: usize,
    last_frame: Vec<String>,
}

impl TerminalRenderer {
    /// Creates a renderer drawing `timeline` on `term`.
    #[must_use]
    pub fn new(term: Term, layout: LayoutConfig, timeline: &Timeline) -> Self {
        Self {
            term: Some(term),
            ..Self::headless(layout, timeline)
        }
    }

    /// Creates a renderer that keeps frames in memory only.
    #[must_use]
    pub fn headless(layout: LayoutConfig, timeline: &Timeline) -> Self {
        Self {
            term: None,
            layout,
            palette: Palette::new(timeline.categories()),
            top_n: timeline.config().top_n,
            surface: Surface::default(),
            drawn_lines: 0,
            last_frame: Vec::new(),
        }
    }

    /// Current surface.
    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Lines of the most recently drawn frame.
    #[must_use]
    pub fn last_frame(&self) -> &[String] {
        &self.last_frame
    }

    /// The surface as text at `progress` through the running transition:
    /// two axis lines, one line per rank band and the ticker.
    #[must_use]
    pub fn lines(&self, progress: f64) -> Vec<String> {
        let mut lines = self.axis_lines();
        lines.extend((0..self.top_n).map(|row| self.row_line(row, progress)));
        lines.push(self.ticker_line());
        lines
    }

    /// Draws the surface at `progress`, replacing the previous frame.
    pub fn present(&mut self, progress: f64) {
        let lines = self.lines(progress);
        if let Some(term) = &self.term
            && let Err(e) = redraw(term, self.drawn_lines, &lines)
        {
            log::warn!("Failed to draw race frame: {e}");
        }
        self.drawn_lines = lines.len();
        self.last_frame = lines;
    }

    fn axis_lines(&self) -> Vec<String> {
        let width = usize::from(self.layout.width);
        let mut labels = vec![' '; width];
        let mut rule = vec!['─'; usize::from(self.layout.bar_columns()) + 1];

        for (i, tick) in self.surface.axis.iter().enumerate() {
            let column = column_of(tick.column).min(rule.len() - 1);
            rule[column] = '┬';

            // The zero tick is left unlabelled.
            if i == 0 {
                continue;
            }
            let text: Vec<char> = format_count(tick.value).chars().collect();
            let start = column.saturating_sub(text.len() / 2);
            for (offset, ch) in text.into_iter().enumerate() {
                if let Some(slot) = labels.get_mut(start + offset) {
                    *slot = ch;
                }
            }
        }

        let dim = Style::new().dim();
        vec![
            paint(labels.into_iter().collect::<String>().trim_end(), &dim, self.layout.colors),
            paint(&rule.into_iter().collect::<String>(), &dim, self.layout.colors),
        ]
    }

    fn row_line(&self, row: usize, progress: f64) -> String {
        let colors = self.layout.colors;
        let mut line = String::new();
        let mut used = 0;

        if let Some((sprite, placement)) = self.surface.bars.in_row(row, progress) {
            let glyphs = bar_glyphs(placement.extent);
            used = glyphs.chars().count();
            line.push_str(&paint(&glyphs, &self.palette.style(&sprite.category), colors));
        }

        if let Some((sprite, placement)) = self.surface.labels.in_row(row, progress) {
            let column = column_of(placement.extent).max(used);
            line.push_str(&" ".repeat(column - used + 1));
            line.push_str(&paint(&sprite.category, &Style::new().bold(), colors));
            line.push(' ');
            line.push_str(&paint(
                &format_count(placement.value),
                &Style::new().dim(),
                colors,
            ));
        }

        line
    }

    fn ticker_line(&self) -> String {
        let padded = format!(
            "{:>width$}",
            self.surface.ticker,
            width = usize::from(self.layout.width)
        );
        paint(&padded, &Style::new().bold(), self.layout.colors)
    }
}

impl RaceRenderer for TerminalRenderer {
    fn update_axis(&mut self, frame: &Frame<'_>, _transition: &Transition) {
        let x = frame.x();
        self.surface.axis = x
            .ticks(self.layout.axis_ticks)
            .into_iter()
            .map(|value| AxisTick {
                value,
                column: x.apply(value),
            })
            .collect();
    }

    fn update_bars(&mut self, frame: &Frame<'_>, _transition: &Transition) {
        let Some(visible) = frame.visible() else {
            return;
        };
        let x = frame.x();
        let zero = x.apply(0.0);
        self.surface
            .bars
            .bind(frame, &visible, &|value| x.apply(value) - zero);
    }

    fn update_labels(&mut self, frame: &Frame<'_>, _transition: &Transition) {
        let Some(visible) = frame.visible() else {
            return;
        };
        let x = frame.x();
        self.surface
            .labels
            .bind(frame, &visible, &|value| x.apply(value));
    }

    fn update_ticker(&mut self, frame: &Frame<'_>, _transition: &Transition) {
        self.surface.pending_ticker = Some(frame.keyframe().instant.year().to_string());
    }

    fn transition_ended(&mut self, _frame: &Frame<'_>, _transition: &Transition) {
        self.surface.settle();
        self.present(1.0);
    }

    fn interrupt(&mut self, frame: &Frame<'_>, transition: &Transition) {
        log::debug!(
            "Freezing keyframe {} at {:.2}",
            frame.index(),
            transition.progress()
        );
        self.present(transition.progress());
    }
}

fn redraw(term: &Term, previous: usize, lines: &[String]) -> std::io::Result<()> {
    if previous > 0 {
        term.clear_last_lines(previous)?;
    }
    for line in lines {
        term.write_line(line)?;
    }
    term.flush()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn column_of(extent: f64) -> usize {
    if extent.is_finite() && extent > 0.0 {
        extent.round() as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDate;
    use crash_viz_race::playback::{Playback, invalidation, start_signal};
    use crash_viz_race::scale::LinearScale;
    use crash_viz_race_models::{AccidentEvent, PlaybackState, RaceConfig};

    use super::*;

    fn layout() -> LayoutConfig {
        LayoutConfig {
            width: 40,
            label_width: 16,
            axis_ticks: 3,
            colors: false,
        }
    }

    fn events(category: &str, count: usize, month: u32) -> Vec<AccidentEvent> {
        let day = NaiveDate::from_ymd_opt(2015, month, 10).unwrap();
        (0..count)
            .map(|_| AccidentEvent::on_date(category, day))
            .collect()
    }

    /// A and B lead in January; C overtakes both in February and pushes B
    /// out of the top two.
    fn timeline() -> Arc<Timeline> {
        let mut log = events("A", 3, 1);
        log.extend(events("B", 2, 1));
        log.extend(events("C", 1, 1));
        log.extend(events("C", 5, 2));
        let config = RaceConfig {
            top_n: 2,
            sub_steps: 1,
            ..RaceConfig::default()
        };
        Arc::new(Timeline::build(&log, &config).unwrap())
    }

    fn playback(timeline: &Arc<Timeline>) -> Playback<TerminalRenderer> {
        let layout = layout();
        let x = LinearScale::new(layout.x_range());
        let renderer = TerminalRenderer::headless(layout, timeline);
        Playback::new(Arc::clone(timeline), renderer, x)
    }

    #[tokio::test(start_paused = true)]
    async fn first_keyframe_is_drawn_before_start() {
        let timeline = timeline();
        let playback = playback(&timeline);
        let frame = playback.renderer().last_frame();

        assert_eq!(frame.len(), 2 + 2 + 1);
        assert_eq!(frame[2], format!("{} A 3", "█".repeat(24)));
        assert_eq!(frame[3], format!("{} B 2", "█".repeat(16)));
        assert_eq!(frame[4].trim_start(), "2015");
    }

    #[tokio::test(start_paused = true)]
    async fn entering_and_exiting_bars_follow_identity() {
        let timeline = timeline();
        let (start_tx, start) = start_signal();
        let (_handle, invalidation) = invalidation();
        start_tx.send(()).unwrap();

        let report = playback(&timeline).play(start, invalidation).await;
        assert_eq!(report.state, PlaybackState::Done);

        let renderer = report.renderer;
        let bars = &renderer.surface().bars;
        assert_eq!(bars.len(), 2);
        assert!(bars.get("B").is_none());
        assert!((bars.get("C").unwrap().to.rank - 0.0).abs() < f64::EPSILON);

        let frame = renderer.last_frame();
        assert_eq!(frame[2], format!("{} C 6", "█".repeat(24)));
        assert_eq!(frame[3], format!("{} A 3", "█".repeat(12)));
        assert!(frame[0].contains('6'));
        assert_eq!(frame[1].matches('┬').count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn interrupt_freezes_mid_transition() {
        let timeline = timeline();
        let (start_tx, start) = start_signal();
        let (handle, invalidation) = invalidation();
        start_tx.send(()).unwrap();

        let teardown = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            handle.invalidate();
        });
        let report = playback(&timeline).play(start, invalidation).await;
        teardown.await.unwrap();

        assert_eq!(report.state, PlaybackState::Cancelled);
        let renderer = report.renderer;

        // B is still leaving and C is still entering.
        let bars = &renderer.surface().bars;
        assert_eq!(bars.len(), 3);
        assert!(bars.get("B").unwrap().exiting);
        let entering = bars.get("C").unwrap();
        assert!((entering.from.rank - 2.0).abs() < f64::EPSILON);
        assert!((entering.from.value - 1.0).abs() < f64::EPSILON);

        assert_eq!(renderer.surface().ticker, "2015");
        assert_eq!(renderer.surface().pending_ticker.as_deref(), Some("2015"));
    }
}
