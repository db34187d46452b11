//! Text rendering of the speed-limit histogram.

use console::Style;
use crash_viz_histogram_models::{Histogram, HistogramBins};
use crash_viz_race::scale::LinearScale;

use crate::LayoutConfig;
use crate::format::{bar_glyphs, format_count};
use crate::palette::paint;

/// Colour of total-mode bars and the first compared year (steelblue).
pub const FIRST_COLOR: u8 = 67;

/// Colour of the second compared year (orange).
pub const SECOND_COLOR: u8 = 214;

const SPEED_COLUMNS: usize = 8;

/// Renders `histogram` as lines of text: title, optional legend, one bar per
/// speed limit (two per speed limit when comparing), and a count axis.
#[must_use]
pub fn render_histogram(histogram: &Histogram, layout: &LayoutConfig) -> Vec<String> {
    let colors = layout.colors;
    let mut lines = vec![paint(&histogram.title(), &Style::new().bold(), colors)];

    if histogram.is_empty() {
        lines.push("No speed-limit records to show.".to_string());
        return lines;
    }

    let mut x = LinearScale::new(layout.x_range());
    #[allow(clippy::cast_precision_loss)]
    let max = histogram.max_count() as f64;
    x.set_domain((0.0, max));
    let ticks = x.ticks(layout.axis_ticks);
    if let Some(nice_max) = ticks.last().copied().filter(|t| *t > max) {
        x.set_domain((0.0, nice_max));
    }

    let first = Style::new().color256(FIRST_COLOR);
    let second = Style::new().color256(SECOND_COLOR);

    match &histogram.bins {
        HistogramBins::Total(bins) => {
            for bin in bins {
                lines.push(bar_line(
                    &speed_label(bin.speed_limit),
                    bin.count,
                    &x,
                    &first,
                    colors,
                ));
            }
        }
        HistogramBins::Compare {
            first_year,
            second_year,
            bins,
        } => {
            lines.push(format!(
                "{} {first_year}  {} {second_year}",
                paint("■", &first, colors),
                paint("■", &second, colors)
            ));
            for bin in bins {
                lines.push(bar_line(
                    &speed_label(bin.speed_limit),
                    bin.first,
                    &x,
                    &first,
                    colors,
                ));
                lines.push(bar_line("", bin.second, &x, &second, colors));
            }
        }
    }

    lines.extend(axis_lines(&x, layout));
    lines
}

fn speed_label(speed_limit: u32) -> String {
    format!("{speed_limit} mph")
}

#[allow(clippy::cast_precision_loss)]
fn bar_line(label: &str, count: u64, x: &LinearScale, style: &Style, colors: bool) -> String {
    let value = count as f64;
    let glyphs = bar_glyphs(x.apply(value) - x.apply(0.0));
    format!(
        "{label:>SPEED_COLUMNS$} │{} {}",
        paint(&glyphs, style, colors),
        format_count(value)
    )
}

fn axis_lines(x: &LinearScale, layout: &LayoutConfig) -> Vec<String> {
    let columns = usize::from(layout.bar_columns()) + 1;
    let mut rule = vec!['─'; columns];
    let mut labels = vec![' '; columns + 8];

    for tick in x.ticks(layout.axis_ticks) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let column = (x.apply(tick).round().max(0.0) as usize).min(columns - 1);
        rule[column] = '┴';

        let text: Vec<char> = format_count(tick).chars().collect();
        let start = column.saturating_sub(text.len() / 2);
        for (offset, ch) in text.into_iter().enumerate() {
            if let Some(slot) = labels.get_mut(start + offset) {
                *slot = ch;
            }
        }
    }

    let indent = " ".repeat(SPEED_COLUMNS + 1);
    let dim = Style::new().dim();
    vec![
        paint(
            &format!("{indent}└{}", rule.into_iter().collect::<String>()),
            &dim,
            layout.colors,
        ),
        paint(
            format!("{indent} {}", labels.into_iter().collect::<String>()).trim_end(),
            &dim,
            layout.colors,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use crash_viz_histogram_models::{CompareBin, HistogramMode, SpeedBin};

    use super::*;

    fn layout() -> LayoutConfig {
        LayoutConfig {
            width: 30,
            label_width: 10,
            axis_ticks: 4,
            colors: false,
        }
    }

    #[test]
    fn total_mode_draws_one_bar_per_speed() {
        let histogram = Histogram {
            mode: HistogramMode::Total,
            bins: HistogramBins::Total(vec![
                SpeedBin {
                    speed_limit: 25,
                    count: 1_000,
                },
                SpeedBin {
                    speed_limit: 35,
                    count: 2_000,
                },
            ]),
        };

        let lines = render_histogram(&histogram, &layout());

        assert_eq!(lines[0], "Speed Limit Distribution (All Years)");
        assert_eq!(lines[1], format!("  25 mph │{} 1,000", "█".repeat(10)));
        assert_eq!(lines[2], format!("  35 mph │{} 2,000", "█".repeat(20)));
        assert_eq!(lines.len(), 5);
        assert!(lines[4].contains("2,000"));
    }

    #[test]
    fn compare_mode_draws_legend_and_paired_bars() {
        let histogram = Histogram {
            mode: HistogramMode::Compare {
                first: 2015,
                second: 2024,
            },
            bins: HistogramBins::Compare {
                first_year: 2015,
                second_year: 2024,
                bins: vec![CompareBin {
                    speed_limit: 40,
                    first: 0,
                    second: 4,
                }],
            },
        };

        let lines = render_histogram(&histogram, &layout());

        assert_eq!(lines[0], "Speed Limit Comparison: 2015 vs 2024");
        assert_eq!(lines[1], "■ 2015  ■ 2024");
        assert_eq!(lines[2], "  40 mph │ 0");
        assert_eq!(lines[3], format!("         │{} 4", "█".repeat(20)));
    }

    #[test]
    fn empty_histogram_says_so() {
        let histogram = Histogram {
            mode: HistogramMode::Total,
            bins: HistogramBins::Total(Vec::new()),
        };
        let lines = render_histogram(&histogram, &layout());
        assert_eq!(lines.len(), 2);
    }
}
