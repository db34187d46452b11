//! Number and bar-glyph formatting.

/// Rounds `value` to an integer and groups thousands with commas.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if rounded < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

const PARTIAL_BLOCKS: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];

/// A horizontal bar `columns` wide, using eighth blocks for the fraction.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn bar_glyphs(columns: f64) -> String {
    if !columns.is_finite() || columns <= 0.0 {
        return String::new();
    }

    let full = columns.floor() as usize;
    let eighths = ((columns - full as f64) * 8.0).round() as usize;
    let mut bar = "█".repeat(full);
    match eighths {
        0 => {}
        8 => bar.push('█'),
        n => bar.push(PARTIAL_BLOCKS[n]),
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.4), "999");
        assert_eq!(format_count(1_234.6), "1,235");
        assert_eq!(format_count(1_234_567.0), "1,234,567");
        assert_eq!(format_count(-12_000.0), "-12,000");
        assert_eq!(format_count(f64::NAN), "0");
    }

    #[test]
    fn bars_use_partial_blocks() {
        assert_eq!(bar_glyphs(0.0), "");
        assert_eq!(bar_glyphs(3.0), "███");
        assert_eq!(bar_glyphs(2.5), "██▌");
        assert_eq!(bar_glyphs(1.99), "██");
    }
}
