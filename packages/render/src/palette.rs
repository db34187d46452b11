//! Category colours.

use std::collections::HashMap;
use std::sync::Arc;

use console::Style;

/// Tableau 10, as the closest xterm-256 colour indices.
pub const TABLEAU10: [u8; 10] = [67, 209, 167, 109, 71, 179, 139, 217, 137, 248];

/// Stable category-to-colour assignment, cycling through [`TABLEAU10`] in
/// category order.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: HashMap<Arc<str>, u8>,
}

impl Palette {
    /// Assigns colours to `categories` in order.
    #[must_use]
    pub fn new(categories: &[Arc<str>]) -> Self {
        Self {
            colors: categories
                .iter()
                .enumerate()
                .map(|(i, c)| (Arc::clone(c), TABLEAU10[i % TABLEAU10.len()]))
                .collect(),
        }
    }

    /// Colour index for `category`; unknown categories get the first colour.
    #[must_use]
    pub fn color(&self, category: &str) -> u8 {
        self.colors.get(category).copied().unwrap_or(TABLEAU10[0])
    }

    /// Style for `category`.
    #[must_use]
    pub fn style(&self, category: &str) -> Style {
        Style::new().color256(self.color(category))
    }
}

/// Applies `style` to `text` when `enabled`, otherwise returns it plain.
#[must_use]
pub fn paint(text: &str, style: &Style, enabled: bool) -> String {
    if enabled {
        style.apply_to(text).force_styling(true).to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_tableau10() {
        let categories: Vec<Arc<str>> = (0..12).map(|i| Arc::from(format!("c{i}"))).collect();
        let palette = Palette::new(&categories);
        assert_eq!(palette.color("c0"), TABLEAU10[0]);
        assert_eq!(palette.color("c10"), TABLEAU10[0]);
        assert_eq!(palette.color("c11"), TABLEAU10[1]);
        assert_eq!(palette.color("missing"), TABLEAU10[0]);
    }

    #[test]
    fn paint_is_plain_when_disabled() {
        let style = Style::new().red();
        assert_eq!(paint("x", &style, false), "x");
        assert_ne!(paint("x", &style, true), "x");
        assert_eq!(console::strip_ansi_codes(&paint("x", &style, true)), "x");
    }
}
