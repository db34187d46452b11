//! The value scale shared between the playback driver and renderers.

/// Maps a continuous value domain onto a continuous output range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Creates a scale with domain `[0, 1]` over `range`.
    #[must_use]
    pub const fn new(range: (f64, f64)) -> Self {
        Self {
            domain: (0.0, 1.0),
            range,
        }
    }

    /// Current domain.
    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Output range.
    #[must_use]
    pub const fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Replaces the domain.
    pub const fn set_domain(&mut self, domain: (f64, f64)) {
        self.domain = domain;
    }

    /// Maps `value` into the range. A collapsed domain maps everything to
    /// the start of the range.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return r0;
        }
        (value - d0) / span * (r1 - r0) + r0
    }

    /// Roughly `count` evenly spaced round values covering the domain.
    ///
    /// Step sizes are powers of ten times 1, 2 or 5.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::float_cmp
    )]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };

        if start == stop {
            return vec![start];
        }
        if count == 0 || !(stop - start).is_finite() {
            return Vec::new();
        }

        let step = tick_step(start, stop, count);
        let first = (start / step).ceil() as i64;
        let last = (stop / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

#[allow(clippy::cast_precision_loss)]
fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start) / count as f64;
    let power = 10_f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50_f64.sqrt() {
        10.0
    } else if error >= 10_f64.sqrt() {
        5.0
    } else if error >= 2_f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_maps_domain_onto_range() {
        let mut x = LinearScale::new((0.0, 100.0));
        x.set_domain((0.0, 50.0));
        assert!((x.apply(25.0) - 50.0).abs() < 1e-9);
        assert!((x.apply(50.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn collapsed_domain_maps_to_range_start() {
        let mut x = LinearScale::new((4.0, 100.0));
        x.set_domain((0.0, 0.0));
        assert!((x.apply(0.0) - 4.0).abs() < f64::EPSILON);
        assert_eq!(x.ticks(5), vec![0.0]);
    }

    #[test]
    fn ticks_use_round_steps() {
        let mut x = LinearScale::new((0.0, 1.0));
        x.set_domain((0.0, 1234.0));
        assert_eq!(x.ticks(5), vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0, 1200.0]);

        x.set_domain((0.0, 9.0));
        assert_eq!(x.ticks(2), vec![0.0, 5.0]);
    }
}
