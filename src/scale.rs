//! Color classification and legend arithmetic for the choropleth.

/// ColorBrewer "Blues" 9-class sequential palette, light to dark.
pub const BLUES: [&str; 9] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
    "#08306b",
];

/// Band edges for the bachelor's percentage, in whole percent.
/// Values below the first edge are band 0; values at or above the
/// last edge are band 7.
pub const BAND_EDGES: [f64; 7] = [9.0, 18.0, 27.0, 36.0, 45.0, 54.0, 63.0];

/// Classify a percentage into one of 8 bands (0..=7).
pub fn band_for_percent(percent: f64) -> usize {
    BAND_EDGES.iter().filter(|edge| percent >= **edge).count()
}

/// Fill color for a percentage. Bands map 1:1 onto the 8 lightest
/// palette entries.
pub fn band_color(percent: f64) -> &'static str {
    BLUES[band_for_percent(percent)]
}

/// Step function mapping a continuous value onto a discrete palette.
#[derive(Debug, Clone)]
pub struct ThresholdScale {
    thresholds: Vec<f64>,
    palette: Vec<&'static str>,
}

impl ThresholdScale {
    pub fn new(thresholds: Vec<f64>, palette: Vec<&'static str>) -> Self {
        ThresholdScale {
            thresholds,
            palette,
        }
    }

    /// Integer breakpoints 1..=9 over the full Blues palette, as used
    /// by the legend.
    pub fn blues() -> Self {
        ThresholdScale::new((1..=9).map(f64::from).collect(), BLUES.to_vec())
    }

    pub fn len(&self) -> usize {
        self.palette.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palette.is_empty()
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Color for a value, or None when the value sits past the last
    /// covered interval.
    pub fn color(&self, value: f64) -> Option<&'static str> {
        let index = self.thresholds.iter().filter(|t| value >= **t).count();
        self.palette.get(index).copied()
    }

    /// The domain interval covered by palette entry `index`. An open
    /// end is None; callers clip it to their visible domain.
    pub fn invert_extent(&self, index: usize) -> (Option<f64>, Option<f64>) {
        let lo = if index == 0 {
            None
        } else {
            self.thresholds.get(index - 1).copied()
        };
        let hi = self.thresholds.get(index).copied();
        (lo, hi)
    }
}

/// Linear domain-to-pixel scale with rounded output.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        LinearScale {
            d0: domain.0,
            d1: domain.1,
            r0: range.0,
            r1: range.1,
        }
    }

    /// The pixel scale the legend swatches and axis are laid out on.
    pub fn legend_x() -> Self {
        LinearScale::new((1.0, 10.0), (600.0, 860.0))
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.d0, self.d1)
    }

    pub fn apply(&self, value: f64) -> f64 {
        ((value - self.d0) / (self.d1 - self.d0) * (self.r1 - self.r0) + self.r0).round()
    }
}

/// Legend tick series derived from the dataset's value range:
/// nine values at `min + i * (max - min) / 8`.
#[derive(Debug, Clone, Copy)]
pub struct LegendTicks {
    pub min: f64,
    pub max: f64,
    pub interval: f64,
}

impl LegendTicks {
    pub fn from_range(min: f64, max: f64) -> Self {
        LegendTicks {
            min,
            max,
            interval: (max - min) / 8.0,
        }
    }

    /// The nine computed tick values, rounded to one decimal.
    pub fn values(&self) -> Vec<f64> {
        (0..=8)
            .map(|i| ((self.min + i as f64 * self.interval) * 10.0).round() / 10.0)
            .collect()
    }

    /// Axis label for tick `i`: the rounded minimum for the first
    /// tick, then whole multiples of the interval.
    pub fn label(&self, i: usize) -> String {
        if i == 0 {
            format!("{}%", self.min.round() as i64)
        } else {
            format!("{}%", (i as f64 * self.interval).round() as i64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_table_matches_fixed_edges() {
        assert_eq!(band_for_percent(5.0), 0);
        assert_eq!(band_for_percent(40.0), 4);
        assert_eq!(band_for_percent(70.0), 7);
    }

    #[test]
    fn band_edges_are_inclusive_below() {
        assert_eq!(band_for_percent(9.0), 1);
        assert_eq!(band_for_percent(8.999), 0);
        assert_eq!(band_for_percent(54.0), 6);
    }

    #[test]
    fn sixty_three_falls_in_top_band() {
        // The top band is inclusive at 63; no percentage is left
        // without a color.
        assert_eq!(band_for_percent(63.0), 7);
        assert_eq!(band_for_percent(62.999), 6);
    }

    #[test]
    fn banding_is_monotonic() {
        let mut previous = 0;
        let mut v = 0.0;
        while v < 80.0 {
            let band = band_for_percent(v);
            assert!(band >= previous, "band dropped at {}", v);
            assert!(band <= 7);
            previous = band;
            v += 0.25;
        }
    }

    #[test]
    fn band_colors_are_the_eight_lightest() {
        assert_eq!(band_color(5.0), BLUES[0]);
        assert_eq!(band_color(40.0), BLUES[4]);
        assert_eq!(band_color(70.0), BLUES[7]);
    }

    #[test]
    fn threshold_scale_picks_by_breakpoint() {
        let scale = ThresholdScale::blues();
        assert_eq!(scale.color(0.0), Some(BLUES[0]));
        assert_eq!(scale.color(1.0), Some(BLUES[1]));
        assert_eq!(scale.color(8.5), Some(BLUES[8]));
        assert_eq!(scale.color(9.0), None);
    }

    #[test]
    fn invert_extent_ends_are_open() {
        let scale = ThresholdScale::blues();
        assert_eq!(scale.invert_extent(0), (None, Some(1.0)));
        assert_eq!(scale.invert_extent(3), (Some(3.0), Some(4.0)));
        assert_eq!(scale.invert_extent(8), (Some(8.0), Some(9.0)));
    }

    #[test]
    fn legend_x_maps_domain_to_pixels() {
        let x = LinearScale::legend_x();
        assert_eq!(x.apply(1.0), 600.0);
        assert_eq!(x.apply(10.0), 860.0);
        assert_eq!(x.apply(9.0), 831.0);
    }

    #[test]
    fn tick_values_span_the_range() {
        let ticks = LegendTicks::from_range(2.6, 75.1);
        let values = ticks.values();
        assert_eq!(values.len(), 9);
        for pair in values.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert!((values[0] - 2.6).abs() < 1e-9);
        assert!((values[8] - 75.1).abs() < 1e-9);
    }

    #[test]
    fn tick_labels_follow_axis_format() {
        let ticks = LegendTicks::from_range(2.6, 75.1);
        assert_eq!(ticks.label(0), "3%");
        assert_eq!(ticks.label(1), "9%");
        assert_eq!(ticks.label(8), "73%");
    }
}
