use super::color::{ColorRamp, Rgb};
use super::ticks;

/// `[min, max]` of the finite values, or `None` when there are none.
pub fn extent<I>(values: I) -> Option<[f64; 2]>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |bounds, value| match bounds {
            None => Some([value, value]),
            Some([min, max]) => Some([min.min(value), max.max(value)]),
        })
}

/// Continuous map from a numeric domain onto a color ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct SequentialScale {
    domain: [f64; 2],
    ramp: ColorRamp,
}

impl SequentialScale {
    pub fn new(domain: [f64; 2], ramp: ColorRamp) -> Self {
        Self { domain, ramp }
    }

    /// Round the domain outward so its ends land on tick values.
    pub fn nice(mut self, count: f64) -> Self {
        self.domain = ticks::nice(self.domain, count);
        self
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    /// Position of `value` within the domain; `0.5` for a single-point domain.
    pub fn normalize(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        if d0 == d1 {
            0.5
        } else {
            (value - d0) / (d1 - d0)
        }
    }

    pub fn color(&self, value: f64) -> Rgb {
        self.ramp.sample(self.normalize(value))
    }

    pub fn ticks(&self, count: f64) -> Vec<f64> {
        ticks::ticks(self.domain[0], self.domain[1], count)
    }

    /// Percent formatter precise enough to distinguish `ticks(count)`.
    pub fn percent_format(&self, count: f64) -> PercentFormat {
        let step = ticks::tick_step(self.domain[0], self.domain[1], count);
        PercentFormat::new(ticks::precision_fixed(step).saturating_sub(2))
    }
}

/// Fraction rendered as a percentage with a fixed number of decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentFormat {
    precision: usize,
}

impl PercentFormat {
    pub const fn new(precision: usize) -> Self {
        Self { precision }
    }

    pub fn format(&self, fraction: f64) -> String {
        format!("{:.*}%", self.precision, fraction * 100.0)
    }
}

/// Radial distortion factor applied around each region's centroid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeScale;

impl SizeScale {
    pub fn scale(&self, value: f64) -> f64 {
        value.max(0.0).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> SequentialScale {
        SequentialScale::new([0.295, 0.62], ColorRamp::reds()).nice(10.0)
    }

    #[test]
    fn extent_skips_non_finite_values() {
        assert_eq!(extent([0.4, f64::NAN, 0.1, 0.9]), Some([0.1, 0.9]));
        assert_eq!(extent(Vec::new()), None);
    }

    #[test]
    fn niced_domain_maps_ends_to_ramp_ends() {
        let scale = scale();
        assert_eq!(scale.domain(), [0.25, 0.65]);
        assert_eq!(scale.color(0.25), Rgb::new(255, 245, 240));
        assert_eq!(scale.color(0.65), Rgb::new(103, 0, 13));
        assert!((scale.normalize(0.45) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn single_point_domain_uses_the_midpoint() {
        let scale = SequentialScale::new([0.4, 0.4], ColorRamp::reds());
        assert_eq!(scale.color(0.4), ColorRamp::reds().sample(0.5));
    }

    #[test]
    fn percent_ticks_drop_decimals_for_tenths() {
        let scale = scale();
        let format = scale.percent_format(5.0);
        let labels: Vec<String> = scale.ticks(5.0).into_iter().map(|v| format.format(v)).collect();
        assert_eq!(labels, vec!["30%", "40%", "50%", "60%"]);
        assert_eq!(PercentFormat::new(1).format(0.62), "62.0%");
        assert_eq!(PercentFormat::new(1).format(0.363), "36.3%");
    }

    #[test]
    fn size_scale_is_a_monotone_square_root() {
        let size = SizeScale;
        assert_eq!(size.scale(0.0), 0.0);
        assert_eq!(size.scale(1.0), 1.0);
        assert_eq!(size.scale(0.25), 0.5);
        let samples: Vec<f64> = (0..=100).map(|step| size.scale(step as f64 / 100.0)).collect();
        assert!(samples.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
