//! Shared color and size encodings.
//!
//! The color domain is computed once from every value of both metrics so
//! colors stay comparable when the active metric changes.

mod color;
mod scale;
mod ticks;

pub use color::{ColorRamp, Rgb};
pub use scale::{extent, PercentFormat, SequentialScale, SizeScale};
pub use ticks::{nice, precision_fixed, tick_increment, tick_step, ticks};

use crate::dataset::RegionDataset;
use tracing::debug;

/// Tick count used when rounding the shared color domain.
pub const NICE_COUNT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Encoder {
    color: SequentialScale,
    size: SizeScale,
}

impl Encoder {
    /// Build the shared scale; `None` for a dataset without finite values.
    pub fn from_dataset(dataset: &RegionDataset) -> Option<Self> {
        let domain = extent(dataset.values())?;
        let color = SequentialScale::new(domain, ColorRamp::reds()).nice(NICE_COUNT);
        debug!(
            min = domain[0],
            max = domain[1],
            nice_min = color.domain()[0],
            nice_max = color.domain()[1],
            "color domain computed"
        );
        Some(Self {
            color,
            size: SizeScale,
        })
    }

    pub fn color_scale(&self) -> &SequentialScale {
        &self.color
    }

    pub fn color_of(&self, value: f64) -> Rgb {
        self.color.color(value)
    }

    pub fn size_of(&self, value: f64) -> f64 {
        self.size.scale(value)
    }
}
