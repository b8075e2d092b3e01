pub mod atlas;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod legend;
pub mod page;
pub mod render;
mod svg;
pub mod telemetry;
pub mod view;

pub use chart::ChartState;
pub use dataset::{Metric, RegionDataset, RegionId, RegionRecord};
pub use view::ViewController;
