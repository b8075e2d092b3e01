//! Planar geometry decoded from TopoJSON into `geo` types, plus SVG path data.
//!
//! Coordinates are used as-is (the atlases this crate targets are already
//! projected to screen space), so no projection step exists here.

mod path;
mod topology;

pub use geo::{Geometry, MultiLineString, Point};
pub use path::{lines_path_data, path_data};
pub use topology::{
    ArcTable, GeometryProperties, QuantizeTransform, Shape, TopoGeometry, Topology, TopologyError,
};

use crate::dataset::RegionId;

/// A decoded region shape together with its descriptor metadata.
#[derive(Debug, Clone)]
pub struct Feature {
    pub id: Option<RegionId>,
    pub name: Option<String>,
    pub geometry: Geometry<f64>,
}
