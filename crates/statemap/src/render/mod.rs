//! SVG output for the region layer and its animated re-encoding.

mod regions;
mod transition;

pub use regions::{tooltip, RegionRenderer, RegionStyle};
pub use transition::{ease_cubic_in_out, Transition};

use crate::chart::ChartState;
use crate::svg::{number, xml_escape};
use std::fmt::Write;

pub const WIDTH: f64 = 975.0;
pub const HEIGHT: f64 = 610.0;
pub const MESH_STROKE: &str = "#ccc";
pub const REGION_STROKE: &str = "#000";

/// Opening `<svg>` tag sized to the map, with an optional `id`.
pub(crate) fn write_svg_open(out: &mut String, id: Option<&str>) {
    let _ = write!(out, r#"<svg xmlns="http://www.w3.org/2000/svg""#);
    if let Some(id) = id {
        let _ = write!(out, r#" id="{}""#, xml_escape(id));
    }
    let _ = writeln!(
        out,
        r#" viewBox="0 0 {w} {h}" width="{w}" height="{h}" stroke-linejoin="round" stroke-linecap="round" style="max-width: 100%; height: auto;">"#,
        w = number(WIDTH),
        h = number(HEIGHT),
    );
}

/// Light border layer drawn underneath the regions.
pub(crate) fn write_mesh(out: &mut String, chart: &ChartState) {
    let _ = writeln!(
        out,
        r#"<path fill="none" stroke="{MESH_STROKE}" d="{}"/>"#,
        chart.mesh_path()
    );
}
