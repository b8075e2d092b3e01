use super::{write_mesh, write_svg_open, Transition, REGION_STROKE};
use crate::atlas::Point;
use crate::chart::{ChartState, RegionShape};
use crate::dataset::{Metric, RegionRecord};
use crate::encoding::{Encoder, Rgb};
use crate::svg::{number, xml_escape};
use std::fmt::Write;
use std::time::Instant;
use tracing::debug;

/// Visual attributes of one region for a given metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStyle {
    pub fill: Rgb,
    pub scale: f64,
    pub centroid: Point<f64>,
}

impl RegionStyle {
    pub fn for_region(encoder: &Encoder, shape: &RegionShape, metric: Metric) -> Self {
        let value = shape.value(metric);
        Self {
            fill: encoder.color_of(value),
            scale: encoder.size_of(value),
            centroid: shape.centroid,
        }
    }

    /// Uniform scaling about the centroid, so the centroid stays fixed.
    pub fn transform(&self) -> String {
        let (x, y) = self.centroid.x_y();
        format!(
            "translate({},{}) scale({}) translate({},{})",
            number(x),
            number(y),
            number(self.scale),
            number(-x),
            number(-y)
        )
    }

    pub fn interpolate(&self, to: &RegionStyle, t: f64) -> RegionStyle {
        RegionStyle {
            fill: self.fill.interpolate(to.fill, t),
            scale: self.scale + (to.scale - self.scale) * t,
            centroid: to.centroid,
        }
    }
}

/// Hover text: the display name followed by both metrics as one-decimal percentages.
pub fn tooltip(name: &str, record: &RegionRecord) -> String {
    let mut text = name.to_string();
    for metric in Metric::ALL {
        let _ = write!(
            text,
            "\n{}: {:.1}%",
            metric.label(),
            record.value(metric) * 100.0
        );
    }
    text
}

/// Draws the region layer and animates it between metrics.
///
/// Styles are indexed like [`ChartState::regions`]. A re-encode started
/// while another is still running begins from the styles visible at that
/// instant and replaces it.
#[derive(Debug)]
pub struct RegionRenderer<'a> {
    chart: &'a ChartState,
    settled: Vec<RegionStyle>,
    transition: Option<Transition>,
}

impl<'a> RegionRenderer<'a> {
    /// Initial draw for `metric`, without animation.
    pub fn draw(chart: &'a ChartState, metric: Metric) -> Self {
        let settled = Self::encode(chart, metric);
        debug!(regions = settled.len(), metric = metric.label(), "regions drawn");
        Self {
            chart,
            settled,
            transition: None,
        }
    }

    /// One style per entry of [`ChartState::regions`], in the same order.
    pub fn encode(chart: &ChartState, metric: Metric) -> Vec<RegionStyle> {
        chart
            .regions()
            .iter()
            .map(|shape| RegionStyle::for_region(chart.encoder(), shape, metric))
            .collect()
    }

    pub fn chart(&self) -> &'a ChartState {
        self.chart
    }

    /// Start animating every region toward its encoding for `metric`.
    pub fn re_encode(&mut self, metric: Metric, now: Instant) {
        let from = self.styles_at(now);
        let to = Self::encode(self.chart, metric);
        if let Some(previous) = &self.transition {
            if !previous.is_finished(now) {
                debug!("interrupting running transition");
            }
        }
        self.settled = to.clone();
        self.transition = Some(Transition::new(from, to, now, self.chart.transition()));
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn styles_at(&self, now: Instant) -> Vec<RegionStyle> {
        match &self.transition {
            Some(transition) => transition.sample(now),
            None => self.settled.clone(),
        }
    }

    /// Styles once every running transition has finished.
    pub fn target(&self) -> &[RegionStyle] {
        &self.settled
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        self.transition
            .as_ref()
            .map_or(true, |transition| transition.is_finished(now))
    }

    pub fn render_at(&self, now: Instant) -> String {
        self.render(&self.styles_at(now))
    }

    /// Standalone SVG document with the border mesh and one path per region.
    pub fn render(&self, styles: &[RegionStyle]) -> String {
        let mut out = String::new();
        write_svg_open(&mut out, None);
        write_mesh(&mut out, self.chart);
        let _ = writeln!(out, r#"<g stroke="{REGION_STROKE}">"#);
        for (shape, style) in self.chart.regions().iter().zip(styles) {
            self.write_region(&mut out, shape, style);
        }
        out.push_str("</g>\n</svg>\n");
        out
    }

    fn write_region(&self, out: &mut String, shape: &RegionShape, style: &RegionStyle) {
        let title = self
            .chart
            .record(&shape.id)
            .map(|record| tooltip(&shape.name, record))
            .unwrap_or_else(|| shape.name.clone());
        let _ = writeln!(
            out,
            r#"<path data-id="{}" vector-effect="non-scaling-stroke" d="{}" fill="{}" transform="{}"><title>{}</title></path>"#,
            xml_escape(shape.id.as_str()),
            shape.path,
            style.fill,
            style.transform(),
            xml_escape(&title),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RegionId;

    #[test]
    fn transform_scales_about_the_centroid() {
        let style = RegionStyle {
            fill: Rgb::new(0, 0, 0),
            scale: 0.5,
            centroid: Point::new(20.0, 30.0),
        };
        assert_eq!(
            style.transform(),
            "translate(20,30) scale(0.5) translate(-20,-30)"
        );
    }

    #[test]
    fn interpolation_keeps_target_centroid() {
        let from = RegionStyle {
            fill: Rgb::new(0, 0, 0),
            scale: 0.2,
            centroid: Point::new(20.0, 30.0),
        };
        let to = RegionStyle {
            fill: Rgb::new(100, 50, 0),
            scale: 0.6,
            centroid: Point::new(20.0, 30.0),
        };
        let mid = from.interpolate(&to, 0.5);
        assert_eq!(mid.fill, Rgb::new(50, 25, 0));
        assert!((mid.scale - 0.4).abs() < 1e-12);
        assert_eq!(mid.centroid, to.centroid);
    }

    #[test]
    fn tooltip_lists_both_metrics_with_one_decimal() {
        let record = RegionRecord {
            id: RegionId::new("01"),
            name: "Alabama".to_string(),
            metrics: [0.363, 0.62],
        };
        assert_eq!(
            tooltip("Alabama", &record),
            "Alabama\nObesity Rate: 36.3%\nTrump Vote: 62.0%"
        );
    }
}
