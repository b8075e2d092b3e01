//! Color legend: a gradient bar for the shared scale with a percent axis below it.

use crate::dataset::Metric;
use crate::encoding::{Rgb, SequentialScale};
use crate::svg::{number, xml_escape};
use serde::Serialize;
use std::fmt::Write;
use tracing::debug;

/// Samples taken from the color ramp for the gradient bar.
const RAMP_SAMPLES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickFormat {
    Percent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendOptions {
    pub title: String,
    pub tick_format: TickFormat,
    pub gradient_id: String,
    pub width: f64,
    pub height: f64,
    pub tick_size: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            tick_format: TickFormat::Percent,
            gradient_id: "legend-ramp".to_string(),
            width: 320.0,
            height: 50.0,
            tick_size: 6.0,
            margin_top: 18.0,
            margin_right: 0.0,
            margin_bottom: 22.0,
            margin_left: 0.0,
        }
    }
}

impl LegendOptions {
    pub fn for_metric(metric: Metric) -> Self {
        Self {
            title: metric.legend_title().to_string(),
            gradient_id: format!("legend-ramp-{}", metric.index()),
            ..Self::default()
        }
    }

    /// Requested tick count, one per 64 pixels of bar.
    pub fn tick_count(&self) -> f64 {
        self.width / 64.0
    }

    fn bar_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendTick {
    pub value: f64,
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    options: LegendOptions,
    ramp: Vec<(f64, Rgb)>,
    ticks: Vec<LegendTick>,
}

impl Legend {
    pub fn title(&self) -> &str {
        &self.options.title
    }

    pub fn options(&self) -> &LegendOptions {
        &self.options
    }

    pub fn ticks(&self) -> &[LegendTick] {
        &self.ticks
    }

    /// Gradient stops as `(offset in [0, 1], color)`.
    pub fn ramp(&self) -> &[(f64, Rgb)] {
        &self.ramp
    }

    pub fn to_svg(&self) -> String {
        let o = &self.options;
        let id = xml_escape(&o.gradient_id);
        let axis_y = o.height - o.margin_bottom;
        let mut out = String::new();

        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" class="legend" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="overflow: visible; display: block;">"#,
            w = number(o.width),
            h = number(o.height),
        );
        let _ = writeln!(out, r#"<defs><linearGradient id="{id}">"#);
        for (offset, color) in &self.ramp {
            let _ = writeln!(
                out,
                r#"<stop offset="{}" stop-color="{}"/>"#,
                number(*offset),
                color.to_hex()
            );
        }
        out.push_str("</linearGradient></defs>\n");
        let _ = writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="url(#{id})"/>"#,
            number(o.margin_left),
            number(o.margin_top),
            number(o.bar_width()),
            number(axis_y - o.margin_top),
        );

        let _ = writeln!(
            out,
            r#"<g transform="translate(0,{})" font-size="10" font-family="sans-serif" text-anchor="middle">"#,
            number(axis_y)
        );
        let line_top = o.margin_top + o.margin_bottom - o.height;
        for tick in &self.ticks {
            let _ = writeln!(
                out,
                r#"<g class="tick" transform="translate({},0)"><line stroke="currentColor" y1="{}" y2="{}"/><text fill="currentColor" y="{}" dy="0.71em">{}</text></g>"#,
                number(tick.x),
                number(line_top),
                number(o.tick_size),
                number(o.tick_size.max(0.0) + 3.0),
                xml_escape(&tick.label),
            );
        }
        let _ = writeln!(
            out,
            r#"<text class="title" x="{}" y="{}" fill="currentColor" text-anchor="start" font-weight="bold">{}</text>"#,
            number(o.margin_left),
            number(line_top - 6.0),
            xml_escape(&o.title),
        );
        out.push_str("</g>\n</svg>\n");
        out
    }
}

pub struct LegendBuilder;

impl LegendBuilder {
    pub fn build(scale: &SequentialScale, options: &LegendOptions) -> Legend {
        let ramp = (0..RAMP_SAMPLES)
            .map(|index| {
                let offset = index as f64 / (RAMP_SAMPLES - 1) as f64;
                (offset, scale.ramp().sample(offset))
            })
            .collect();

        let count = options.tick_count();
        let format = match options.tick_format {
            TickFormat::Percent => scale.percent_format(count),
        };
        let ticks: Vec<LegendTick> = scale
            .ticks(count)
            .into_iter()
            .map(|value| LegendTick {
                value,
                x: (options.margin_left + options.bar_width() * scale.normalize(value)).round(),
                label: format.format(value),
            })
            .collect();

        debug!(title = %options.title, ticks = ticks.len(), "legend built");
        Legend {
            options: options.clone(),
            ramp,
            ticks,
        }
    }
}

/// The single legend container next to the chart.
///
/// Switching metrics clears it before inserting the new legend, so it never
/// holds more than one.
#[derive(Debug, Clone, Default)]
pub struct LegendSlot {
    current: Option<Legend>,
}

impl LegendSlot {
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn insert(&mut self, legend: Legend) {
        self.current = Some(legend);
    }

    pub fn current(&self) -> Option<&Legend> {
        self.current.as_ref()
    }

    pub fn render(&self) -> String {
        let body = self.current.as_ref().map(Legend::to_svg).unwrap_or_default();
        format!("<div id=\"legend\">\n{body}</div>\n")
    }
}
