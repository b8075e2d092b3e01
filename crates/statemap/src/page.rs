//! Self-contained HTML page with a two-option metric selector.
//!
//! Both encodings are written into the document as CSS custom properties on
//! each region; the checked radio input picks which set applies and CSS
//! transitions animate the change.

use crate::chart::ChartState;
use crate::dataset::Metric;
use crate::legend::{LegendBuilder, LegendOptions};
use crate::render::{
    tooltip, write_mesh, write_svg_open, RegionRenderer, RegionStyle, REGION_STROKE,
};
use crate::svg::{number, xml_escape};
use std::fmt::Write;
use std::time::Duration;

pub const PAGE_TITLE: &str = "Obesity Rate vs Trump Vote";

/// CSS timing function matching the cubic in-out easing used for frames.
const EASE_CUBIC_IN_OUT: &str = "cubic-bezier(0.645, 0.045, 0.355, 1)";

pub fn render_page(chart: &ChartState, initial: Metric) -> String {
    let encodings: Vec<Vec<RegionStyle>> = Metric::ALL
        .iter()
        .map(|metric| RegionRenderer::encode(chart, *metric))
        .collect();

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", xml_escape(PAGE_TITLE));
    let _ = writeln!(out, "<style>\n{}</style>", stylesheet(chart.transition()));
    out.push_str("</head>\n<body>\n<main class=\"statemap\">\n");

    for metric in Metric::ALL {
        let index = metric.index();
        let _ = writeln!(
            out,
            r#"<input type="radio" name="input" id="metric-{index}" value="{index}"{}><label for="metric-{index}">{}</label>"#,
            if metric == initial { " checked" } else { "" },
            xml_escape(metric.label()),
        );
    }

    out.push_str("<div id=\"legend\">\n");
    for metric in Metric::ALL {
        let legend = LegendBuilder::build(
            chart.encoder().color_scale(),
            &LegendOptions::for_metric(metric),
        );
        let _ = write!(
            out,
            "<div class=\"legend-{}\">\n{}</div>\n",
            metric.index(),
            legend.to_svg()
        );
    }
    out.push_str("</div>\n<div class=\"chart\">\n");

    write_svg_open(&mut out, Some("chart"));
    write_mesh(&mut out, chart);
    let _ = writeln!(out, r#"<g stroke="{REGION_STROKE}">"#);
    for (position, shape) in chart.regions().iter().enumerate() {
        let mut vars = String::new();
        for (index, styles) in encodings.iter().enumerate() {
            if let Some(style) = styles.get(position) {
                let _ = write!(
                    vars,
                    "--fill-{index}: {}; --transform-{index}: {}; ",
                    style.fill,
                    css_transform(style)
                );
            }
        }
        let title = chart
            .record(&shape.id)
            .map(|record| tooltip(&shape.name, record))
            .unwrap_or_else(|| shape.name.clone());
        let _ = writeln!(
            out,
            r#"<path class="region" data-id="{}" vector-effect="non-scaling-stroke" d="{}" style="{}"><title>{}</title></path>"#,
            xml_escape(shape.id.as_str()),
            shape.path,
            vars.trim_end(),
            xml_escape(&title),
        );
    }
    out.push_str("</g>\n</svg>\n</div>\n</main>\n</body>\n</html>\n");
    out
}

fn css_transform(style: &RegionStyle) -> String {
    let (x, y) = style.centroid.x_y();
    format!(
        "translate({}px, {}px) scale({}) translate({}px, {}px)",
        number(x),
        number(y),
        number(style.scale),
        number(-x),
        number(-y)
    )
}

fn stylesheet(transition: Duration) -> String {
    let ms = transition.as_millis();
    let mut css = format!(
        "body {{ font-family: sans-serif; }}\n\
         #legend > div {{ display: none; }}\n\
         .chart path.region {{ transition: fill {ms}ms {EASE_CUBIC_IN_OUT}, transform {ms}ms {EASE_CUBIC_IN_OUT}; }}\n"
    );
    for metric in Metric::ALL {
        let index = metric.index();
        let _ = writeln!(
            css,
            "#metric-{index}:checked ~ #legend .legend-{index} {{ display: block; }}"
        );
        let _ = writeln!(
            css,
            "#metric-{index}:checked ~ .chart path.region {{ fill: var(--fill-{index}); transform: var(--transform-{index}); }}"
        );
    }
    css
}
