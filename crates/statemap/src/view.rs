//! Metric selection: re-encodes the regions and swaps the legend.

use crate::chart::ChartState;
use crate::dataset::{InvalidMetric, Metric};
use crate::legend::{Legend, LegendBuilder, LegendOptions, LegendSlot};
use crate::render::{RegionRenderer, RegionStyle};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub active: Metric,
}

#[derive(Debug)]
pub struct ViewController<'a> {
    renderer: RegionRenderer<'a>,
    legend: LegendSlot,
    state: ViewState,
}

impl<'a> ViewController<'a> {
    /// Draw the chart for `initial` and show its legend.
    pub fn new(chart: &'a ChartState, initial: Metric) -> Self {
        let mut legend = LegendSlot::default();
        legend.insert(build_legend(chart, initial));
        Self {
            renderer: RegionRenderer::draw(chart, initial),
            legend,
            state: ViewState { active: initial },
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn active_metric(&self) -> Metric {
        self.state.active
    }

    /// Animate every region to `metric` and replace the legend.
    ///
    /// Selecting the already active metric still restarts the animation.
    pub fn update_chart(&mut self, metric: Metric, now: Instant) {
        self.renderer.re_encode(metric, now);
        self.legend.clear();
        self.legend.insert(build_legend(self.renderer.chart(), metric));
        info!(
            from = self.state.active.label(),
            to = metric.label(),
            "metric switched"
        );
        self.state.active = metric;
    }

    /// Handle a raw selector value (`"0"` or `"1"`); invalid values leave the view unchanged.
    pub fn on_input(&mut self, raw: &str, now: Instant) -> Result<Metric, InvalidMetric> {
        let metric = raw.parse::<Metric>()?;
        self.update_chart(metric, now);
        Ok(metric)
    }

    pub fn renderer(&self) -> &RegionRenderer<'a> {
        &self.renderer
    }

    pub fn legend(&self) -> &LegendSlot {
        &self.legend
    }

    pub fn styles_at(&self, now: Instant) -> Vec<RegionStyle> {
        self.renderer.styles_at(now)
    }

    pub fn render_svg_at(&self, now: Instant) -> String {
        self.renderer.render_at(now)
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        self.renderer.is_settled(now)
    }

    /// SVG frames of the latest transition, or the settled chart when none ran.
    pub fn frames(&self, fps: u32) -> Vec<String> {
        match self.renderer.transition() {
            Some(transition) => transition
                .frames(fps)
                .iter()
                .map(|styles| self.renderer.render(styles))
                .collect(),
            None => vec![self.renderer.render(self.renderer.target())],
        }
    }
}

fn build_legend(chart: &ChartState, metric: Metric) -> Legend {
    LegendBuilder::build(
        chart.encoder().color_scale(),
        &LegendOptions::for_metric(metric),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Topology;
    use std::io::Cursor;
    use std::time::Duration;

    fn chart() -> ChartState {
        let topology = Topology::from_slice(
            br#"{
                "type": "Topology",
                "arcs": [[[30, 20], [30, 40], [10, 40], [10, 20], [30, 20]]],
                "objects": {
                    "states": {
                        "type": "GeometryCollection",
                        "geometries": [
                            {"type": "Polygon", "id": "01", "properties": {"name": "Alabama"}, "arcs": [[0]]}
                        ]
                    }
                }
            }"#,
        )
        .expect("topology parses");
        ChartState::build(
            Cursor::new("State Name,Obesity Rate%,Trump Vote %\nAlabama,36.3%,62.0%\n"),
            &topology,
            "states",
        )
        .expect("chart builds")
    }

    #[test]
    fn starts_on_the_initial_metric_with_its_legend() {
        let chart = chart();
        let view = ViewController::new(&chart, Metric::ObesityRate);
        let now = Instant::now();

        assert_eq!(view.active_metric(), Metric::ObesityRate);
        assert!(view.is_settled(now));
        assert_eq!(
            view.legend().current().map(|legend| legend.title()),
            Some("Adult obesity (self-reported)")
        );
        assert_eq!(view.frames(30).len(), 1);
    }

    #[test]
    fn invalid_input_leaves_the_view_unchanged() {
        let chart = chart();
        let mut view = ViewController::new(&chart, Metric::ObesityRate);
        let now = Instant::now();

        let error = view.on_input("7", now).expect_err("out of range");
        assert_eq!(error.value, "7");
        assert_eq!(view.active_metric(), Metric::ObesityRate);
        assert!(view.renderer().transition().is_none());
    }

    #[test]
    fn input_switches_metric_and_animates() {
        let chart = chart();
        let mut view = ViewController::new(&chart, Metric::ObesityRate);
        let start = Instant::now();

        assert_eq!(view.on_input("1", start), Ok(Metric::TrumpVote));
        assert_eq!(view.active_metric(), Metric::TrumpVote);
        assert!(!view.is_settled(start + Duration::from_millis(100)));
        assert!(view.is_settled(start + Duration::from_millis(750)));
        assert_eq!(
            view.legend().current().map(|legend| legend.title()),
            Some("Trump vote %")
        );
        assert!(view.frames(20).len() > 2);
    }
}
