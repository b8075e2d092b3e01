use crate::cli::{FramesArgs, InspectArgs, PageArgs, RenderArgs, SourceArgs};
use serde::Serialize;
use statemap::config::AppConfig;
use statemap::encoding::Rgb;
use statemap::error::AppError;
use statemap::page::render_page;
use statemap::render::RegionRenderer;
use statemap::{telemetry, ChartState, Metric, ViewController};
use std::path::Path;
use std::time::Instant;
use tracing::info;

async fn load_chart(sources: SourceArgs) -> Result<ChartState, AppError> {
    let mut config = AppConfig::load()?;
    sources.apply(&mut config.sources);
    telemetry::init(&config.telemetry)?;

    let chart = ChartState::load(&config.sources)
        .await?
        .with_transition(config.chart.transition);
    info!(
        ?config.environment,
        csv = %config.sources.csv_path.display(),
        topology = %config.sources.topology_path.display(),
        regions = chart.regions().len(),
        "chart loaded"
    );
    Ok(chart)
}

async fn write_output(path: &Path, contents: String) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    println!("wrote {}", path.display());
    Ok(())
}

pub(crate) async fn run_page(sources: SourceArgs, args: PageArgs) -> Result<(), AppError> {
    let chart = load_chart(sources).await?;
    write_output(&args.out, render_page(&chart, args.metric)).await
}

pub(crate) async fn run_render(sources: SourceArgs, args: RenderArgs) -> Result<(), AppError> {
    let chart = load_chart(sources).await?;
    let view = ViewController::new(&chart, args.metric);

    write_output(&args.out, view.render_svg_at(Instant::now())).await?;
    if let Some(path) = &args.legend_out {
        let legend = view
            .legend()
            .current()
            .map(|legend| legend.to_svg())
            .unwrap_or_default();
        write_output(path, legend).await?;
    }
    Ok(())
}

pub(crate) async fn run_frames(sources: SourceArgs, args: FramesArgs) -> Result<(), AppError> {
    let chart = load_chart(sources).await?;
    let mut view = ViewController::new(&chart, args.from);
    view.update_chart(args.to, Instant::now());

    let frames = view.frames(args.fps);
    tokio::fs::create_dir_all(&args.out_dir).await?;
    for (index, frame) in frames.iter().enumerate() {
        let path = args.out_dir.join(format!("frame-{index:04}.svg"));
        tokio::fs::write(&path, frame).await?;
    }
    println!(
        "wrote {} frames ({} -> {}) to {}",
        frames.len(),
        args.from.label(),
        args.to.label(),
        args.out_dir.display()
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct InspectRow {
    id: String,
    name: String,
    obesity_rate: f64,
    trump_vote: f64,
    obesity_fill: Rgb,
    vote_fill: Rgb,
    obesity_scale: f64,
    vote_scale: f64,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    color_domain: [f64; 2],
    records: usize,
    regions: Vec<InspectRow>,
}

fn inspect_report(chart: &ChartState) -> InspectReport {
    let [obesity, vote] = Metric::ALL.map(|metric| RegionRenderer::encode(chart, metric));
    let regions = chart
        .regions()
        .iter()
        .zip(obesity.iter().zip(&vote))
        .map(|(shape, (obesity, vote))| InspectRow {
            id: shape.id.to_string(),
            name: shape.name.clone(),
            obesity_rate: shape.value(Metric::ObesityRate),
            trump_vote: shape.value(Metric::TrumpVote),
            obesity_fill: obesity.fill,
            vote_fill: vote.fill,
            obesity_scale: obesity.scale,
            vote_scale: vote.scale,
        })
        .collect();

    InspectReport {
        color_domain: chart.encoder().color_scale().domain(),
        records: chart.dataset().len(),
        regions,
    }
}

pub(crate) async fn run_inspect(sources: SourceArgs, args: InspectArgs) -> Result<(), AppError> {
    let chart = load_chart(sources).await?;
    let report = inspect_report(&chart);

    if args.json {
        let body = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{body}");
        return Ok(());
    }

    println!(
        "Color domain {:.0}% - {:.0}% | {} records | {} regions drawn",
        report.color_domain[0] * 100.0,
        report.color_domain[1] * 100.0,
        report.records,
        report.regions.len()
    );
    for row in &report.regions {
        println!(
            "- {} ({}): obesity {:.1}% {} x{:.3} | trump {:.1}% {} x{:.3}",
            row.name,
            row.id,
            row.obesity_rate * 100.0,
            row.obesity_fill.to_hex(),
            row.obesity_scale,
            row.trump_vote * 100.0,
            row.vote_fill.to_hex(),
            row.vote_scale
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use statemap::atlas::Topology;

    fn chart() -> ChartState {
        let topology = Topology::from_slice(
            br#"{
                "type": "Topology",
                "arcs": [
                    [[30, 20], [30, 40], [10, 40], [10, 20], [30, 20]],
                    [[50, 20], [50, 40], [30, 40], [30, 20], [50, 20]]
                ],
                "objects": {
                    "states": {
                        "type": "GeometryCollection",
                        "geometries": [
                            {"type": "Polygon", "id": "01", "properties": {"name": "Alabama"}, "arcs": [[0]]},
                            {"type": "Polygon", "id": "04", "properties": {"name": "Arizona"}, "arcs": [[1]]}
                        ]
                    }
                }
            }"#,
        )
        .expect("topology parses");
        ChartState::build(
            "State Name,Obesity Rate%,Trump Vote %\nAlabama,36.3%,62.0%\nArizona,29.5%,49.1%\n"
                .as_bytes(),
            &topology,
            "states",
        )
        .expect("chart builds")
    }

    #[test]
    fn inspect_report_lists_every_drawn_region() {
        let report = inspect_report(&chart());

        assert_eq!(report.color_domain, [0.25, 0.65]);
        assert_eq!(report.records, 2);
        assert_eq!(report.regions.len(), 2);
        assert_eq!(report.regions[0].name, "Alabama");
        assert_eq!(report.regions[1].vote_fill, chart().encoder().color_of(0.491));

        let json = serde_json::to_value(&report).expect("report serializes");
        assert!(json["regions"][0]["obesity_fill"]
            .as_str()
            .is_some_and(|fill| fill.starts_with("rgb(")));
    }
}
