use crate::commands::{run_frames, run_inspect, run_page, run_render};
use clap::{Args, Parser, Subcommand};
use statemap::config::SourceConfig;
use statemap::error::AppError;
use statemap::Metric;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "statemap",
    about = "Render the obesity rate vs Trump vote choropleth from a state CSV and a TopoJSON atlas",
    version
)]
struct Cli {
    #[command(flatten)]
    sources: SourceArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the interactive HTML page (default command)
    Page(PageArgs),
    /// Write a static SVG of the map for one metric, plus its legend
    Render(RenderArgs),
    /// Write the animation between two metrics as numbered SVG frames
    Frames(FramesArgs),
    /// Print the joined records with their encoded color and scale
    Inspect(InspectArgs),
}

/// Overrides for the configured input files.
#[derive(Args, Debug, Default)]
pub(crate) struct SourceArgs {
    /// State CSV with "State Name", "Obesity Rate%" and "Trump Vote %" columns
    #[arg(long, global = true)]
    pub(crate) csv: Option<PathBuf>,
    /// TopoJSON atlas holding the state geometries
    #[arg(long, global = true)]
    pub(crate) topology: Option<PathBuf>,
    /// Name of the topology object with one geometry per state
    #[arg(long, global = true)]
    pub(crate) object: Option<String>,
}

impl SourceArgs {
    pub(crate) fn apply(self, sources: &mut SourceConfig) {
        if let Some(csv) = self.csv {
            sources.csv_path = csv;
        }
        if let Some(topology) = self.topology {
            sources.topology_path = topology;
        }
        if let Some(object) = self.object {
            sources.object = object;
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct PageArgs {
    /// Metric selected when the page opens (0 = obesity rate, 1 = Trump vote)
    #[arg(long, default_value = "0")]
    pub(crate) metric: Metric,
    /// Output HTML file
    #[arg(long, default_value = "statemap.html")]
    pub(crate) out: PathBuf,
}

impl Default for PageArgs {
    fn default() -> Self {
        Self {
            metric: Metric::ObesityRate,
            out: PathBuf::from("statemap.html"),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct RenderArgs {
    /// Metric to encode (0 = obesity rate, 1 = Trump vote)
    #[arg(long, default_value = "0")]
    pub(crate) metric: Metric,
    /// Output SVG file for the map
    #[arg(long, default_value = "statemap.svg")]
    pub(crate) out: PathBuf,
    /// Optional output SVG file for the legend
    #[arg(long)]
    pub(crate) legend_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct FramesArgs {
    /// Metric shown before the switch
    #[arg(long, default_value = "0")]
    pub(crate) from: Metric,
    /// Metric the animation switches to
    #[arg(long)]
    pub(crate) to: Metric,
    /// Frames per second of animation
    #[arg(long, default_value_t = 30)]
    pub(crate) fps: u32,
    /// Directory receiving frame-NNNN.svg files
    #[arg(long)]
    pub(crate) out_dir: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct InspectArgs {
    /// Print JSON instead of a text table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Page(PageArgs::default()));

    match command {
        Command::Page(args) => run_page(cli.sources, args).await,
        Command::Render(args) => run_render(cli.sources, args).await,
        Command::Frames(args) => run_frames(cli.sources, args).await,
        Command::Inspect(args) => run_inspect(cli.sources, args).await,
    }
}
