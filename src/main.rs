mod app;
mod dataset;
mod util;

use std::path::PathBuf;

use clap::Parser;
use log::info;

use app::{ExplorerConfig, ViewMode};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Dataset JSON with clusters, jobs and cluster similarities.
    #[arg(long)]
    dataset: PathBuf,

    #[arg(long, value_enum, default_value_t = ViewMode::Flat)]
    view: ViewMode,

    #[arg(long, default_value_t = 0.18)]
    min_scale: f32,

    #[arg(long, default_value_t = 7.0)]
    max_scale: f32,

    /// Maximum neighbor edges per job.
    #[arg(long, default_value_t = 2)]
    neighbor_cap: usize,

    /// Global neighbor edge budget.
    #[arg(long, default_value_t = 600)]
    max_edges: usize,

    #[arg(long, default_value_t = 8.0)]
    neighbor_distance: f32,

    /// Minimum normalized similarity for a cluster relationship edge.
    #[arg(long, default_value_t = 0.6)]
    group_threshold: f64,
}

impl Args {
    fn config(&self) -> ExplorerConfig {
        ExplorerConfig {
            view_mode: self.view,
            min_scale: self.min_scale,
            max_scale: self.max_scale,
            neighbor_cap: self.neighbor_cap,
            max_edges: self.max_edges,
            neighbor_distance: self.neighbor_distance,
            group_threshold: self.group_threshold,
        }
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.config();
    info!("starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "job-atlas",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::ExplorerApp::new(
                cc,
                args.dataset.clone(),
                config,
            )))
        }),
    )
}
