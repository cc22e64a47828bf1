mod app;
mod chart;
mod config;
mod error;
mod topics;
mod util;

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use app::{GlanceApp, LaunchOptions, Route};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Config file to use instead of the per-user one.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the category folders and `subreddits.json`.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Category to open first.
    #[arg(long)]
    category: Option<String>,
    /// Seed for the initial bubble placement.
    #[arg(long)]
    seed: Option<u64>,
    /// View to open, `/` or `/viz?subreddit=<category>`.
    #[arg(long, default_value = "/")]
    view: Route,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("glance=info")),
        1 => EnvFilter::new("glance=debug"),
        _ => EnvFilter::new("glance=trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_default(),
    };
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    info!(data_dir = %config.data_dir.display(), seed, view = %args.view, "starting");

    let options = LaunchOptions {
        config,
        config_path: args.config,
        category: args.category,
        route: args.view,
        seed,
    };
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Glance: Topic Modeling over Time",
        native_options,
        Box::new(move |cc| Ok(Box::new(GlanceApp::new(cc, options)))),
    )
    .map_err(|error| anyhow!("failed to run the chart window: {error}"))
}
