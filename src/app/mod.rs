use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Context as _;
use eframe::egui::{self, Context};
use tracing::{info, warn};

use crate::chart::Chart;
use crate::config::{GlanceConfig, LayoutSettings};
use crate::topics::{Dataset, load_categories, load_category};

mod graph;
mod render_utils;
mod route;
mod ui;

pub use route::Route;

struct LoadedData {
    categories: Vec<String>,
    dataset: Dataset,
}

type LoadResult = Result<LoadedData, String>;

pub struct LaunchOptions {
    pub config: GlanceConfig,
    pub config_path: Option<PathBuf>,
    pub category: Option<String>,
    pub route: Route,
    pub seed: u64,
}

pub struct GlanceApp {
    options: LaunchOptions,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    chart: Chart,
    categories: Vec<String>,
    category: String,
    config: GlanceConfig,
    config_path: Option<PathBuf>,
    layout: LayoutSettings,
    route: Route,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    hovered: Option<usize>,
    boundary_notice: bool,
    status: Option<String>,
}

struct SearchMatchCache {
    query: String,
    generation: u64,
    matches: HashSet<usize>,
}

fn load_data(
    data_dir: &Path,
    fallback: &[String],
    category: Option<String>,
) -> anyhow::Result<LoadedData> {
    let categories = load_categories(data_dir, fallback)?;
    let category = match category {
        Some(category) => category,
        None => categories
            .first()
            .cloned()
            .context("no categories configured")?,
    };
    if !categories.contains(&category) {
        warn!(%category, "category is not listed in the catalog");
    }

    let dataset = load_category(data_dir, &category)?;
    Ok(LoadedData {
        categories,
        dataset,
    })
}

impl GlanceApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let requested = options.category.clone().or_else(|| match &options.route {
            Route::Detail { category } => Some(category.clone()),
            Route::Main => None,
        });
        let state = Self::start_load(&options.config, requested);
        Self {
            options,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(config: &GlanceConfig, category: Option<String>) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();
        let data_dir = config.data_dir.clone();
        let fallback = config.categories.clone();

        thread::spawn(move || {
            let result =
                load_data(&data_dir, &fallback, category).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(config: &GlanceConfig, category: Option<String>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(config, category),
        }
    }
}

impl eframe::App for GlanceApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                transition = match rx.try_recv() {
                    Ok(Ok(loaded)) => Some(AppState::Ready(Box::new(ViewModel::new(
                        loaded,
                        &self.options,
                    )))),
                    Ok(Err(error)) => Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => None,
                    Err(TryRecvError::Disconnected) => Some(AppState::Error(
                        "Background load worker disconnected".to_owned(),
                    )),
                };

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading topic tables...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load topic data");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(
                            &self.options.config,
                            self.options.category.clone(),
                        ));
                    }
                });
            }
            AppState::Ready(model) => {
                let is_reloading = self.reload_rx.is_some();
                let requested = model.show(ctx, is_reloading);

                if let Some(category) = requested
                    && self.reload_rx.is_none()
                {
                    info!(%category, "switching category");
                    self.options.category = Some(category.clone());
                    self.reload_rx = Some(Self::spawn_load(&self.options.config, Some(category)));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(loaded)) => model.replace_data(loaded),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            if let AppState::Error(error) = &next_state {
                warn!(%error, "load failed");
            }
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
