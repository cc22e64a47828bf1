use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::chart::Chart;
use crate::config::LayoutSettings;

use super::super::{LaunchOptions, LoadedData, Route, ViewModel};

const INITIAL_VIEWPORT: Vec2 = Vec2::new(960.0, 640.0);

const USAGE_HINT: &str = "Single click to select a node. Double click to unselect.\n\
Selecting a node shows the sentiments associated with that topic; links connect \
the topic across time.\n\
The model outputs are listed under 'Interactive Infographics'.";

impl ViewModel {
    pub(in crate::app) fn new(loaded: LoadedData, options: &LaunchOptions) -> Self {
        let LoadedData {
            categories,
            dataset,
        } = loaded;
        let category = dataset.category.clone();
        let layout = options.config.layout.clamped();
        let chart = Chart::new(
            dataset,
            options.config.scale.clone(),
            layout,
            INITIAL_VIEWPORT,
            options.seed,
        );

        Self {
            chart,
            categories,
            category,
            config: options.config.clone(),
            config_path: options.config_path.clone(),
            layout,
            route: options.route.clone(),
            search: String::new(),
            search_match_cache: None,
            hovered: None,
            boundary_notice: false,
            status: None,
        }
    }

    pub(in crate::app) fn replace_data(&mut self, loaded: LoadedData) {
        self.categories = loaded.categories;
        self.category = loaded.dataset.category.clone();
        if let Route::Detail { category } = &mut self.route {
            category.clone_from(&self.category);
        }
        self.chart.set_dataset(loaded.dataset);
        self.search_match_cache = None;
        self.hovered = None;
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, is_loading: bool) -> Option<String> {
        let mut requested_category = None;

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Glance: Topic Modeling over Time");
                    ui.separator();
                    ui.label("Choose a subreddit");
                    let mut chosen = self.category.clone();
                    ui.add_enabled_ui(!is_loading, |ui| {
                        egui::ComboBox::from_id_salt("category")
                            .selected_text(chosen.as_str())
                            .show_ui(ui, |ui| {
                                for category in &self.categories {
                                    ui.selectable_value(&mut chosen, category.clone(), category.as_str());
                                }
                            });
                    });
                    if chosen != self.category {
                        self.category = chosen.clone();
                        requested_category = Some(chosen);
                    }
                    ui.label("ⓘ").on_hover_text(USAGE_HINT);

                    match &self.route {
                        Route::Main => {
                            if ui.link("Interactive Infographics").clicked() {
                                self.route = Route::Detail {
                                    category: self.category.clone(),
                                };
                            }
                        }
                        Route::Detail { .. } => {
                            if ui.link("Go Back").clicked() {
                                self.route = Route::Main;
                            }
                        }
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if is_loading {
                            ui.spinner();
                        }
                        ui.label(self.chart_summary());
                    });
                });
            });

        match self.route.clone() {
            Route::Main => {
                egui::SidePanel::left("controls")
                    .resizable(true)
                    .default_width(300.0)
                    .show(ctx, |ui| self.draw_controls(ui));

                egui::SidePanel::right("details")
                    .resizable(true)
                    .default_width(320.0)
                    .show(ctx, |ui| self.draw_details(ui));

                egui::CentralPanel::default().show(ctx, |ui| self.draw_chart(ui));
            }
            Route::Detail { category } => {
                egui::CentralPanel::default().show(ctx, |ui| self.draw_embeds(ui, &category));
            }
        }

        self.draw_boundary_notice(ctx);
        requested_category
    }

    fn chart_summary(&self) -> String {
        let dataset = self.chart.dataset();
        format!(
            "{} records | {} periods | {} topics | path {} | {}",
            dataset.records.len(),
            dataset.period_count(),
            dataset.topic_count(),
            self.route,
            if self.chart.is_settled() {
                "settled".to_string()
            } else {
                format!("relaxing (alpha {:.2})", self.chart.layout_alpha())
            }
        )
    }

    fn draw_boundary_notice(&mut self, ctx: &Context) {
        if !self.boundary_notice {
            return;
        }

        let mut acknowledged = false;
        let modal = egui::Modal::new(egui::Id::new("boundary_notice")).show(ctx, |ui| {
            ui.heading("Cannot go back");
            ui.add_space(6.0);
            ui.label("The chart already shows the first period.");
            ui.add_space(10.0);
            acknowledged = ui.button("OK").clicked();
        });
        if acknowledged || modal.should_close() {
            self.boundary_notice = false;
        }
    }

    pub(in crate::app) fn apply_layout_settings(&mut self, settings: LayoutSettings) {
        self.layout = settings.clamped();
        self.chart.update_layout_settings(self.layout);
    }
}
