use eframe::egui::{self, RichText, Ui};

use crate::topics::detail_embeds;

use super::super::{Route, ViewModel};

impl ViewModel {
    pub(in crate::app) fn draw_embeds(&mut self, ui: &mut Ui, category: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(12.0);
            if ui.link("Go Back").clicked() {
                self.route = Route::Main;
            }
            ui.add_space(8.0);
            ui.heading(format!("Model outputs for {category}"));
        });
        ui.separator();

        egui::Grid::new("embeds")
            .num_columns(2)
            .spacing([24.0, 10.0])
            .show(ui, |ui| {
                for embed in detail_embeds(&self.config.data_dir, category) {
                    ui.label(RichText::new(embed.title).strong());
                    if embed.path.is_file() {
                        let url = format!("file://{}", absolute(&embed.path).display());
                        ui.hyperlink_to(embed.path.display().to_string(), url);
                    } else {
                        ui.label(
                            RichText::new(format!("missing: {}", embed.path.display())).weak(),
                        );
                    }
                    ui.end_row();
                }
            });
    }
}

fn absolute(path: &std::path::Path) -> std::path::PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
