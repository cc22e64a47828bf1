use std::ops::RangeInclusive;

use eframe::egui::{self, RichText, Ui};
use tracing::{info, warn};

use crate::chart::Direction;
use crate::config::{self, LayoutSettings};

use super::super::ViewModel;

fn tuning_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: RangeInclusive<f32>,
    label: &str,
    hint: &str,
) -> bool {
    ui.add(
        egui::Slider::new(value, range)
            .text(label)
            .clamping(egui::SliderClamping::Always),
    )
    .on_hover_text(hint)
    .changed()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Chart Controls");
        ui.separator();
        ui.add_space(4.0);

        self.draw_window_controls(ui);
        ui.separator();

        let selected = self.chart.selection().is_some();
        ui.label("Search (topic words or id)")
            .on_hover_text("Outline matching bubbles without changing the chart.");
        ui.add_enabled(!selected, egui::TextEdit::singleline(&mut self.search))
            .on_disabled_hover_text("Search is paused while a topic is selected.");

        ui.add_space(4.0);
        if ui
            .add_enabled(selected, egui::Button::new("Clear selection"))
            .on_hover_text("Same as double clicking a bubble.")
            .clicked()
        {
            self.chart.deselect_topic();
        }

        ui.separator();
        self.draw_layout_tuning(ui);

        ui.separator();
        if ui
            .button("Save settings")
            .on_hover_text("Write the current layout tuning to the config file.")
            .clicked()
        {
            self.save_settings();
        }
        if let Some(status) = &self.status {
            ui.small(status.as_str());
        }
    }

    fn draw_window_controls(&mut self, ui: &mut Ui) {
        let window = self.chart.window();
        let label = match (window.first(), window.last()) {
            (Some(first), Some(last)) => format!("{first} to {last}"),
            _ => "No periods left".to_string(),
        };
        ui.label(RichText::new(label).strong());
        ui.small(format!(
            "window starts at period {} of {}",
            self.chart.cursor() + 1,
            self.chart.dataset().period_count()
        ));

        ui.horizontal(|ui| {
            if ui.button("Prev").clicked() {
                self.move_window(Direction::Prev);
            }
            if ui.button("Next").clicked() {
                self.move_window(Direction::Next);
            }
        });
    }

    pub(in crate::app) fn move_window(&mut self, direction: Direction) {
        match self.chart.move_window(direction) {
            Ok(cursor) => {
                self.hovered = None;
                info!(cursor, "window moved");
            }
            Err(error) => {
                warn!(%error, "window move rejected");
                self.boundary_notice = true;
            }
        }
    }

    fn draw_layout_tuning(&mut self, ui: &mut Ui) {
        let mut settings = self.layout;
        let mut changed = false;

        ui.collapsing("Layout tuning", |ui| {
            changed |= tuning_slider(
                ui,
                &mut settings.charge_scale,
                0.0..=0.2,
                "Charge",
                "Repulsion per unit of bubble area.",
            );
            changed |= tuning_slider(
                ui,
                &mut settings.x_strength,
                0.0..=0.5,
                "Period pull",
                "How strongly bubbles move toward their period column.",
            );
            changed |= tuning_slider(
                ui,
                &mut settings.y_strength,
                0.0..=0.5,
                "Center pull",
                "How strongly bubbles move toward the horizontal centerline.",
            );
            changed |= tuning_slider(
                ui,
                &mut settings.collision_margin,
                0.0..=20.0,
                "Collision margin",
                "Minimum gap between two bubbles, in pixels.",
            );
            changed |= tuning_slider(
                ui,
                &mut settings.collision_strength,
                0.0..=1.0,
                "Collision strength",
                "Share of an overlap resolved per pass.",
            );
            changed |= ui
                .add(
                    egui::Slider::new(&mut settings.collision_iterations, 1..=8)
                        .text("Collision passes"),
                )
                .on_hover_text("Collision passes per tick.")
                .changed();
            changed |= tuning_slider(
                ui,
                &mut settings.velocity_decay,
                0.0..=0.9,
                "Velocity decay",
                "Fraction of velocity lost every tick.",
            );
            changed |= tuning_slider(
                ui,
                &mut settings.alpha_decay,
                0.001..=0.1,
                "Cooling",
                "How fast the layout cools down and settles.",
            );

            if ui.button("Reset to defaults").clicked() {
                settings = LayoutSettings::default();
                changed = true;
            }
        });

        if changed {
            self.apply_layout_settings(settings);
        }
    }

    fn save_settings(&mut self) {
        self.config.layout = self.layout;
        let result = match &self.config_path {
            Some(path) => config::save_to_path(&self.config, path),
            None => config::save(&self.config),
        };
        self.status = Some(match result {
            Ok(()) => {
                info!("settings saved");
                "Settings saved.".to_string()
            }
            Err(error) => {
                warn!("saving settings failed: {error:#}");
                format!("Could not save settings: {error:#}")
            }
        });
    }
}
