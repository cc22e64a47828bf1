use eframe::egui::{self, RichText, Ui};

use crate::topics::Record;
use crate::util::{format_frequency, short_words};

use super::super::ViewModel;

const WORDS_PREVIEW_CHARS: usize = 60;

fn occurrence_row(ui: &mut Ui, record: &Record, in_window: bool) {
    let period = if in_window {
        RichText::new(record.timestamp.as_str()).strong()
    } else {
        RichText::new(record.timestamp.as_str()).weak()
    };
    ui.label(period);
    ui.label(format_frequency(record.frequency));
    ui.label(format!("{:.2}", record.sentiment));
    ui.end_row();
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Topic Details");
        ui.add_space(6.0);

        let Some(selection) = self.chart.selection() else {
            match self.hovered.and_then(|index| self.chart.node(index)) {
                Some(node) => {
                    ui.label(RichText::new(format!("Topic {}", node.record.topic)).strong());
                    ui.label(short_words(&node.record.words, WORDS_PREVIEW_CHARS));
                    ui.small("Click to trace this topic across the window.");
                }
                None => {
                    ui.label("Single click a bubble to select its topic.");
                }
            }
            return;
        };

        let topic = selection.topic();
        let window = self.chart.window();
        let dataset = self.chart.dataset();
        let history = dataset
            .records
            .iter()
            .filter(|record| record.topic == topic)
            .collect::<Vec<_>>();

        ui.label(RichText::new(format!("Topic {topic}")).strong());
        if let Some(words) = history.first().map(|record| record.words.as_str()) {
            ui.label(words);
        }
        ui.add_space(4.0);
        ui.label(format!(
            "{} occurrences in view, {} links, {} periods overall",
            selection.members().len(),
            selection.links().len(),
            history.len()
        ));

        ui.separator();
        ui.label(RichText::new("Occurrences").strong());
        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .show(ui, |ui| {
                egui::Grid::new("topic_occurrences")
                    .num_columns(3)
                    .striped(true)
                    .show(ui, |ui| {
                        ui.label(RichText::new("Period").underline());
                        ui.label(RichText::new("Frequency").underline());
                        ui.label(RichText::new("Sentiment").underline());
                        ui.end_row();
                        for record in &history {
                            occurrence_row(ui, record, window.contains(&record.timestamp));
                        }
                    });
            });

        ui.add_space(6.0);
        ui.small("Double click a bubble to unselect.");
    }
}
