use eframe::egui::{self, Rect, Ui};

use super::super::ViewModel;
use super::super::render_utils::screen_to_chart;

impl ViewModel {
    pub(in crate::app) fn hovered_node(&self, ui: &Ui, rect: Rect) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }
        self.chart.node_at(screen_to_chart(rect, pointer))
    }

    pub(in crate::app) fn handle_chart_clicks(&mut self, response: &egui::Response) {
        if response.double_clicked() {
            self.chart.deselect_topic();
            return;
        }

        if !response.clicked_by(egui::PointerButton::Primary) || self.chart.selection().is_some() {
            return;
        }

        let Some(topic) = self
            .hovered
            .and_then(|index| self.chart.node(index))
            .map(|node| node.record.topic)
        else {
            return;
        };
        self.chart.select_topic(topic);
    }
}
