use eframe::egui::{self, Color32, FontId, Painter, Rect, Sense, Shape, Ui};
use tracing::trace;

use crate::chart::{DrawCommand, TickOutcome, matching_nodes, render};
use crate::util::{format_frequency, short_words};

use super::super::render_utils::{blend_color, chart_to_screen, circle_visible, draw_background};
use super::super::{SearchMatchCache, ViewModel};

const TOOLTIP_WORDS_CHARS: usize = 80;

fn paint_command(painter: &Painter, rect: Rect, command: DrawCommand, hovered: Option<usize>) {
    match command {
        DrawCommand::Line { from, to, stroke } => {
            painter.line_segment(
                [chart_to_screen(rect, from), chart_to_screen(rect, to)],
                stroke,
            );
        }
        DrawCommand::Polyline { points, stroke } => {
            let points = points
                .into_iter()
                .map(|point| chart_to_screen(rect, point))
                .collect::<Vec<_>>();
            painter.add(Shape::line(points, stroke));
        }
        DrawCommand::Circle {
            node,
            center,
            radius,
            fill,
            stroke,
        } => {
            let center = chart_to_screen(rect, center);
            if !circle_visible(rect, center, radius) {
                return;
            }
            let fill = if hovered == Some(node) {
                blend_color(fill, Color32::WHITE, 0.35)
            } else {
                fill
            };
            painter.circle(center, radius, fill, stroke);
        }
        DrawCommand::Text {
            position,
            anchor,
            text,
            size,
            color,
        } => {
            painter.text(
                chart_to_screen(rect, position),
                anchor,
                text,
                FontId::proportional(size),
                color,
            );
        }
    }
}

impl ViewModel {
    fn refresh_search_matches(&mut self) -> bool {
        if self.chart.selection().is_some() {
            return false;
        }

        let query = self.search.trim();
        if query.is_empty() {
            return false;
        }

        let generation = self.chart.generation();
        let stale = self
            .search_match_cache
            .as_ref()
            .is_none_or(|cached| cached.generation != generation || cached.query != query);
        if stale {
            self.search_match_cache = Some(SearchMatchCache {
                query: query.to_owned(),
                generation,
                matches: matching_nodes(self.chart.nodes(), query),
            });
        }
        true
    }

    pub(in crate::app) fn draw_chart(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        self.chart.resize(rect.size());
        if let TickOutcome::Advanced(snapshot) = self.chart.tick() {
            trace!(generation = snapshot.generation, tick = snapshot.tick, "layout tick");
        }
        if !self.chart.is_settled() {
            ui.ctx().request_repaint();
        }

        self.hovered = self.hovered_node(ui, rect);
        self.handle_chart_clicks(&response);

        if self.chart.nodes().is_empty() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No topics in this window.",
                FontId::proportional(18.0),
                Color32::from_gray(170),
            );
        }

        let hovered = self.hovered;
        let highlighted = if self.refresh_search_matches() {
            self.search_match_cache.as_ref().map(|cached| &cached.matches)
        } else {
            None
        };
        let commands = render(&self.chart.scene(highlighted));
        for command in commands {
            paint_command(&painter, rect, command, hovered);
        }

        let Some(node) = hovered.and_then(|index| self.chart.node(index)) else {
            return;
        };
        ui.output_mut(|output| {
            output.cursor_icon = egui::CursorIcon::PointingHand;
        });
        let record = &node.record;
        response.on_hover_ui_at_pointer(|ui| {
            ui.strong(format!("Topic: {}", record.topic));
            ui.label(short_words(&record.words, TOOLTIP_WORDS_CHARS));
            ui.label(format!("Sentiment: {:.2}", record.sentiment));
            ui.label(format!("Frequency: {}", format_frequency(record.frequency)));
        });
    }
}
