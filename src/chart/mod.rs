mod layout;
mod node;
mod render;
mod scale;
mod search;
mod selection;

use std::collections::HashSet;

use eframe::egui::{Pos2, Vec2};
use tracing::{debug, info};

use crate::config::{LayoutSettings, ScaleSettings};
use crate::error::NavigationBoundaryError;
use crate::topics::{Dataset, TopicId, select_window, window_of};

use layout::{Anchors, LayoutEngine, TickHandle};
use node::{Node, build_nodes};
use render::Scene;
use scale::ChartScales;
use selection::Selection;

pub use layout::TickOutcome;
pub use render::{DrawCommand, render};
pub use search::matching_nodes;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

pub struct Chart {
    dataset: Dataset,
    scale_settings: ScaleSettings,
    engine: LayoutEngine,
    handle: TickHandle,
    cursor: usize,
    viewport: Vec2,
    scales: ChartScales,
    selection: Option<Selection>,
}

impl Chart {
    pub fn new(
        dataset: Dataset,
        scale_settings: ScaleSettings,
        layout_settings: LayoutSettings,
        viewport: Vec2,
        seed: u64,
    ) -> Self {
        let engine = LayoutEngine::new(layout_settings, seed);
        let handle = engine.handle();
        let scales = ChartScales::build(&scale_settings, &[], &[], viewport.x, viewport.y);
        let mut chart = Self {
            dataset,
            scale_settings,
            engine,
            handle,
            cursor: 0,
            viewport,
            scales,
            selection: None,
        };
        chart.rebuild();
        chart
    }

    fn rebuild(&mut self) {
        let entries = select_window(
            &self.dataset.records,
            &self.dataset.periods,
            self.cursor,
            self.scale_settings.top_n,
        );
        self.scales = ChartScales::build(
            &self.scale_settings,
            &entries,
            &self.dataset.records,
            self.viewport.x,
            self.viewport.y,
        );
        let nodes = build_nodes(&entries, &self.scales);
        let anchors = self.anchors();
        self.handle = self.engine.reset(nodes, anchors);
        self.warm_start();

        self.selection = self
            .selection
            .take()
            .and_then(|selection| selection.refresh(self.engine.nodes()));

        info!(
            category = %self.dataset.category,
            cursor = self.cursor,
            nodes = self.engine.nodes().len(),
            "window rebuilt"
        );
    }

    fn warm_start(&mut self) {
        let ticks = self.engine.settings().warm_start_ticks;
        if ticks == 0 {
            return;
        }
        if let Some(frame) = self.engine.relax(self.handle, ticks).last() {
            debug!(
                generation = frame.generation,
                ticks = frame.tick,
                nodes = frame.positions.len(),
                "warm start"
            );
        }
    }

    fn anchors(&self) -> Anchors {
        Anchors {
            slot_x: self.scales.cluster.anchors(),
            center_y: self.viewport.y * 0.5,
            viewport: self.viewport,
        }
    }

    pub fn move_window(&mut self, direction: Direction) -> Result<usize, NavigationBoundaryError> {
        self.cursor = match direction {
            Direction::Prev => self.cursor.checked_sub(1).ok_or(NavigationBoundaryError)?,
            Direction::Next => self.cursor.saturating_add(1),
        };
        self.rebuild();
        Ok(self.cursor)
    }

    /// Selects every node of `topic`; returns `false` (and clears the
    /// selection) when the window has none.
    pub fn select_topic(&mut self, topic: TopicId) -> bool {
        self.selection = Selection::select(self.engine.nodes(), topic);
        debug!(topic, selected = self.selection.is_some(), "select topic");
        self.selection.is_some()
    }

    pub fn deselect_topic(&mut self) {
        if self.selection.take().is_some() {
            debug!("selection cleared");
        }
    }

    pub fn tick(&mut self) -> TickOutcome<'_> {
        self.engine.tick(self.handle)
    }

    pub fn is_settled(&self) -> bool {
        self.engine.is_settled()
    }

    pub fn layout_alpha(&self) -> f32 {
        self.engine.alpha()
    }

    pub fn resize(&mut self, viewport: Vec2) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.scales
            .resize(&self.scale_settings, viewport.x, viewport.y);
        let anchors = self.anchors();
        self.engine.retarget(anchors);
    }

    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.cursor = 0;
        self.selection = None;
        self.rebuild();
    }

    pub fn update_layout_settings(&mut self, settings: LayoutSettings) {
        self.engine.set_settings(settings);
    }

    pub fn scene<'a>(&'a self, highlighted: Option<&'a HashSet<usize>>) -> Scene<'a> {
        Scene {
            nodes: self.engine.nodes(),
            selection: self.selection.as_ref(),
            scales: &self.scales,
            window: self.window(),
            viewport: self.viewport,
            highlighted,
        }
    }

    pub fn display_position(&self, index: usize) -> Option<Pos2> {
        selection::display_position(
            self.engine.nodes(),
            index,
            self.selection.as_ref(),
            &self.scales.sentiment,
        )
    }

    pub fn node_at(&self, point: Pos2) -> Option<usize> {
        render::draw_order(&self.scene(None))
            .into_iter()
            .rev()
            .find(|&index| {
                self.display_position(index).is_some_and(|center| {
                    center.distance(point) <= self.engine.nodes()[index].radius
                })
            })
    }

    pub fn nodes(&self) -> &[Node] {
        self.engine.nodes()
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.engine.nodes().get(index)
    }

    pub fn window(&self) -> &[String] {
        window_of(&self.dataset.periods, self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.engine.generation()
    }
}
