use eframe::egui::{Color32, Vec2};

use crate::topics::{Record, WindowEntry};

use super::scale::ChartScales;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub record: Record,
    pub slot: usize,
    pub radius: f32,
    pub fill: Color32,
    pub position: Vec2,
    pub velocity: Vec2,
}

pub fn build_nodes(entries: &[WindowEntry<'_>], scales: &ChartScales) -> Vec<Node> {
    entries
        .iter()
        .map(|entry| {
            let frequency = entry.record.frequency;
            let (radius, fill) = scales
                .slot(entry.slot)
                .map(|slot| (slot.radius.radius(frequency), slot.color.color(frequency)))
                .unwrap_or((0.0, Color32::GRAY));
            Node {
                record: entry.record.clone(),
                slot: entry.slot,
                radius,
                fill,
                position: Vec2::ZERO,
                velocity: Vec2::ZERO,
            }
        })
        .collect()
}
