use eframe::egui::{Pos2, Vec2, pos2, vec2};

use crate::topics::TopicId;

use super::node::Node;
use super::scale::SentimentScale;

const ARC_SEGMENTS: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
}

/// One selected topic. Members keep node order; every other node is hidden
/// while the selection lasts. Engine positions are never touched: the
/// sentiment placement is applied when positions are read for display.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    topic: TopicId,
    members: Vec<usize>,
    links: Vec<Link>,
}

impl Selection {
    pub fn select(nodes: &[Node], topic: TopicId) -> Option<Self> {
        let members = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.record.topic == topic)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        if members.is_empty() {
            return None;
        }

        let links = members
            .windows(2)
            .map(|pair| Link {
                source: pair[0],
                target: pair[1],
            })
            .collect();

        Some(Self {
            topic,
            members,
            links,
        })
    }

    pub fn refresh(&self, nodes: &[Node]) -> Option<Self> {
        Self::select(nodes, self.topic)
    }

    pub fn topic(&self) -> TopicId {
        self.topic
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.binary_search(&index).is_ok()
    }
}

pub fn display_position(
    nodes: &[Node],
    index: usize,
    selection: Option<&Selection>,
    sentiment: &SentimentScale,
) -> Option<Pos2> {
    let node = nodes.get(index)?;
    match selection {
        None => Some(node.position.to_pos2()),
        Some(selection) if selection.contains(index) => {
            Some(pos2(node.position.x, sentiment.y(node.record.sentiment)))
        }
        Some(_) => None,
    }
}

/// Tessellated circular arc from `from` to `to` whose radius equals the
/// chord length, bending clockwise on a y-down canvas.
pub fn arc_points(from: Pos2, to: Pos2) -> Vec<Pos2> {
    let chord = to - from;
    let distance = chord.length();
    if distance < 1e-3 || !distance.is_finite() {
        return vec![from, to];
    }

    let midpoint = from + chord * 0.5;
    let normal = vec2(-chord.y, chord.x) / distance;
    let center = midpoint + normal * (distance * 3.0_f32.sqrt() * 0.5);

    let start = (from - center).angle();
    let end = (to - center).angle();
    let sweep = (end - start).rem_euclid(std::f32::consts::TAU);

    let mut points = Vec::with_capacity(ARC_SEGMENTS + 1);
    points.push(from);
    for segment in 1..ARC_SEGMENTS {
        let angle = start + sweep * (segment as f32 / ARC_SEGMENTS as f32);
        points.push(center + Vec2::angled(angle) * distance);
    }
    points.push(to);
    points
}
