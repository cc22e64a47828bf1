mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::LayoutSettings;

use super::node::Node;
use forces::{ChargeParams, CollisionParams, accumulate_charge, accumulate_collision_pairs};
use quadtree::QuadNode;

const BARNES_HUT_THETA: f32 = 0.72;
const CHARGE_DISTANCE_MIN_SQ: f32 = 1.0;
const MAX_SPEED: f32 = 48.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Anchors {
    pub slot_x: Vec<f32>,
    pub center_y: f32,
    pub viewport: Vec2,
}

impl Anchors {
    fn target(&self, slot: usize) -> Vec2 {
        let x = self
            .slot_x
            .get(slot)
            .copied()
            .unwrap_or(self.viewport.x * 0.5);
        vec2(x, self.center_y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickHandle {
    generation: u64,
}

#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub generation: u64,
    pub tick: usize,
    pub nodes: &'a [Node],
}

#[derive(Debug)]
pub enum TickOutcome<'a> {
    Advanced(Snapshot<'a>),
    Settled,
    Empty,
    Stale,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PositionFrame {
    pub generation: u64,
    pub tick: usize,
    pub positions: Vec<Vec2>,
}

#[derive(Default)]
struct LayoutScratch {
    positions: Vec<Vec2>,
    charges: Vec<f32>,
    radii: Vec<f32>,
    delta_velocities: Vec<Vec2>,
    corrections: Vec<Vec2>,
}

pub struct LayoutEngine {
    settings: LayoutSettings,
    rng: StdRng,
    nodes: Vec<Node>,
    anchors: Anchors,
    generation: u64,
    ticks: usize,
    alpha: f32,
    energy: f32,
    scratch: LayoutScratch,
}

impl LayoutEngine {
    pub fn new(settings: LayoutSettings, seed: u64) -> Self {
        Self {
            settings: settings.clamped(),
            rng: StdRng::seed_from_u64(seed),
            nodes: Vec::new(),
            anchors: Anchors {
                slot_x: Vec::new(),
                center_y: 0.0,
                viewport: Vec2::ZERO,
            },
            generation: 0,
            ticks: 0,
            alpha: 1.0,
            energy: f32::INFINITY,
            scratch: LayoutScratch::default(),
        }
    }

    pub fn reset(&mut self, nodes: Vec<Node>, anchors: Anchors) -> TickHandle {
        self.generation = self.generation.wrapping_add(1);
        self.nodes = nodes;
        self.anchors = anchors;
        self.ticks = 0;
        self.alpha = 1.0;
        self.energy = f32::INFINITY;

        let width = self.anchors.viewport.x.max(1.0);
        let height = self.anchors.viewport.y.max(1.0);
        for node in &mut self.nodes {
            node.position = vec2(
                self.rng.gen_range(0.0..width),
                self.rng.gen_range(0.0..height),
            );
            node.velocity = Vec2::ZERO;
        }

        debug!(
            generation = self.generation,
            nodes = self.nodes.len(),
            "layout reset"
        );
        self.handle()
    }

    pub fn handle(&self) -> TickHandle {
        TickHandle {
            generation: self.generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn settings(&self) -> LayoutSettings {
        self.settings
    }

    pub fn is_settled(&self) -> bool {
        self.nodes.is_empty()
            || (self.ticks > 0
                && (self.alpha < self.settings.alpha_min
                    || self.energy < self.settings.energy_threshold))
    }

    pub fn tick(&mut self, handle: TickHandle) -> TickOutcome<'_> {
        if handle.generation != self.generation {
            debug!(
                handle = handle.generation,
                current = self.generation,
                "stale layout tick ignored"
            );
            return TickOutcome::Stale;
        }
        if self.nodes.is_empty() {
            return TickOutcome::Empty;
        }
        if self.is_settled() {
            return TickOutcome::Settled;
        }

        self.step();
        TickOutcome::Advanced(Snapshot {
            generation: self.generation,
            tick: self.ticks,
            nodes: &self.nodes,
        })
    }

    pub fn relax(&mut self, handle: TickHandle, max_ticks: usize) -> Relaxation<'_> {
        Relaxation {
            engine: self,
            handle,
            remaining: max_ticks,
        }
    }

    pub fn retarget(&mut self, anchors: Anchors) {
        self.anchors = anchors;
        self.reheat();
    }

    pub fn set_settings(&mut self, settings: LayoutSettings) {
        self.settings = settings.clamped();
        self.reheat();
    }

    pub fn reheat(&mut self) {
        self.alpha = 1.0;
        self.energy = f32::INFINITY;
    }

    fn step(&mut self) {
        let settings = self.settings;
        self.alpha += (0.0 - self.alpha) * settings.alpha_decay;
        let alpha = self.alpha;

        self.load_scratch();
        let scratch = &mut self.scratch;

        scratch.delta_velocities.clear();
        scratch.delta_velocities.resize(self.nodes.len(), Vec2::ZERO);
        if let Some(tree) = QuadNode::build(&scratch.positions, &scratch.charges, &scratch.radii) {
            let params = ChargeParams {
                alpha,
                theta: BARNES_HUT_THETA,
                distance_min_sq: CHARGE_DISTANCE_MIN_SQ,
            };
            for (index, delta_velocity) in scratch.delta_velocities.iter_mut().enumerate() {
                accumulate_charge(
                    &tree,
                    index,
                    &scratch.positions,
                    &scratch.charges,
                    params,
                    delta_velocity,
                );
            }
        }

        let retention = 1.0 - settings.velocity_decay;
        let mut energy = 0.0;
        for (node, delta_velocity) in self.nodes.iter_mut().zip(&scratch.delta_velocities) {
            let target = self.anchors.target(node.slot);
            let pull = vec2(
                (target.x - node.position.x) * settings.x_strength,
                (target.y - node.position.y) * settings.y_strength,
            ) * alpha;

            let mut velocity = (node.velocity + *delta_velocity + pull) * retention;
            let speed_sq = velocity.length_sq();
            if speed_sq > MAX_SPEED * MAX_SPEED {
                velocity *= MAX_SPEED / speed_sq.sqrt();
            }

            node.position += velocity;
            node.velocity = velocity;
            if !node.position.is_finite() || !node.velocity.is_finite() {
                node.position = target;
                node.velocity = Vec2::ZERO;
            }
            energy += node.velocity.length_sq();
        }

        self.resolve_collisions();

        self.energy = energy;
        self.ticks += 1;
    }

    fn load_scratch(&mut self) {
        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.charges.clear();
        scratch.radii.clear();
        for node in &self.nodes {
            scratch.positions.push(node.position);
            scratch
                .charges
                .push(node_charge(&self.settings, node.radius));
            scratch.radii.push(node.radius);
        }
    }

    fn resolve_collisions(&mut self) {
        let params = CollisionParams {
            margin: self.settings.collision_margin,
            strength: self.settings.collision_strength,
        };

        for _ in 0..self.settings.collision_iterations {
            self.load_scratch();
            let scratch = &mut self.scratch;
            let Some(tree) =
                QuadNode::build(&scratch.positions, &scratch.charges, &scratch.radii)
            else {
                return;
            };

            scratch.corrections.clear();
            scratch.corrections.resize(self.nodes.len(), Vec2::ZERO);
            accumulate_collision_pairs(
                &tree,
                &tree,
                true,
                &scratch.positions,
                &scratch.radii,
                params,
                &mut scratch.corrections,
            );

            for (node, correction) in self.nodes.iter_mut().zip(&scratch.corrections) {
                if correction.is_finite() {
                    node.position += *correction;
                }
            }
        }
    }
}

fn node_charge(settings: &LayoutSettings, radius: f32) -> f32 {
    settings.charge_scale * radius * radius + settings.charge_base
}

pub struct Relaxation<'a> {
    engine: &'a mut LayoutEngine,
    handle: TickHandle,
    remaining: usize,
}

impl Iterator for Relaxation<'_> {
    type Item = PositionFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        match self.engine.tick(self.handle) {
            TickOutcome::Advanced(snapshot) => Some(PositionFrame {
                generation: snapshot.generation,
                tick: snapshot.tick,
                positions: snapshot.nodes.iter().map(|node| node.position).collect(),
            }),
            TickOutcome::Settled | TickOutcome::Empty | TickOutcome::Stale => None,
        }
    }
}
