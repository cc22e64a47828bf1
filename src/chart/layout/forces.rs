use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) alpha: f32,
    pub(super) theta: f32,
    pub(super) distance_min_sq: f32,
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) margin: f32,
    pub(super) strength: f32,
}

fn jiggle_direction(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

fn charge_push(delta: Vec2, charge: f32, params: ChargeParams) -> Vec2 {
    let distance_sq = delta.length_sq().max(params.distance_min_sq);
    delta * (charge * params.alpha / distance_sq)
}

pub(super) fn accumulate_charge(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    charges: &[f32],
    params: ChargeParams,
    delta_velocity: &mut Vec2,
) {
    if node.charge <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            let mut delta = point - positions[other];
            if delta.length_sq() < 1e-8 {
                delta = jiggle_direction(index, other);
            }
            *delta_velocity += charge_push(delta, charges[other], params);
        }
        return;
    }

    let delta = point - node.center_of_charge;
    let distance = delta.length().max(1e-4);
    let can_approximate = !node.bounds.contains(point)
        && (node.bounds.side_length() / distance) < params.theta;

    if can_approximate {
        *delta_velocity += charge_push(delta, node.charge, params);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge(child, index, positions, charges, params, delta_velocity);
    }
}

fn resolve_pair(
    from: usize,
    to: usize,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    corrections: &mut [Vec2],
) {
    let separation = radii[from] + radii[to] + params.margin;
    let delta = positions[from] - positions[to];
    let distance_sq = delta.length_sq();
    if distance_sq >= separation * separation {
        return;
    }

    let distance = distance_sq.sqrt();
    let direction = if distance > 1e-4 {
        delta / distance
    } else {
        jiggle_direction(from, to)
    };

    let overlap = (separation - distance) * params.strength;
    let area_from = radii[from] * radii[from];
    let area_to = radii[to] * radii[to];
    let share_from = if area_from + area_to > f32::EPSILON {
        area_to / (area_from + area_to)
    } else {
        0.5
    };

    corrections[from] += direction * (overlap * share_from);
    corrections[to] -= direction * (overlap * (1.0 - share_from));
}

pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    corrections: &mut [Vec2],
) {
    let reach = node_a.max_radius + node_b.max_radius + params.margin;
    if node_a.bounds.distance_sq_to(node_b.bounds) > reach * reach {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    resolve_pair(from, to, positions, radii, params, corrections);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    resolve_pair(from, to, positions, radii, params, corrections);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_deref() else {
                continue;
            };

            accumulate_collision_pairs(
                child_a,
                child_a,
                true,
                positions,
                radii,
                params,
                corrections,
            );

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_deref() else {
                    continue;
                };
                accumulate_collision_pairs(
                    child_a,
                    child_b,
                    false,
                    positions,
                    radii,
                    params,
                    corrections,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            accumulate_collision_pairs(
                child,
                node_b,
                false,
                positions,
                radii,
                params,
                corrections,
            );
        }
    } else {
        for child in node_b.children.iter().flatten() {
            accumulate_collision_pairs(
                node_a,
                child,
                false,
                positions,
                radii,
                params,
                corrections,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHARGE: ChargeParams = ChargeParams {
        alpha: 1.0,
        theta: 0.72,
        distance_min_sq: 1.0,
    };

    #[test]
    fn charge_pushes_nodes_apart() {
        let positions = vec![vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let charges = vec![5.0, 5.0];
        let tree = QuadNode::build(&positions, &charges, &[1.0, 1.0]).expect("tree");

        let mut left = Vec2::ZERO;
        accumulate_charge(&tree, 0, &positions, &charges, CHARGE, &mut left);
        let mut right = Vec2::ZERO;
        accumulate_charge(&tree, 1, &positions, &charges, CHARGE, &mut right);

        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
        assert!((left.x + right.x).abs() < 1e-5);
        assert!((left.x + 0.5).abs() < 1e-5);
    }

    #[test]
    fn approximation_stays_close_to_exact_sum() {
        let mut positions = vec![vec2(-400.0, 0.0)];
        for index in 0..30 {
            positions.push(vec2(
                200.0 + (index % 6) as f32 * 12.0,
                (index / 6) as f32 * 12.0,
            ));
        }
        let charges = vec![2.0; positions.len()];
        let radii = vec![1.0; positions.len()];
        let tree = QuadNode::build(&positions, &charges, &radii).expect("tree");

        let mut approximate = Vec2::ZERO;
        accumulate_charge(&tree, 0, &positions, &charges, CHARGE, &mut approximate);
        let exact = positions[1..]
            .iter()
            .fold(Vec2::ZERO, |sum, other| {
                sum + charge_push(positions[0] - *other, 2.0, CHARGE)
            });

        assert!((approximate - exact).length() / exact.length() < 0.05);
    }

    #[test]
    fn collisions_move_smaller_bubble_further() {
        let positions = vec![vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let radii = vec![20.0, 5.0];
        let tree = QuadNode::build(&positions, &[1.0, 1.0], &radii).expect("tree");
        let mut corrections = vec![Vec2::ZERO; 2];

        accumulate_collision_pairs(
            &tree,
            &tree,
            true,
            &positions,
            &radii,
            CollisionParams {
                margin: 0.0,
                strength: 1.0,
            },
            &mut corrections,
        );

        assert!(corrections[0].x < 0.0);
        assert!(corrections[1].x > 0.0);
        assert!(corrections[1].x > corrections[0].x.abs());
        let total = corrections[1].x - corrections[0].x;
        assert!((total - 15.0).abs() < 1e-4);
    }

    #[test]
    fn separated_bubbles_are_left_alone() {
        let positions = vec![vec2(0.0, 0.0), vec2(100.0, 0.0)];
        let radii = vec![20.0, 5.0];
        let tree = QuadNode::build(&positions, &[1.0, 1.0], &radii).expect("tree");
        let mut corrections = vec![Vec2::ZERO; 2];

        accumulate_collision_pairs(
            &tree,
            &tree,
            true,
            &positions,
            &radii,
            CollisionParams {
                margin: 2.0,
                strength: 1.0,
            },
            &mut corrections,
        );

        assert!(corrections.iter().all(|correction| *correction == Vec2::ZERO));
    }
}
