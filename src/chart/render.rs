use std::collections::HashSet;

use eframe::egui::{Align2, Color32, Pos2, Stroke, Vec2, pos2};

use super::node::Node;
use super::scale::ChartScales;
use super::selection::{Selection, arc_points, display_position};

const AXIS_X: f32 = 40.0;
const PERIOD_AXIS_OFFSET: f32 = 50.0;
const SENTIMENT_LABEL_TICKS: usize = 2;
const SENTIMENT_GRID_TICKS: usize = 10;
const TITLE_OFFSET: Vec2 = Vec2::new(-90.0, 80.0);
const TICK_LENGTH: f32 = 6.0;

const AXIS_COLOR: Color32 = Color32::from_rgb(200, 204, 210);
const GRID_COLOR: Color32 = Color32::from_rgba_premultiplied(60, 70, 80, 70);
const LINK_COLOR: Color32 = Color32::from_rgb(246, 206, 104);
const LABEL_COLOR: Color32 = Color32::from_rgb(24, 24, 24);
const OUTLINE_COLOR: Color32 = Color32::from_rgb(40, 40, 40);
const MATCH_COLOR: Color32 = Color32::from_rgb(106, 198, 255);

#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub nodes: &'a [Node],
    pub selection: Option<&'a Selection>,
    pub scales: &'a ChartScales,
    pub window: &'a [String],
    pub viewport: Vec2,
    pub highlighted: Option<&'a HashSet<usize>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Pos2,
        to: Pos2,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<Pos2>,
        stroke: Stroke,
    },
    Circle {
        node: usize,
        center: Pos2,
        radius: f32,
        fill: Color32,
        stroke: Stroke,
    },
    Text {
        position: Pos2,
        anchor: Align2,
        text: String,
        size: f32,
        color: Color32,
    },
}

pub fn render(scene: &Scene<'_>) -> Vec<DrawCommand> {
    let mut commands = Vec::new();

    if scene.selection.is_some() {
        sentiment_axis(scene, &mut commands);
    }
    period_axis(scene, &mut commands);
    links(scene, &mut commands);

    let order = draw_order(scene);
    let highlighted = scene.highlighted.filter(|_| scene.selection.is_none());
    for &index in &order {
        let Some(center) = position_of(scene, index) else {
            continue;
        };
        let node = &scene.nodes[index];
        let stroke = if highlighted.is_some_and(|matches| matches.contains(&index)) {
            Stroke::new(3.0, MATCH_COLOR)
        } else {
            Stroke::new(0.5, OUTLINE_COLOR)
        };
        commands.push(DrawCommand::Circle {
            node: index,
            center,
            radius: node.radius,
            fill: node.fill,
            stroke,
        });
    }

    for &index in &order {
        let Some(center) = position_of(scene, index) else {
            continue;
        };
        commands.push(DrawCommand::Text {
            position: center,
            anchor: Align2::CENTER_CENTER,
            text: scene.nodes[index].record.topic.to_string(),
            size: 13.0,
            color: LABEL_COLOR,
        });
    }

    commands
}

pub fn draw_order(scene: &Scene<'_>) -> Vec<usize> {
    let mut order = (0..scene.nodes.len()).collect::<Vec<_>>();
    order.sort_by(|a, b| scene.nodes[*b].radius.total_cmp(&scene.nodes[*a].radius));
    order
}

fn position_of(scene: &Scene<'_>, index: usize) -> Option<Pos2> {
    display_position(
        scene.nodes,
        index,
        scene.selection,
        &scene.scales.sentiment,
    )
}

fn sentiment_axis(scene: &Scene<'_>, commands: &mut Vec<DrawCommand>) {
    let sentiment = &scene.scales.sentiment;
    let grid_right = (scene.viewport.x - 100.0 + AXIS_X).max(AXIS_X);

    for tick in sentiment.ticks(SENTIMENT_GRID_TICKS) {
        commands.push(DrawCommand::Line {
            from: pos2(AXIS_X, tick.position),
            to: pos2(grid_right, tick.position),
            stroke: Stroke::new(1.0, GRID_COLOR),
        });
    }

    let (top, bottom) = (sentiment.y(1.0), sentiment.y(-1.0));
    commands.push(DrawCommand::Line {
        from: pos2(AXIS_X, top),
        to: pos2(AXIS_X, bottom),
        stroke: Stroke::new(1.0, AXIS_COLOR),
    });
    for tick in sentiment.ticks(SENTIMENT_LABEL_TICKS) {
        commands.push(DrawCommand::Line {
            from: pos2(AXIS_X - TICK_LENGTH, tick.position),
            to: pos2(AXIS_X, tick.position),
            stroke: Stroke::new(1.0, AXIS_COLOR),
        });
        commands.push(DrawCommand::Text {
            position: pos2(AXIS_X - TICK_LENGTH - 3.0, tick.position),
            anchor: Align2::RIGHT_CENTER,
            text: tick.label,
            size: 12.0,
            color: AXIS_COLOR,
        });
    }

    commands.push(DrawCommand::Text {
        position: pos2(scene.viewport.x * 0.5, 0.0) + TITLE_OFFSET,
        anchor: Align2::LEFT_BOTTOM,
        text: "Sentiment Scale".to_string(),
        size: 20.0,
        color: AXIS_COLOR,
    });
}

fn period_axis(scene: &Scene<'_>, commands: &mut Vec<DrawCommand>) {
    let y = scene.viewport.y - PERIOD_AXIS_OFFSET;
    let (start, stop) = scene.scales.cluster.range();
    commands.push(DrawCommand::Line {
        from: pos2(start, y),
        to: pos2(stop, y),
        stroke: Stroke::new(1.0, AXIS_COLOR),
    });

    for tick in scene.scales.cluster.ticks(scene.window) {
        commands.push(DrawCommand::Line {
            from: pos2(tick.position, y),
            to: pos2(tick.position, y + TICK_LENGTH),
            stroke: Stroke::new(1.0, AXIS_COLOR),
        });
        if tick.label.is_empty() {
            continue;
        }
        commands.push(DrawCommand::Text {
            position: pos2(tick.position, y + TICK_LENGTH + 3.0),
            anchor: Align2::CENTER_TOP,
            text: tick.label,
            size: 16.0,
            color: AXIS_COLOR,
        });
    }
}

fn links(scene: &Scene<'_>, commands: &mut Vec<DrawCommand>) {
    let Some(selection) = scene.selection else {
        return;
    };

    for link in selection.links() {
        let (Some(from), Some(to)) = (
            position_of(scene, link.source),
            position_of(scene, link.target),
        ) else {
            continue;
        };
        commands.push(DrawCommand::Polyline {
            points: arc_points(from, to),
            stroke: Stroke::new(2.0, LINK_COLOR),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    use crate::config::ScaleSettings;
    use crate::topics::{periods, select_window, test_record};

    use super::super::node::build_nodes;

    struct Fixture {
        nodes: Vec<Node>,
        scales: ChartScales,
        window: Vec<String>,
    }

    fn fixture() -> Fixture {
        let records = vec![
            test_record(7, "Jan", 40.0, 0.4),
            test_record(3, "Jan", 5.0, -0.1),
            test_record(7, "Feb", 12.0, -0.6),
            test_record(2, "Mar", 9.0, 0.2),
        ];
        let periods = periods(&records);
        let entries = select_window(&records, &periods, 0, 20);
        let settings = ScaleSettings::default();
        let scales = ChartScales::build(&settings, &entries, &records, 960.0, 640.0);
        let mut nodes = build_nodes(&entries, &scales);
        for (index, node) in nodes.iter_mut().enumerate() {
            node.position = vec2(100.0 + index as f32 * 150.0, 320.0);
        }
        Fixture {
            nodes,
            scales,
            window: periods,
        }
    }

    fn scene<'a>(fixture: &'a Fixture, selection: Option<&'a Selection>) -> Scene<'a> {
        Scene {
            nodes: &fixture.nodes,
            selection,
            scales: &fixture.scales,
            window: &fixture.window,
            viewport: vec2(960.0, 640.0),
            highlighted: None,
        }
    }

    fn circles(commands: &[DrawCommand]) -> Vec<usize> {
        commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Circle { node, .. } => Some(*node),
                _ => None,
            })
            .collect()
    }

    fn has_text(commands: &[DrawCommand], needle: &str) -> bool {
        commands
            .iter()
            .any(|command| matches!(command, DrawCommand::Text { text, .. } if text == needle))
    }

    #[test]
    fn idle_scene_draws_period_axis_and_every_bubble() {
        let fixture = fixture();
        let commands = render(&scene(&fixture, None));

        assert_eq!(circles(&commands).len(), fixture.nodes.len());
        assert!(has_text(&commands, "Jan"));
        assert!(has_text(&commands, "Mar"));
        assert!(!has_text(&commands, "Sentiment Scale"));
        assert!(
            !commands
                .iter()
                .any(|command| matches!(command, DrawCommand::Polyline { .. }))
        );
    }

    #[test]
    fn larger_bubbles_are_drawn_first() {
        let fixture = fixture();
        let commands = render(&scene(&fixture, None));
        let radii = circles(&commands)
            .into_iter()
            .map(|index| fixture.nodes[index].radius)
            .collect::<Vec<_>>();

        assert!(radii.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn selection_adds_axis_links_and_hides_other_topics() {
        let fixture = fixture();
        let selection = Selection::select(&fixture.nodes, 7).expect("topic 7");
        let commands = render(&scene(&fixture, Some(&selection)));

        let mut drawn = circles(&commands);
        drawn.sort_unstable();
        assert_eq!(drawn, selection.members());
        assert!(has_text(&commands, "Sentiment Scale"));
        assert!(has_text(&commands, "-1"));
        assert_eq!(
            commands
                .iter()
                .filter(|command| matches!(command, DrawCommand::Polyline { .. }))
                .count(),
            1
        );

        let axis_index = commands
            .iter()
            .position(|command| matches!(command, DrawCommand::Text { text, .. } if text == "Sentiment Scale"))
            .expect("title");
        let first_circle = commands
            .iter()
            .position(|command| matches!(command, DrawCommand::Circle { .. }))
            .expect("circle");
        assert!(axis_index < first_circle);
    }

    #[test]
    fn search_matches_are_outlined_only_without_selection() {
        let fixture = fixture();
        let matches = HashSet::from([1]);
        let mut idle = scene(&fixture, None);
        idle.highlighted = Some(&matches);

        let outlined = render(&idle).into_iter().any(|command| {
            matches!(command, DrawCommand::Circle { node: 1, stroke, .. } if stroke.color == MATCH_COLOR)
        });
        assert!(outlined);

        let selection = Selection::select(&fixture.nodes, 3).expect("topic 3");
        let mut selected = scene(&fixture, Some(&selection));
        selected.highlighted = Some(&matches);
        let outlined = render(&selected).into_iter().any(|command| {
            matches!(command, DrawCommand::Circle { stroke, .. } if stroke.color == MATCH_COLOR)
        });
        assert!(!outlined);
    }
}
