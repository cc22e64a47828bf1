use std::collections::HashSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::node::Node;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

pub fn matching_nodes(nodes: &[Node], query: &str) -> HashSet<usize> {
    let query = query.trim();
    if query.is_empty() {
        return HashSet::new();
    }

    let topic_query = query.parse::<i64>().ok();
    let matcher = SkimMatcherV2::default();
    nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| {
            topic_query == Some(node.record.topic)
                || fuzzy_match_score(&matcher, &node.record.words, query).is_some()
        })
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{Color32, Vec2};

    use crate::topics::Record;

    fn node(topic: i64, words: &str) -> Node {
        Node {
            record: Record {
                topic,
                timestamp: "2024-01".to_string(),
                frequency: 1.0,
                sentiment: 0.0,
                words: words.to_string(),
            },
            slot: 0,
            radius: 5.0,
            fill: Color32::RED,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
        }
    }

    #[test]
    fn matches_words_fuzzily_and_ignoring_case() {
        let nodes = vec![
            node(1, "election, vote, ballot"),
            node(2, "gpu, chip, nvidia"),
            node(3, "Voters, Turnout"),
        ];

        let matches = matching_nodes(&nodes, "VOTE");

        assert!(matches.contains(&0));
        assert!(matches.contains(&2));
        assert!(!matches.contains(&1));
    }

    #[test]
    fn numeric_query_matches_topic_id() {
        let nodes = vec![node(12, "alpha"), node(4, "beta")];

        assert_eq!(matching_nodes(&nodes, "4"), HashSet::from([1]));
    }

    #[test]
    fn blank_query_matches_nothing() {
        let nodes = vec![node(1, "alpha")];
        assert!(matching_nodes(&nodes, "   ").is_empty());
    }
}
