use std::collections::HashSet;

use super::window::periods;

pub type TopicId = i64;

#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub topic: TopicId,
    pub timestamp: String,
    pub frequency: f64,
    pub sentiment: f64,
    pub words: String,
}

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub category: String,
    pub records: Vec<Record>,
    pub periods: Vec<String>,
}

impl Dataset {
    pub fn new(category: impl Into<String>, records: Vec<Record>) -> Self {
        let periods = periods(&records);
        Self {
            category: category.into(),
            records,
            periods,
        }
    }

    pub fn topic_count(&self) -> usize {
        self.records
            .iter()
            .map(|record| record.topic)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn period_count(&self) -> usize {
        self.periods.len()
    }
}

#[cfg(test)]
pub(crate) fn test_record(topic: TopicId, timestamp: &str, frequency: f64, sentiment: f64) -> Record {
    Record {
        topic,
        timestamp: timestamp.to_string(),
        frequency,
        sentiment,
        words: format!("topic_{topic}"),
    }
}
