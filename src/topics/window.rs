use std::collections::{HashMap, HashSet};

use super::record::Record;

pub const N_MAX: usize = 20;
pub const WINDOW_SPAN: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowEntry<'a> {
    pub record: &'a Record,
    pub slot: usize,
}

pub fn periods(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for record in records {
        if seen.insert(record.timestamp.as_str()) {
            ordered.push(record.timestamp.clone());
        }
    }
    ordered
}

pub fn window_of(periods: &[String], cursor: usize) -> &[String] {
    let start = cursor.min(periods.len());
    let end = cursor.saturating_add(WINDOW_SPAN).min(periods.len());
    &periods[start..end]
}

/// Records of the window starting at `cursor`, grouped by period in window
/// order and ranked by frequency (descending, stable) within each period.
pub fn select_window<'a>(
    records: &'a [Record],
    periods: &[String],
    cursor: usize,
    top_n: usize,
) -> Vec<WindowEntry<'a>> {
    let window = window_of(periods, cursor);
    if window.is_empty() {
        return Vec::new();
    }

    let slot_by_period = window
        .iter()
        .enumerate()
        .map(|(slot, period)| (period.as_str(), slot))
        .collect::<HashMap<_, _>>();

    let mut groups = vec![Vec::new(); window.len()];
    for record in records {
        if let Some(&slot) = slot_by_period.get(record.timestamp.as_str()) {
            groups[slot].push(record);
        }
    }

    let mut entries = Vec::new();
    for (slot, mut group) in groups.into_iter().enumerate() {
        group.sort_by(|a, b| b.frequency.total_cmp(&a.frequency));
        group.truncate(top_n);
        entries.extend(group.into_iter().map(|record| WindowEntry { record, slot }));
    }
    entries
}
