use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::parse::parse_records;
use super::record::Dataset;

pub fn dataset_path(data_dir: &Path, category: &str) -> PathBuf {
    data_dir
        .join(category)
        .join(format!("topics_sentiments_{}.csv", category.to_lowercase()))
}

pub fn load_category(data_dir: &Path, category: &str) -> Result<Dataset> {
    let path = dataset_path(data_dir, category);
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read topic table {}", path.display()))?;
    let records = parse_records(&raw)
        .inspect_err(|error| {
            warn!(path = %path.display(), row = error.row(), %error, "rejecting topic table");
        })
        .with_context(|| format!("malformed topic table {}", path.display()))?;

    let dataset = Dataset::new(category, records);
    info!(
        category,
        records = dataset.records.len(),
        periods = dataset.period_count(),
        topics = dataset.topic_count(),
        "loaded topic table"
    );
    Ok(dataset)
}
