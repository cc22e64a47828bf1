use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::debug;

pub const CATALOG_FILE: &str = "subreddits.json";

#[derive(Debug, Deserialize)]
struct Catalog {
    subreddits: Vec<String>,
}

pub fn load_categories(data_dir: &Path, fallback: &[String]) -> Result<Vec<String>> {
    let path = data_dir.join(CATALOG_FILE);
    if !path.is_file() {
        debug!(path = %path.display(), "no category catalog, using configured list");
        return Ok(fallback.to_vec());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read category catalog {}", path.display()))?;
    let catalog: Catalog = serde_json::from_str(&raw)
        .with_context(|| format!("invalid category catalog {}", path.display()))?;

    let mut seen = HashSet::new();
    let categories = catalog
        .subreddits
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && seen.insert(name.clone()))
        .collect::<Vec<_>>();

    if categories.is_empty() {
        return Err(anyhow!(
            "category catalog {} lists no subreddits",
            path.display()
        ));
    }
    Ok(categories)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Embed {
    pub title: &'static str,
    pub path: PathBuf,
}

const EMBED_KINDS: [(&str, &str); 4] = [
    ("Comment sentiments", "comments_sentiments"),
    ("Intertopic distance", "intertopic_distance"),
    ("Topics over time", "topics_over_time"),
    ("Word frequency", "word_freq"),
];

pub fn detail_embeds(data_dir: &Path, category: &str) -> Vec<Embed> {
    let folder = capitalize(category);
    EMBED_KINDS
        .iter()
        .map(|&(title, suffix)| Embed {
            title,
            path: data_dir.join(&folder).join(format!("{category}_{suffix}.html")),
        })
        .collect()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn catalog_overrides_fallback() {
        let dir = tempdir().expect("tempdir");
        fs::write(
            dir.path().join(CATALOG_FILE),
            r#"{"subreddits": ["News", " Science ", "News", ""]}"#,
        )
        .expect("write catalog");

        let categories =
            load_categories(dir.path(), &["Fallback".to_string()]).expect("catalog");
        assert_eq!(categories, vec!["News".to_string(), "Science".to_string()]);
    }

    #[test]
    fn missing_catalog_uses_fallback() {
        let dir = tempdir().expect("tempdir");
        let fallback = vec!["News".to_string()];

        assert_eq!(load_categories(dir.path(), &fallback).expect("fallback"), fallback);
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join(CATALOG_FILE), "[1, 2]").expect("write catalog");

        assert!(load_categories(dir.path(), &[]).is_err());
    }

    #[test]
    fn embeds_use_capitalized_folder() {
        let embeds = detail_embeds(Path::new("/data"), "news");

        assert_eq!(embeds.len(), 4);
        assert_eq!(
            embeds[0].path,
            PathBuf::from("/data/News/news_comments_sentiments.html")
        );
        assert_eq!(embeds[3].title, "Word frequency");
    }
}
