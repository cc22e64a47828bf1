use std::fmt;
use std::str::FromStr;

use anyhow::{Context, bail};

const DETAIL_PATH: &str = "/viz";
const CATEGORY_PARAM: &str = "subreddit";

/// Which view is showing. Formats to and parses from the path form
/// `/` or `/viz?subreddit=<category>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Main,
    Detail {
        category: String,
    },
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("/"),
            Self::Detail { category } => write!(f, "{DETAIL_PATH}?{CATEGORY_PARAM}={category}"),
        }
    }
}

impl FromStr for Route {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        let value = value.trim();
        let (path, query) = value.split_once('?').unwrap_or((value, ""));

        match path.trim_end_matches('/') {
            "" if query.is_empty() => Ok(Self::Main),
            DETAIL_PATH => {
                let category = query
                    .split('&')
                    .filter_map(|pair| pair.split_once('='))
                    .find(|(key, _)| *key == CATEGORY_PARAM)
                    .map(|(_, category)| category.trim())
                    .filter(|category| !category.is_empty())
                    .with_context(|| format!("route {value:?} needs a {CATEGORY_PARAM} parameter"))?;
                Ok(Self::Detail {
                    category: category.to_string(),
                })
            }
            _ => bail!("unknown route {value:?}; expected / or {DETAIL_PATH}?{CATEGORY_PARAM}=<name>"),
        }
    }
}
