//! Per-site extraction strategies loaded from `strategy.json`.
//!
//! The file holds `{"strategies": [...]}`; each entry names a site domain, the URL markers
//! used to route links, and an ordered list of candidate CSS selectors per output field.
//! Earlier candidates win, so newer page templates are listed before legacy ones.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default strategy file, relative to the working directory.
pub const DEFAULT_STRATEGY_FILE: &str = "strategy.json";

/// Errors from reading or searching the strategy file.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Cannot read strategy file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid strategy file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate strategy for site '{site}'")]
    DuplicateSite { site: String },

    #[error("Can not find key in config [{site}]")]
    NotFound { site: String },
}

/// Extraction strategy for one site. Read-only after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// First listing page to crawl, e.g. `https://nxbkimdong.com.vn/collections/all?page=1`.
    pub scrap_site: String,
    /// Site domain; also the lookup key.
    pub site: String,
    /// Substring marking listing (pagination) links, e.g. `collections/all?page=`.
    pub collection: String,
    /// Substring marking product detail URLs, e.g. `nxbkimdong.com.vn/products`.
    pub url_detail: String,
    /// Selector for product-card anchors on listing pages.
    pub product: String,
    /// Selector for the detail section of a product page; fields are evaluated inside it.
    pub section: String,

    #[serde(default, deserialize_with = "one_or_many")]
    pub title: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub price: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub page: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub author: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub isbn: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub category: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub name: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub group: Vec<String>,
    #[serde(rename = "desc", default, deserialize_with = "one_or_many")]
    pub description: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub rating: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct StrategyFile {
    strategies: Vec<SiteConfig>,
}

/// Legacy configs carry a single selector string; newer ones an ordered list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) if s.trim().is_empty() => Vec::new(),
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// Parse strategy JSON and return the entry whose `site` equals `key`.
///
/// `origin` is only used in error messages.
pub fn from_json_str(json: &str, key: &str, origin: &Path) -> Result<SiteConfig, StrategyError> {
    let file: StrategyFile = serde_json::from_str(json).map_err(|e| StrategyError::Parse {
        path: origin.to_path_buf(),
        source: e,
    })?;
    let mut seen = HashSet::new();
    for s in &file.strategies {
        if !seen.insert(s.site.as_str()) {
            return Err(StrategyError::DuplicateSite {
                site: s.site.clone(),
            });
        }
    }
    file.strategies
        .into_iter()
        .find(|s| s.site == key)
        .ok_or_else(|| StrategyError::NotFound {
            site: key.to_string(),
        })
}

/// Read the strategy file at `path` and look up `key`.
pub fn load(path: &Path, key: &str) -> Result<SiteConfig, StrategyError> {
    let json = std::fs::read_to_string(path).map_err(|e| StrategyError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config = from_json_str(&json, key, path)?;
    tracing::info!(path = %path.display(), site = %config.site, "loaded strategy");
    Ok(config)
}
