//! Optional run settings. Search order: ./bookscrape.toml, then
//! $XDG_CONFIG_HOME/bookscrape/config.toml (or ~/.config/bookscrape/config.toml).
//!
//! Site strategies live in the strategy file, not here.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::strategy::DEFAULT_STRATEGY_FILE;

/// Default response cache directory, relative to CWD.
pub const DEFAULT_CACHE_DIR: &str = "book_cache";

/// Settings file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Path of the strategy JSON file (default `strategy.json`).
    pub strategy_file: Option<PathBuf>,
    /// Directory for `<site>_books.json` (default CWD).
    pub output_dir: Option<PathBuf>,
    /// Response cache directory (default `book_cache`).
    pub cache_dir: Option<PathBuf>,
    /// Set to false to always fetch from the network.
    pub cache: Option<bool>,
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn strategy_file(&self) -> PathBuf {
        self.strategy_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STRATEGY_FILE))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Cache directory, or `None` when caching is disabled.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        if self.cache == Some(false) {
            return None;
        }
        Some(
            self.cache_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
        )
    }
}

/// Parse one settings file. Invalid TOML or an I/O error is returned as a message.
pub fn load_config_file(path: &Path) -> Result<Config, String> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    toml::from_str(&s).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}

/// Search order: (1) ./bookscrape.toml, (2) $XDG_CONFIG_HOME/bookscrape/config.toml.
/// Missing file returns Ok(None). Invalid TOML or I/O error reading a present file returns Err.
pub fn load_config() -> Result<Option<Config>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    let mut paths = vec![cwd.join("bookscrape.toml")];
    if let Some(d) = dirs::config_dir() {
        paths.push(d.join("bookscrape").join("config.toml"));
    }
    for path in &paths {
        if path.exists() {
            let config = load_config_file(path)?;
            tracing::debug!(path = %path.display(), "loaded settings");
            return Ok(Some(config));
        }
    }
    Ok(None)
}
