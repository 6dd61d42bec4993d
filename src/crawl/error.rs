//! Error types for fetching pages and driving a crawl.

use thiserror::Error;

use crate::extract::ExtractError;

/// Failure to fetch one page. Logged and absorbed by the crawler.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: could not reach {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body from {url}: {source}")]
    BodyRead {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Page not available from an in-memory or fixture source.
    #[error("No page at {url}")]
    Missing { url: String },
}

/// Errors that stop a crawl before it starts.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid start URL {url:?}: {reason}")]
    InvalidStartUrl { url: String, reason: String },

    #[error(transparent)]
    Selector(#[from] ExtractError),
}
