//! bookscrape: CLI scraper for bookstore catalogs, extracting book metadata to JSON.

pub mod cli;
pub mod config;
pub mod crawl;
pub mod extract;
pub mod logging;
pub mod model;
pub mod output;
pub mod strategy;

// Re-exports for CLI and consumers.
pub use crawl::{
    CrawlError, CrawlStats, Crawler, FetchError, HttpClient, HttpClientBuilder, PageSource,
    RecordCollector,
};
pub use extract::{Extracted, Numeric, RecordAssembler};
pub use model::BookRecord;
pub use output::{output_path, OutputError, OutputWriter};
pub use strategy::{SiteConfig, StrategyError};
