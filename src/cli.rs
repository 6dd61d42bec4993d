//! CLI parsing and orchestration. Loads the site strategy, crawls, writes JSON. Maps errors to exit codes.

use crate::config::{self, Config};
use crate::crawl::{CrawlError, Crawler, HttpClient, RecordCollector};
use crate::output::{output_path, OutputError, OutputWriter};
use crate::strategy::{self, StrategyError};
use clap::Parser;
use thiserror::Error;

/// Site crawled when `--site` is not given.
pub const DEFAULT_SITE: &str = "nxbkimdong.com.vn";

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_)
            | CliRunError::Strategy(_)
            | CliRunError::Crawl(CrawlError::Selector(_)) => 1,
            CliRunError::Crawl(CrawlError::InvalidStartUrl { .. }) => 2,
            CliRunError::Output(_) => 3,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "bookscrape")]
#[command(about = "Crawl a bookstore catalog and write its books to <site>_books.json")]
#[command(
    after_help = "Settings file keys (strategy_file, output_dir, cache_dir, cache, user_agent, timeout_secs) are read from ./bookscrape.toml or ~/.config/bookscrape/config.toml. Set RUST_LOG to change log verbosity."
)]
pub struct Args {
    /// Input site to scrape; must match a `site` entry in the strategy file.
    #[arg(long, default_value = DEFAULT_SITE)]
    pub site: String,
}

fn build_client(config: &Config) -> Result<HttpClient, CliRunError> {
    let mut builder = HttpClient::builder();
    if let Some(ua) = &config.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout_secs(secs);
    }
    if let Some(dir) = config.cache_dir() {
        builder = builder.cache_dir(dir);
    }
    builder
        .build()
        .map_err(|e| CliRunError::InvalidInput(format!("Failed to create HTTP client: {}", e)))
}

/// Entry point for the CLI. Returns Ok(()) on success; Err with exit code and message on failure.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    let config = config::load_config()
        .map_err(CliRunError::InvalidInput)?
        .unwrap_or_default();

    let site = strategy::load(&config.strategy_file(), &args.site)?;

    let out_path = output_path(&config.output_dir(), &args.site);
    let writer = OutputWriter::create(&out_path)?;

    let client = build_client(&config)?;
    let collector = RecordCollector::new();
    Crawler::new(&site, client)?.run(&collector)?;

    let records = collector.into_records();
    writer.finish(&records)?;
    tracing::info!(count = records.len(), path = %out_path.display(), "finished");
    Ok(())
}
