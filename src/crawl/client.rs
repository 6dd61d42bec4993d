//! Blocking HTTP client with an optional on-disk response cache.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::crawl::cache::ResponseCache;
use crate::crawl::error::FetchError;
use crate::crawl::PageSource;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; bookscrape/0.1; +https://github.com/bookscrape)";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_REDIRECTS: usize = 10;

/// Blocking HTTP client that serves repeat requests from the response cache.
#[derive(Debug)]
pub struct HttpClient {
    inner: reqwest::blocking::Client,
    cache: Option<ResponseCache>,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    /// GET `url` and return the body. Non-2xx statuses are errors.
    fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .inner
            .get(url.as_str())
            .send()
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                source: e,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        response.text().map_err(|e| FetchError::BodyRead {
            url: url.to_string(),
            source: e,
        })
    }
}

impl PageSource for HttpClient {
    fn fetch(&mut self, url: &Url) -> Result<String, FetchError> {
        if let Some(cache) = &self.cache {
            match cache.load(url.as_str()) {
                Ok(Some(body)) => {
                    tracing::debug!(%url, "cache hit");
                    return Ok(body);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(%url, error = %e, "cannot read cache entry"),
            }
        }

        tracing::info!(%url, "visiting");
        let body = self.get_text(url)?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(url.as_str(), &body) {
                tracing::warn!(%url, error = %e, "cannot write cache entry");
            }
        }
        Ok(body)
    }
}

/// Builder for HttpClient with optional User-Agent, timeout, and cache directory.
#[derive(Debug)]
pub struct HttpClientBuilder {
    user_agent: Option<String>,
    timeout_secs: u64,
    cache_dir: Option<PathBuf>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_dir: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Request timeout in seconds. Default 30.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Cache responses under `dir`. Without this every request goes to the network.
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, reqwest::Error> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let inner = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .user_agent(user_agent)
            .timeout(Duration::from_secs(self.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(HttpClient {
            inner,
            cache: self.cache_dir.map(ResponseCache::new),
        })
    }
}
