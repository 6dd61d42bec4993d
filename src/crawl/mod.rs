//! Crawl scheduling: a listing queue and a detail queue, each deduplicated and restricted
//! to the site's domain.
//!
//! Listing pages are drained FIFO. After each listing page, the product links it yielded
//! are visited before the next listing page, so records come out in discovery order.

mod cache;
pub mod classify;
mod client;
mod collector;
mod error;

pub use cache::ResponseCache;
pub use client::{HttpClient, HttpClientBuilder};
pub use collector::RecordCollector;
pub use error::{CrawlError, FetchError};

use std::collections::{HashSet, VecDeque};

use scraper::{Html, Selector};
use url::Url;

use crate::extract::{parse_selector, RecordAssembler};
use crate::strategy::SiteConfig;

/// Source of page bodies. [HttpClient] fetches over the network; tests serve fixtures.
pub trait PageSource {
    fn fetch(&mut self, url: &Url) -> Result<String, FetchError>;
}

/// Counters reported at the end of a crawl.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlStats {
    pub listing_pages: usize,
    pub detail_pages: usize,
    /// Detail pages that produced no record (no section or empty title).
    pub skipped_pages: usize,
    pub failed_fetches: usize,
    pub records: usize,
}

/// FIFO of pending URLs that accepts each URL once.
#[derive(Debug, Default)]
struct CrawlQueue {
    pending: VecDeque<Url>,
    seen: HashSet<String>,
}

impl CrawlQueue {
    fn push(&mut self, url: Url) -> bool {
        if !self.seen.insert(url.as_str().to_string()) {
            return false;
        }
        self.pending.push_back(url);
        true
    }

    fn pop(&mut self) -> Option<Url> {
        self.pending.pop_front()
    }
}

/// Links found on one listing page.
#[derive(Debug, Default)]
struct ListingLinks {
    listings: Vec<Url>,
    details: Vec<Url>,
}

/// Drives one site's crawl over a [PageSource].
pub struct Crawler<'a, S> {
    config: &'a SiteConfig,
    source: S,
    anchors: Selector,
    product: Selector,
    assembler: RecordAssembler,
    listing: CrawlQueue,
    detail: CrawlQueue,
}

impl<'a, S: PageSource> Crawler<'a, S> {
    /// Compile every selector the crawl needs; bad selectors fail here, before any fetch.
    pub fn new(config: &'a SiteConfig, source: S) -> Result<Self, CrawlError> {
        Ok(Self {
            config,
            source,
            anchors: parse_selector("anchor", "a[href]")?,
            product: parse_selector("product", &config.product)?,
            assembler: RecordAssembler::new(config)?,
            listing: CrawlQueue::default(),
            detail: CrawlQueue::default(),
        })
    }

    /// Crawl from `scrap_site`, pushing every extracted record into `collector`.
    ///
    /// Per-page fetch failures are logged and counted; only a bad start URL is an error.
    pub fn run(&mut self, collector: &RecordCollector) -> Result<CrawlStats, CrawlError> {
        let start = self.start_url()?;
        self.listing.push(start);

        let mut stats = CrawlStats::default();
        while let Some(page_url) = self.listing.pop() {
            let html = match self.source.fetch(&page_url) {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(url = %page_url, error = %e, "listing page skipped");
                    stats.failed_fetches += 1;
                    continue;
                }
            };
            stats.listing_pages += 1;

            let links = self.discover(&page_url, &html);
            for url in links.listings {
                self.listing.push(url);
            }
            for url in links.details {
                if self.detail.push(url.clone()) {
                    tracing::info!(%url, "load child");
                }
            }

            self.drain_details(collector, &mut stats);
        }

        tracing::info!(
            listing_pages = stats.listing_pages,
            detail_pages = stats.detail_pages,
            skipped = stats.skipped_pages,
            failed = stats.failed_fetches,
            records = stats.records,
            "crawl finished"
        );
        Ok(stats)
    }

    fn start_url(&self) -> Result<Url, CrawlError> {
        let raw = self.config.scrap_site.as_str();
        let mut url = Url::parse(raw).map_err(|e| CrawlError::InvalidStartUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        if !classify::is_allowed(&url, self.config) {
            return Err(CrawlError::InvalidStartUrl {
                url: raw.to_string(),
                reason: format!("host is outside the allowed domain {}", self.config.site),
            });
        }
        url.set_fragment(None);
        Ok(url)
    }

    /// Classify the anchors of one listing page.
    fn discover(&self, page_url: &Url, html: &str) -> ListingLinks {
        let doc = Html::parse_document(html);
        let mut links = ListingLinks::default();

        for anchor in doc.select(&self.anchors) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !classify::is_listing_link(href, self.config) {
                continue;
            }
            if let Some(url) = classify::resolve_href(page_url, href) {
                if classify::is_allowed(&url, self.config) {
                    links.listings.push(url);
                }
            }
        }

        for card in doc.select(&self.product) {
            let Some(href) = card.value().attr("href") else {
                continue;
            };
            let Some(url) = classify::resolve_href(page_url, href) else {
                continue;
            };
            if classify::is_detail_link(url.as_str(), self.config)
                && classify::is_allowed(&url, self.config)
            {
                links.details.push(url);
            }
        }

        links
    }

    fn drain_details(&mut self, collector: &RecordCollector, stats: &mut CrawlStats) {
        while let Some(url) = self.detail.pop() {
            let html = match self.source.fetch(&url) {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(%url, error = %e, "detail page skipped");
                    stats.failed_fetches += 1;
                    continue;
                }
            };
            stats.detail_pages += 1;

            let records = self.assembler.assemble_page(&html, url.as_str());
            if records.is_empty() {
                stats.skipped_pages += 1;
            }
            for record in records {
                tracing::info!(title = %record.title, price = record.price, "book");
                stats.records += 1;
                collector.push(record);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Serves fixed bodies and records the fetch order.
    #[derive(Default)]
    struct Fixtures {
        pages: HashMap<String, String>,
        fetched: Vec<String>,
    }

    impl Fixtures {
        fn page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }
    }

    impl PageSource for &mut Fixtures {
        fn fetch(&mut self, url: &Url) -> Result<String, FetchError> {
            self.fetched.push(url.to_string());
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| FetchError::Missing {
                    url: url.to_string(),
                })
        }
    }

    fn config() -> SiteConfig {
        SiteConfig {
            scrap_site: "https://books.example/collections/all?page=1".to_string(),
            site: "books.example".to_string(),
            collection: "collections/all?page=".to_string(),
            url_detail: "books.example/products/".to_string(),
            product: ".product-item > a".to_string(),
            section: "section#product".to_string(),
            title: vec!["h1.title".to_string()],
            price: vec![".price".to_string()],
            page: vec!["li.pages".to_string()],
            author: vec!["li.author".to_string()],
            isbn: vec!["li.isbn".to_string()],
            category: vec!["li.category".to_string()],
            name: vec!["li.name".to_string()],
            group: vec!["li.group".to_string()],
            description: vec!["div.desc".to_string()],
            rating: vec!["span.rating".to_string()],
        }
    }

    fn detail_page(title: &str, price: &str, isbn: &str) -> String {
        format!(
            r#"<html><body><section id="product">
<h1 class="title">{title}</h1>
<span class="price">{price}</span>
<ul>
  <li class="isbn">ISBN: {isbn}</li>
  <li class="author">Tác giả {title}</li>
  <li class="pages">{price} trang</li>
  <li class="category">Văn học</li>
  <li class="name">{title}</li>
  <li class="group">Kệ A</li>
</ul>
<div class="desc">Mô tả {title}</div>
<span class="rating">4</span>
</section></body></html>"#
        )
    }

    const LISTING_1: &str = r#"<html><body>
<nav><a href="/pages/about">About</a><a href="/collections/all?page=2">2</a></nav>
<div class="product-item"><a href="/products/one">One</a></div>
<div class="product-item"><a href="/products/two#reviews">Two</a></div>
<a href="/products/not-a-card">Not a card</a>
</body></html>"#;

    #[test]
    fn one_listing_two_products_in_visit_order() -> Result<(), CrawlError> {
        let listing = r#"<div class="product-item"><a href="/products/one">1</a></div>
<div class="product-item"><a href="https://books.example/products/two">2</a></div>"#;
        let mut fixtures = Fixtures::default()
            .page("https://books.example/collections/all?page=1", listing)
            .page(
                "https://books.example/products/one",
                &detail_page("Một", "50.000₫", "978-1"),
            )
            .page(
                "https://books.example/products/two",
                &detail_page("Hai", "72.000₫", "978-2"),
            );
        let config = config();
        let collector = RecordCollector::new();
        let stats = Crawler::new(&config, &mut fixtures)?.run(&collector)?;

        let records = collector.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(stats.records, 2);
        assert_eq!(records[0].title, "Một");
        assert_eq!(records[0].url, "https://books.example/products/one");
        assert_eq!(records[0].price, 50000);
        assert_eq!(records[0].page_count, 50000);
        assert_eq!(records[0].isbn, "978-1");
        assert_eq!(records[0].author, "Tác giả Một");
        assert_eq!(records[0].category, "Văn học");
        assert_eq!(records[0].group, "Kệ A");
        assert_eq!(records[0].description, "Mô tả Một");
        assert_eq!(records[0].rating, 4.0);
        assert_eq!(records[1].title, "Hai");
        assert_eq!(records[1].price, 72000);
        Ok(())
    }

    #[test]
    fn follows_pagination_and_dedups() -> Result<(), CrawlError> {
        let listing_2 = r#"
<a href="/collections/all?page=1">1</a><a href="/collections/all?page=2">2</a>
<div class="product-item"><a href="/products/one">One again</a></div>
<div class="product-item"><a href="/products/three">Three</a></div>"#;
        let mut fixtures = Fixtures::default()
            .page("https://books.example/collections/all?page=1", LISTING_1)
            .page("https://books.example/collections/all?page=2", listing_2)
            .page(
                "https://books.example/products/one",
                &detail_page("One", "1", "1"),
            )
            .page(
                "https://books.example/products/two",
                &detail_page("Two", "2", "2"),
            )
            .page(
                "https://books.example/products/three",
                &detail_page("Three", "3", "3"),
            );
        let config = config();
        let collector = RecordCollector::new();
        let stats = Crawler::new(&config, &mut fixtures)?.run(&collector)?;

        let titles: Vec<_> = collector
            .into_records()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
        assert_eq!(stats.listing_pages, 2);
        assert_eq!(stats.detail_pages, 3);
        assert_eq!(
            fixtures.fetched,
            vec![
                "https://books.example/collections/all?page=1",
                "https://books.example/products/one",
                "https://books.example/products/two",
                "https://books.example/collections/all?page=2",
                "https://books.example/products/three",
            ]
        );
        Ok(())
    }

    #[test]
    fn empty_title_page_is_skipped_without_affecting_others() -> Result<(), CrawlError> {
        let listing = r#"
<div class="product-item"><a href="/products/stray">Stray</a></div>
<div class="product-item"><a href="/products/real">Real</a></div>"#;
        let mut fixtures = Fixtures::default()
            .page("https://books.example/collections/all?page=1", listing)
            .page(
                "https://books.example/products/stray",
                r#"<section id="product"><p>Đang cập nhật</p></section>"#,
            )
            .page(
                "https://books.example/products/real",
                &detail_page("Real", "10", "1"),
            );
        let config = config();
        let collector = RecordCollector::new();
        let stats = Crawler::new(&config, &mut fixtures)?.run(&collector)?;
        assert_eq!(stats.skipped_pages, 1);
        let records = collector.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Real");
        Ok(())
    }

    #[test]
    fn fetch_failures_are_absorbed() -> Result<(), CrawlError> {
        let mut fixtures = Fixtures::default()
            .page("https://books.example/collections/all?page=1", LISTING_1)
            .page(
                "https://books.example/products/two",
                &detail_page("Two", "2", "2"),
            );
        let config = config();
        let collector = RecordCollector::new();
        let stats = Crawler::new(&config, &mut fixtures)?.run(&collector)?;
        // products/one and listing page 2 are missing.
        assert_eq!(stats.failed_fetches, 2);
        assert_eq!(collector.len(), 1);
        Ok(())
    }

    #[test]
    fn off_domain_links_are_never_fetched() -> Result<(), CrawlError> {
        let listing = r#"
<a href="https://mirror.example/collections/all?page=2">mirror</a>
<div class="product-item"><a href="https://mirror.example/books.example/products/x">x</a></div>
<div class="product-item"><a href="https://www.books.example/products/www">www</a></div>"#;
        let mut fixtures = Fixtures::default()
            .page("https://books.example/collections/all?page=1", listing)
            .page(
                "https://www.books.example/products/www",
                &detail_page("WWW", "1", "1"),
            );
        let config = config();
        let collector = RecordCollector::new();
        Crawler::new(&config, &mut fixtures)?.run(&collector)?;
        assert_eq!(
            fixtures.fetched,
            vec![
                "https://books.example/collections/all?page=1",
                "https://www.books.example/products/www",
            ]
        );
        assert_eq!(collector.len(), 1);
        Ok(())
    }

    #[test]
    fn start_url_outside_domain_is_an_error() {
        let mut config = config();
        config.scrap_site = "https://elsewhere.example/collections/all?page=1".to_string();
        let mut fixtures = Fixtures::default();
        let result = Crawler::new(&config, &mut fixtures).and_then(|mut c| {
            let collector = RecordCollector::new();
            c.run(&collector)
        });
        assert!(matches!(result, Err(CrawlError::InvalidStartUrl { .. })));
        assert!(fixtures.fetched.is_empty());
    }

    #[test]
    fn unparseable_start_url_is_an_error() {
        let mut config = config();
        config.scrap_site = "not a url".to_string();
        let mut fixtures = Fixtures::default();
        let result = Crawler::new(&config, &mut fixtures).and_then(|mut c| {
            let collector = RecordCollector::new();
            c.run(&collector)
        });
        assert!(matches!(result, Err(CrawlError::InvalidStartUrl { .. })));
    }

    #[test]
    fn invalid_product_selector_fails_before_fetching() {
        let mut config = config();
        config.product = "div[".to_string();
        let mut fixtures = Fixtures::default();
        assert!(matches!(
            Crawler::new(&config, &mut fixtures),
            Err(CrawlError::Selector(_))
        ));
    }

    #[test]
    fn queue_accepts_each_url_once() {
        let mut q = CrawlQueue::default();
        let u = Url::parse("https://books.example/products/a").expect("valid url");
        assert!(q.push(u.clone()));
        assert!(!q.push(u.clone()));
        assert_eq!(q.pop(), Some(u));
        assert_eq!(q.pop(), None);
    }
}
