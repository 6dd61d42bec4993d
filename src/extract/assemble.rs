use scraper::{ElementRef, Html, Selector};

use crate::extract::normalize::strip_non_isbn;
use crate::extract::{parse_selector, ExtractError, Extracted, Numeric, SelectorSet};
use crate::model::{BookRecord, PAGES_UNKNOWN, PRICE_UNKNOWN, RATING_UNKNOWN};
use crate::strategy::SiteConfig;

/// Builds [BookRecord]s from detail pages using a site's compiled selectors.
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    section: Selector,
    title: SelectorSet,
    price: SelectorSet,
    page: SelectorSet,
    author: SelectorSet,
    isbn: SelectorSet,
    category: SelectorSet,
    name: SelectorSet,
    group: SelectorSet,
    description: SelectorSet,
    rating: SelectorSet,
}

impl RecordAssembler {
    /// Compile the section selector and every field's candidates.
    pub fn new(config: &SiteConfig) -> Result<Self, ExtractError> {
        Ok(Self {
            section: parse_selector("section", &config.section)?,
            title: SelectorSet::compile("title", &config.title)?,
            price: SelectorSet::compile("price", &config.price)?,
            page: SelectorSet::compile("page", &config.page)?,
            author: SelectorSet::compile("author", &config.author)?,
            isbn: SelectorSet::compile("isbn", &config.isbn)?,
            category: SelectorSet::compile("category", &config.category)?,
            name: SelectorSet::compile("name", &config.name)?,
            group: SelectorSet::compile("group", &config.group)?,
            description: SelectorSet::compile("desc", &config.description)?,
            rating: SelectorSet::compile("rating", &config.rating)?,
        })
    }

    /// One record per detail section on the page. Sections without a title are skipped.
    pub fn assemble_page(&self, html: &str, url: &str) -> Vec<BookRecord> {
        let doc = Html::parse_document(html);
        doc.select(&self.section)
            .filter_map(|section| self.assemble(section, url))
            .collect()
    }

    /// Extract every field from one detail section.
    ///
    /// Returns `None` when the title is empty: the section is not a real book page.
    pub fn assemble(&self, section: ElementRef<'_>, url: &str) -> Option<BookRecord> {
        tracing::debug!(url, "book found");
        let title = match self.title.extract_text(section) {
            Extracted::Found(t) => t,
            Extracted::NotFound => {
                tracing::info!(url, "no title found, skipping");
                return None;
            }
        };

        let price = self.numeric(&self.price, self.price.extract_int(section), url, PRICE_UNKNOWN);
        let page_count = self.numeric(&self.page, self.page.extract_int(section), url, PAGES_UNKNOWN);
        let rating = self.numeric(
            &self.rating,
            self.rating.extract_rate(section),
            url,
            RATING_UNKNOWN,
        );

        let record = BookRecord {
            title,
            url: url.to_string(),
            author: self.author.extract_text(section).into_text(),
            isbn: strip_non_isbn(&self.isbn.extract_text(section).into_text()),
            price,
            page_count,
            category: self.category.extract_text(section).into_text(),
            name: self.name.extract_text(section).into_text(),
            group: self.group.extract_text(section).into_text(),
            description: self.description.extract_text(section).into_text(),
            rating,
        };
        tracing::debug!(title = %record.title, price = record.price, "book extracted");
        Some(record)
    }

    /// Apply the sentinel for absent or malformed numeric fields.
    fn numeric<T>(&self, set: &SelectorSet, value: Numeric<T>, url: &str, sentinel: T) -> T {
        if let Numeric::Malformed(raw) = &value {
            tracing::debug!(field = set.field(), raw = %raw, url, "unparseable number");
        }
        value.or_sentinel(sentinel)
    }
}
