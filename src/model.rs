//! Output data model: one record per extracted book detail section.
//!
//! Field names on the wire are the ones consumers of `<site>_books.json` already read.

use serde::{Deserialize, Serialize};

/// Price written when the price field is absent or does not parse.
pub const PRICE_UNKNOWN: i64 = -1;
/// Page count written when the page field is absent or does not parse.
pub const PAGES_UNKNOWN: i64 = 0;
/// Rating written when the rating field is absent or does not parse.
pub const RATING_UNKNOWN: f64 = -1.0;

/// One book extracted from a detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    /// Detail page URL.
    #[serde(rename = "detail")]
    pub url: String,
    pub author: String,
    /// Digits and hyphens only.
    pub isbn: String,
    pub price: i64,
    #[serde(rename = "number_of_page")]
    pub page_count: i64,
    pub category: String,
    #[serde(rename = "book_name", alias = "book_nane")]
    pub name: String,
    #[serde(rename = "book_shelf")]
    pub group: String,
    pub description: String,
    #[serde(rename = "rate")]
    pub rating: f64,
}
