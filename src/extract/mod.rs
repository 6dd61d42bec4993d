//! Field extraction: ordered candidate selectors, first non-empty match wins.
//!
//! Extraction reports what it saw ([Extracted], [Numeric]); turning "nothing matched" or
//! "matched but malformed" into output sentinels is left to the [RecordAssembler].

mod assemble;
pub mod normalize;

pub use assemble::RecordAssembler;

use scraper::{ElementRef, Selector};
use thiserror::Error;

use normalize::strip_non_digits;

/// Errors from compiling configured selectors.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid selector for {field}: {selector:?}: {message}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        message: String,
    },
}

/// Parse a CSS selector or return a compile error (avoids panics from Selector::parse).
pub fn parse_selector(field: &'static str, sel: &str) -> Result<Selector, ExtractError> {
    Selector::parse(sel).map_err(|e| ExtractError::InvalidSelector {
        field,
        selector: sel.to_string(),
        message: e.to_string(),
    })
}

/// Result of a text extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Found(String),
    NotFound,
}

impl Extracted {
    /// Found text, or the empty string.
    pub fn into_text(self) -> String {
        match self {
            Extracted::Found(s) => s,
            Extracted::NotFound => String::new(),
        }
    }
}

/// Result of a numeric extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric<T> {
    Parsed(T),
    /// A candidate matched but its text did not parse; carries the raw text.
    Malformed(String),
    NotFound,
}

impl<T> Numeric<T> {
    pub fn or_sentinel(self, sentinel: T) -> T {
        match self {
            Numeric::Parsed(v) => v,
            Numeric::Malformed(_) | Numeric::NotFound => sentinel,
        }
    }
}

/// Ordered candidate selectors for one field.
#[derive(Debug, Clone)]
pub struct SelectorSet {
    field: &'static str,
    candidates: Vec<Selector>,
}

impl SelectorSet {
    /// Compile every candidate; the first invalid one fails the whole set.
    pub fn compile(field: &'static str, candidates: &[String]) -> Result<Self, ExtractError> {
        let candidates = candidates
            .iter()
            .map(|s| parse_selector(field, s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { field, candidates })
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn extract_text(&self, scope: ElementRef<'_>) -> Extracted {
        extract_text(&self.candidates, scope)
    }

    pub fn extract_int(&self, scope: ElementRef<'_>) -> Numeric<i64> {
        extract_int(&self.candidates, scope)
    }

    pub fn extract_rate(&self, scope: ElementRef<'_>) -> Numeric<f64> {
        extract_rate(&self.candidates, scope)
    }
}

/// Concatenated text of every match of `selector` under `scope`, trimmed.
fn child_text(selector: &Selector, scope: ElementRef<'_>) -> String {
    scope
        .select(selector)
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Try each candidate in order and return the first non-empty text.
pub fn extract_text(candidates: &[Selector], scope: ElementRef<'_>) -> Extracted {
    candidates
        .iter()
        .map(|sel| child_text(sel, scope))
        .find(|text| !text.is_empty())
        .map_or(Extracted::NotFound, Extracted::Found)
}

/// First non-empty candidate, digits only, as a base-10 integer.
pub fn extract_int(candidates: &[Selector], scope: ElementRef<'_>) -> Numeric<i64> {
    match extract_text(candidates, scope) {
        Extracted::Found(raw) => match strip_non_digits(&raw).parse::<i64>() {
            Ok(v) => Numeric::Parsed(v),
            Err(_) => Numeric::Malformed(raw),
        },
        Extracted::NotFound => Numeric::NotFound,
    }
}

/// Same search as [extract_int], parsed as a float.
pub fn extract_rate(candidates: &[Selector], scope: ElementRef<'_>) -> Numeric<f64> {
    match extract_text(candidates, scope) {
        Extracted::Found(raw) => match strip_non_digits(&raw).parse::<f64>() {
            Ok(v) if v.is_finite() => Numeric::Parsed(v),
            _ => Numeric::Malformed(raw),
        },
        Extracted::NotFound => Numeric::NotFound,
    }
}
