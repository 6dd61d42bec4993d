//! Cleanup of raw extracted text before numeric parsing.

/// Keep only ASCII decimal digits.
///
/// Minus signs and decimal points are dropped too, so `"12.50"` becomes `"1250"`.
pub fn strip_non_digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Keep only ASCII decimal digits and hyphens, preserving ISBN-10/13 grouping.
pub fn strip_non_isbn(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect()
}
