//! Numeric conversions for listing text
//!
//! Listing values carry units and separators (`"140m2"`, `"1 250 m²"`,
//! `"64,9 M Ft"`, `"1 / 12 oldal"`). Only the leading number is kept.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};

/// Leading integer, allowing space or NBSP grouped thousands
static LEADING_INT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3}(?:[ \u{00A0}]\d{3})+|\d+)").expect("leading integer pattern compiles")
});

/// Leading integer of a value such as `"140m2"` or `"4 szoba"`.
pub fn parse_leading_int(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    let found = LEADING_INT.find(trimmed)?;
    let digits: String = found
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// First whitespace separated token as a decimal, comma accepted as the
/// decimal mark (`"64,9 M Ft"` -> 64.9).
pub fn parse_leading_decimal(raw: &str) -> Option<f64> {
    let token = raw.split_whitespace().next()?;
    let normalized = token.replacen(',', ".", 1);
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Total page count from a `"current / total ..."` label.
pub fn parse_page_fraction(raw: &str) -> ParsingResult<u32> {
    let total = raw
        .split('/')
        .nth(1)
        .ok_or_else(|| ParsingError::page_count_unparsable(raw))?;
    parse_page_number(total)
}

/// Plain page number such as the text of a pagination anchor.
pub fn parse_page_number(raw: &str) -> ParsingResult<u32> {
    raw.split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .ok_or_else(|| ParsingError::page_count_unparsable(raw))
}
