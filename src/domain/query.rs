//! Search query parameters shared by every site
//!
//! Loaded once from configuration and only ever read afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Could not parse district numeral: {0}")]
    UnknownDistrict(String),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Kind of property being searched for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    #[serde(rename = "lakas", alias = "lakás")]
    Flat,
    #[serde(rename = "haz", alias = "ház")]
    House,
}

impl PropertyType {
    /// Path segment the listing sites use for this type
    pub fn as_segment(self) -> &'static str {
        match self {
            Self::Flat => "lakas",
            Self::House => "haz",
        }
    }
}

/// Immutable input of a crawl run.
///
/// Districts are Roman numerals (`"XI"`); prices are in millions, sizes in
/// square metres.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameters {
    #[serde(alias = "kerületek")]
    pub districts: Vec<String>,

    #[serde(alias = "min_ár")]
    pub min_price: u32,

    #[serde(alias = "max_ár")]
    pub max_price: u32,

    #[serde(alias = "min_méret")]
    pub min_size: u32,

    #[serde(alias = "max_méret")]
    pub max_size: u32,

    #[serde(alias = "lakás_vagy_ház")]
    pub property_type: PropertyType,
}

const ROMAN_DISTRICTS: [&str; 22] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII", "XIII", "XIV", "XV",
    "XVI", "XVII", "XVIII", "XIX", "XX", "XXI", "XXII",
];

/// Arabic number of a Budapest district given as a Roman numeral
pub fn district_number(roman: &str) -> Result<u8, QueryError> {
    let upper = roman.trim().to_uppercase();
    ROMAN_DISTRICTS
        .iter()
        .position(|d| *d == upper)
        .map(|i| (i + 1) as u8)
        .ok_or_else(|| QueryError::UnknownDistrict(roman.to_string()))
}

impl QueryParameters {
    /// Arabic numbers for every configured district, failing on the first
    /// numeral that is not a district.
    pub fn district_numbers(&self) -> Result<Vec<u8>, QueryError> {
        self.districts.iter().map(|d| district_number(d)).collect()
    }

    /// Deterministic output file name for this query.
    pub fn output_file_name(&self, prefix: &str) -> String {
        let mut prefix = prefix.to_string();
        if !prefix.is_empty() && !prefix.ends_with('_') {
            prefix.push('_');
        }

        format!(
            "{}ar_{}_{}_meret_{}_{}_kerulet_{}_{}.csv",
            prefix,
            self.min_price,
            self.max_price,
            self.min_size,
            self.max_size,
            self.districts.join("_"),
            self.property_type.as_segment()
        )
    }
}
