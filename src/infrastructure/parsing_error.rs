//! Parsing error types
//!
//! None of these abort a traversal. Processors log them and fall back to the
//! last good value or to a field sentinel.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Could not convert '{raw}' to a number for field '{field}'")]
    NotANumber { field: String, raw: String },

    #[error("Could not read a page count from '{raw}'")]
    PageCountUnparsable { raw: String },

    #[error("Expected value node not found: {context}")]
    MissingValue { context: String },
}

impl ParsingError {
    pub fn not_a_number(field: &str, raw: &str) -> Self {
        Self::NotANumber {
            field: field.to_string(),
            raw: raw.to_string(),
        }
    }

    pub fn page_count_unparsable(raw: &str) -> Self {
        Self::PageCountUnparsable {
            raw: raw.to_string(),
        }
    }

    pub fn missing_value(context: &str) -> Self {
        Self::MissingValue {
            context: context.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
