//! Label driven field capture
//!
//! Record pages present values as label/value pairs. Which label feeds which
//! `RecordField` is plain data held in a `FieldTable`, so a site can change
//! its wording without touching the processors that walk its markup.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};

use super::numbers::{parse_leading_decimal, parse_leading_int};
use crate::domain::{FieldKind, FieldValue, Record, RecordField, UNPARSED_DECIMAL, price_per_area};
use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};

/// Label text -> record field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTable {
    entries: HashMap<String, RecordField>,
}

impl FieldTable {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, RecordField)>,
        S: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(label, field)| (label.into().trim().to_string(), field))
            .collect();
        Self { entries }
    }

    /// Add or replace labels, typically from configuration.
    pub fn with_overrides(mut self, overrides: &HashMap<String, RecordField>) -> Self {
        for (label, field) in overrides {
            self.entries.insert(label.trim().to_string(), *field);
        }
        self
    }

    pub fn lookup(&self, label: &str) -> Option<RecordField> {
        self.entries.get(label.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Convert raw label text into the value type of `field`.
pub fn convert_field(field: RecordField, raw: &str) -> ParsingResult<FieldValue> {
    let raw = raw.trim();
    match field.kind() {
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Integer => parse_leading_int(raw)
            .map(FieldValue::Integer)
            .ok_or_else(|| ParsingError::not_a_number(&format!("{field:?}"), raw)),
        FieldKind::Decimal => parse_leading_decimal(raw)
            .map(FieldValue::Decimal)
            .ok_or_else(|| ParsingError::not_a_number(&format!("{field:?}"), raw)),
    }
}

/// Converted values gathered during one traversal
#[derive(Debug, Clone, Default)]
pub struct FieldValues {
    values: BTreeMap<RecordField, FieldValue>,
}

impl FieldValues {
    /// Convert and store `raw`. A failed conversion is logged and the field's
    /// sentinel is stored instead.
    pub fn record_raw(&mut self, field: RecordField, raw: &str) {
        let value = match convert_field(field, raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("{}", e);
                field.sentinel()
            }
        };
        self.values.insert(field, value);
    }

    pub fn get(&self, field: RecordField) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn apply_to(&self, record: &mut Record) {
        for (field, value) in &self.values {
            record.apply(*field, value.clone());
        }
    }
}

/// Shared state of a label/value extractor: the site's table plus what this
/// instance has captured so far.
#[derive(Debug, Clone)]
pub struct FieldCollector {
    table: Arc<FieldTable>,
    values: FieldValues,
    derives_price_per_area: bool,
}

impl FieldCollector {
    pub fn new(table: Arc<FieldTable>) -> Self {
        Self {
            table,
            values: FieldValues::default(),
            derives_price_per_area: false,
        }
    }

    /// Marks this collector as the owner of the main numeric block; its
    /// contribution then also sets `price_per_area`.
    pub fn deriving_price_per_area(mut self) -> Self {
        self.derives_price_per_area = true;
        self
    }

    /// Store `raw` if `label` is known. Returns whether the label was mapped.
    pub fn capture(&mut self, label: &str, raw: &str) -> bool {
        match self.table.lookup(label) {
            Some(field) => {
                self.values.record_raw(field, raw);
                true
            }
            None => {
                debug!("Unmapped label '{}'", label.trim());
                false
            }
        }
    }

    pub fn contribute(&self, record: &mut Record) {
        self.values.apply_to(record);

        if self.derives_price_per_area {
            let price = match self.values.get(RecordField::Price) {
                Some(FieldValue::Decimal(v)) => *v,
                _ => UNPARSED_DECIMAL,
            };
            let house_area = match self.values.get(RecordField::HouseArea) {
                Some(FieldValue::Integer(v)) => *v,
                _ => -1,
            };
            record.price_per_area = price_per_area(price, house_area);
        }
    }
}
