//! Listing record model
//!
//! A `Record` is one physical listing as it leaves the crawler. Extractors fill
//! it field by field; duplicates across sources are detected through
//! `RecordIdentity`, never through the URL.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sentinel for integer fields whose text could not be converted
pub const UNPARSED: i32 = -1;

/// Sentinel for decimal fields whose text could not be converted
pub const UNPARSED_DECIMAL: f64 = -1.0;

/// Prices are quoted in millions, price-per-area is reported in the base unit
pub const PRICE_UNIT_SCALE: f64 = 1_000_000.0;

/// One extracted listing.
///
/// Field order is the export column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub address: String,
    pub link: String,
    pub condition: String,
    pub parking: String,
    pub built_in: String,
    pub floor_count: String,
    pub heating: String,
    pub air_conditioning: String,
    pub bathroom: String,
    pub house_area: i32,
    pub lot_area: i32,
    pub room_count: i32,
    pub price: f64,
    pub price_per_area: f64,
}

/// Key used to decide whether two records describe the same listing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordIdentity {
    pub house_area: i32,
    pub lot_area: i32,
    pub price: f64,
}

/// Fields an extractor can contribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Address,
    Condition,
    Parking,
    BuiltIn,
    FloorCount,
    Heating,
    AirConditioning,
    Bathroom,
    HouseArea,
    LotArea,
    RoomCount,
    Price,
}

/// How the raw label value of a field is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
}

/// Converted value ready to be written into a `Record`
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i32),
    Decimal(f64),
}

impl RecordField {
    pub fn kind(self) -> FieldKind {
        match self {
            Self::HouseArea | Self::LotArea | Self::RoomCount => FieldKind::Integer,
            Self::Price => FieldKind::Decimal,
            _ => FieldKind::Text,
        }
    }

    /// Value stored when conversion of this field's text fails
    pub fn sentinel(self) -> FieldValue {
        match self.kind() {
            FieldKind::Integer => FieldValue::Integer(UNPARSED),
            FieldKind::Decimal => FieldValue::Decimal(UNPARSED_DECIMAL),
            FieldKind::Text => FieldValue::Text(String::new()),
        }
    }
}

impl Record {
    /// Empty record bound to the page it is extracted from
    pub fn for_link(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Self::default()
        }
    }

    pub fn identity(&self) -> RecordIdentity {
        RecordIdentity {
            house_area: self.house_area,
            lot_area: self.lot_area,
            price: self.price,
        }
    }

    /// Write one converted value into its field.
    pub fn apply(&mut self, field: RecordField, value: FieldValue) {
        match (field, value) {
            (RecordField::Address, FieldValue::Text(v)) => self.address = v,
            (RecordField::Condition, FieldValue::Text(v)) => self.condition = v,
            (RecordField::Parking, FieldValue::Text(v)) => self.parking = v,
            (RecordField::BuiltIn, FieldValue::Text(v)) => self.built_in = v,
            (RecordField::FloorCount, FieldValue::Text(v)) => self.floor_count = v,
            (RecordField::Heating, FieldValue::Text(v)) => self.heating = v,
            (RecordField::AirConditioning, FieldValue::Text(v)) => self.air_conditioning = v,
            (RecordField::Bathroom, FieldValue::Text(v)) => self.bathroom = v,
            (RecordField::HouseArea, FieldValue::Integer(v)) => self.house_area = v,
            (RecordField::LotArea, FieldValue::Integer(v)) => self.lot_area = v,
            (RecordField::RoomCount, FieldValue::Integer(v)) => self.room_count = v,
            (RecordField::Price, FieldValue::Decimal(v)) => self.price = v,
            (field, value) => {
                debug!("Ignoring {:?} for field {:?}: kind mismatch", value, field);
            }
        }
    }
}

/// Price per unit area in the base currency unit.
///
/// Returns `UNPARSED_DECIMAL` when either input is a sentinel or the area is
/// zero, so a broken area never turns into an infinite price.
pub fn price_per_area(price: f64, house_area: i32) -> f64 {
    if price < 0.0 || house_area <= 0 {
        return UNPARSED_DECIMAL;
    }
    (price / f64::from(house_area)) * PRICE_UNIT_SCALE
}
