//! Domain module - records and queries
//!
//! Plain data shared by every layer. Nothing in here touches the network or
//! the HTML tree.

pub mod query;
pub mod record;

pub use query::{PropertyType, QueryError, QueryParameters, district_number};
pub use record::{
    FieldKind, FieldValue, PRICE_UNIT_SCALE, Record, RecordField, RecordIdentity, UNPARSED,
    UNPARSED_DECIMAL, price_per_area,
};
