//! Conversion between in-memory values and what the store keeps.
//!
//! Strings, numbers and booleans map to plain strings. Structured values are
//! flattened to JSON for string slots or handed to the JSON module as
//! documents. Dates and absent values travel as sentinel strings in both
//! cases.

mod json;
pub use json::{decode, encode, from_document, to_document, JsonParser};

mod scalar;
pub use scalar::{BooleanParser, NumberParser, StringParser};

mod value;
pub use value::Value;

use crate::Result;

/// Marker stored in place of an absent value.
///
/// A user string equal to this marker decodes as [`Value::Absent`].
pub const ABSENT_SENTINEL: &str = "$undefined";

/// Prefix put in front of the RFC 3339 form of a date.
pub const DATE_PREFIX: &str = "$date:";

/// Maps one item kind to the string stored under a key and back.
pub trait Parser: Send + Sync {
    type Item: Send + Sync;

    fn encode(&self, item: &Self::Item) -> String;

    fn decode(&self, raw: &str) -> Result<Self::Item>;
}
