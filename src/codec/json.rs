use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde_json::Value as Json;

use crate::codec::{Parser, Value, ABSENT_SENTINEL, DATE_PREFIX};
use crate::common::{Error, Result};

// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Encode a value for a string slot.
///
/// A top level absent value becomes the bare sentinel, everything else is
/// written as JSON.
pub fn encode(value: &Value) -> String {
    match value {
        Value::Absent => ABSENT_SENTINEL.to_owned(),
        value => to_document(value).to_string(),
    }
}

/// Decode what [`encode`] produced.
pub fn decode(raw: &str) -> Result<Value> {
    if raw == ABSENT_SENTINEL {
        return Ok(Value::Absent);
    }

    let json = serde_json::from_str::<Json>(raw)
        .map_err(|e| Error::invalid_format(format!("stored value is not json. {}", e)))?;

    Ok(from_document(json))
}

/// Build the document handed to the JSON module.
pub fn to_document(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Absent => Json::String(ABSENT_SENTINEL.to_owned()),
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => number(*n),
        Value::Text(s) => Json::String(s.clone()),
        Value::Date(d) => Json::String(format!(
            "{}{}",
            DATE_PREFIX,
            d.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        )),
        Value::Sequence(items) => Json::Array(items.iter().map(to_document).collect()),
        Value::Mapping(entries) => Json::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), to_document(v)))
                .collect(),
        ),
    }
}

/// Rebuild a value from a document read from the JSON module.
pub fn from_document(json: Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        Json::String(s) => text(s),
        Json::Array(items) => Value::Sequence(items.into_iter().map(from_document).collect()),
        Json::Object(entries) => Value::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k, from_document(v)))
                .collect(),
        ),
    }
}

// Integral numbers are written without a fraction so other clients read
// them back as integers. JSON has no NaN or infinity.
fn number(n: f64) -> Json {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Json::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Json::Number)
            .unwrap_or(Json::Null)
    }
}

fn text(s: String) -> Value {
    if s == ABSENT_SENTINEL {
        return Value::Absent;
    }
    if let Some(date) = s.strip_prefix(DATE_PREFIX).and_then(parse_date) {
        return Value::Date(date.with_timezone(&Utc));
    }
    Value::Text(s)
}

// Years outside 0000-9999 are written signed ("+10000", "-0001"), which
// strict RFC 3339 rejects.
fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| raw.parse::<DateTime<FixedOffset>>())
        .ok()
}

/// Parser for structured values kept in string slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl Parser for JsonParser {
    type Item = Value;

    fn encode(&self, item: &Value) -> String {
        encode(item)
    }

    fn decode(&self, raw: &str) -> Result<Value> {
        decode(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn round_trip(v: Value) {
        assert_eq!(decode(&encode(&v)).unwrap(), v, "encoded: {}", encode(&v));
    }

    #[test]
    fn scalars_round_trip() {
        round_trip(Value::Null);
        round_trip(Value::Bool(true));
        round_trip(Value::Number(42.0));
        round_trip(Value::Number(-1.25));
        round_trip(Value::Text("hello".into()));
        round_trip(Value::Text("".into()));
    }

    #[test]
    fn absent_is_bare_sentinel() {
        assert_eq!(encode(&Value::Absent), "$undefined");
        assert_eq!(decode("$undefined").unwrap(), Value::Absent);
    }

    #[test]
    fn date_keeps_instant() {
        let d = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 5).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);

        assert_eq!(
            encode(&Value::Date(d)),
            "\"$date:2024-02-29T12:30:05.123456789Z\""
        );
        round_trip(Value::Date(d));
    }

    #[test]
    fn date_outside_four_digit_years() {
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            encode(&Value::Date(far)),
            "\"$date:+10000-01-01T00:00:00Z\""
        );
        round_trip(Value::Date(far));

        let before = Utc.with_ymd_and_hms(-1, 6, 15, 8, 0, 0).unwrap();
        round_trip(Value::Date(before));
    }

    #[test]
    fn nested_round_trip() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        let v = Value::mapping([(
            "a",
            Value::sequence([Value::from(1), Value::Absent, Value::Date(epoch)]),
        )]);

        assert_eq!(
            encode(&v),
            r#"{"a":[1,"$undefined","$date:1970-01-01T00:00:00Z"]}"#
        );
        round_trip(v);
    }

    #[test]
    fn sentinel_collision_is_not_distinguished() {
        let v = Value::Text(ABSENT_SENTINEL.into());
        assert_eq!(decode(&encode(&v)).unwrap(), Value::Absent);
    }

    #[test]
    fn unparsable_date_stays_text() {
        assert_eq!(
            decode("\"$date:yesterday\"").unwrap(),
            Value::Text("$date:yesterday".into())
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(encode(&Value::Number(3.0)), "3");
        assert_eq!(encode(&Value::Number(0.5)), "0.5");
        assert_eq!(encode(&Value::Number(f64::NAN)), "null");
        assert_eq!(encode(&Value::Number(f64::INFINITY)), "null");
    }

    #[test]
    fn invalid_json() {
        let err = decode("{not json").unwrap_err();
        assert!(err.is_invalid_format());
    }

    #[test]
    fn document_variant_is_not_stringified() {
        let v = Value::mapping([("missing", Value::Absent), ("n", Value::from(1))]);
        let doc = to_document(&v);

        assert_eq!(doc, serde_json::json!({"missing": "$undefined", "n": 1}));
        assert_eq!(from_document(doc), v);
    }
}
