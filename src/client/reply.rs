//! Reading search module replies.
//!
//! Replies are key/value lists (arrays with alternating entries, or maps
//! under RESP3) nested a few levels deep.

use redis::Value;
use serde_json::Value as Json;

use crate::client::{SearchHit, SearchReply};
use crate::common::{Error, Result};
use crate::search::{IndexInfo, LiveAttribute, LiveDefinition};

pub(super) fn index_info(value: &Value) -> Result<IndexInfo> {
    let definition = required(value, "index_definition")?;
    let key_type = required_text(definition, "key_type")?;
    let prefixes = elements(required(definition, "prefixes")?)
        .ok_or_else(|| Error::configuration_mismatch("prefixes"))?
        .iter()
        .filter_map(text)
        .collect();

    let attributes = elements(required(value, "attributes")?)
        .ok_or_else(|| Error::configuration_mismatch("attributes"))?
        .iter()
        .map(|attribute| {
            Ok(LiveAttribute {
                identifier: required_text(attribute, "identifier")?,
                alias: required_text(attribute, "attribute")?,
                kind: required_text(attribute, "type")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(IndexInfo {
        attributes,
        definition: LiveDefinition { key_type, prefixes },
    })
}

// total, then each key followed by its field list unless NOCONTENT was given.
pub(super) fn search_reply(value: &Value, no_content: bool) -> Result<SearchReply> {
    let items = elements(value)
        .ok_or_else(|| Error::invalid_format(format!("unexpected search reply {:?}", value)))?;
    let (total, rest) = items
        .split_first()
        .ok_or_else(|| Error::invalid_format("empty search reply"))?;

    let total = match total {
        Value::Int(n) => u64::try_from(*n).ok(),
        other => text(other).and_then(|s| s.parse().ok()),
    }
    .ok_or_else(|| Error::invalid_format(format!("bad search total {:?}", total)))?;

    let step = if no_content { 1 } else { 2 };
    let hits = rest
        .chunks(step)
        .map(|chunk| {
            let key = text(&chunk[0])
                .ok_or_else(|| Error::invalid_format(format!("bad search key {:?}", chunk[0])))?;
            let document = match chunk.get(1) {
                Some(fields) if !no_content => Some(document(fields)?),
                _ => None,
            };
            Ok(SearchHit { key, document })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SearchReply { total, hits })
}

// JSON indexes return the whole document under "$", hash indexes return
// field/value pairs.
fn document(fields: &Value) -> Result<Json> {
    if let Some(raw) = lookup(fields, "$").and_then(text) {
        return serde_json::from_str::<Json>(&raw).map_err(Error::from);
    }

    let fields = elements(fields)
        .ok_or_else(|| Error::invalid_format(format!("bad search fields {:?}", fields)))?;

    Ok(Json::Object(
        fields
            .chunks(2)
            .filter_map(|pair| Some((text(&pair[0])?, Json::String(text(pair.get(1)?)?))))
            .collect(),
    ))
}

fn required<'a>(value: &'a Value, key: &str) -> Result<&'a Value> {
    lookup(value, key).ok_or_else(|| Error::configuration_mismatch(key))
}

fn required_text(value: &Value, key: &str) -> Result<String> {
    required(value, key).and_then(|v| text(v).ok_or_else(|| Error::configuration_mismatch(key)))
}

fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Map(pairs) => pairs
            .iter()
            .find(|(k, _)| text(k).as_deref() == Some(key))
            .map(|(_, v)| v),
        Value::Array(items) => items
            .chunks(2)
            .find(|pair| text(&pair[0]).as_deref() == Some(key))
            .and_then(|pair| pair.get(1)),
        _ => None,
    }
}

fn elements(value: &Value) -> Option<&[Value]> {
    match value {
        Value::Array(items) | Value::Set(items) => Some(items.as_slice()),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::BulkString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::SimpleString(s) => Some(s.clone()),
        Value::VerbatimString { text, .. } => Some(text.clone()),
        Value::Okay => Some("OK".to_owned()),
        Value::Int(n) => Some(n.to_string()),
        Value::Double(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk(s: &str) -> Value {
        Value::BulkString(s.as_bytes().to_vec())
    }

    fn array<const N: usize>(items: [Value; N]) -> Value {
        Value::Array(items.into())
    }

    fn info_reply() -> Value {
        array([
            bulk("index_name"),
            bulk("users-idx"),
            bulk("index_definition"),
            array([
                bulk("key_type"),
                bulk("JSON"),
                bulk("prefixes"),
                array([bulk("user:")]),
                bulk("default_score"),
                bulk("1"),
            ]),
            bulk("attributes"),
            array([
                array([
                    bulk("identifier"),
                    bulk("$.status"),
                    bulk("attribute"),
                    bulk("status"),
                    bulk("type"),
                    bulk("TAG"),
                    bulk("SEPARATOR"),
                    bulk(","),
                ]),
                array([
                    bulk("identifier"),
                    bulk("$.name"),
                    bulk("attribute"),
                    bulk("name"),
                    bulk("type"),
                    bulk("TEXT"),
                    bulk("WEIGHT"),
                    bulk("1"),
                    bulk("SORTABLE"),
                ]),
            ]),
            bulk("num_docs"),
            Value::Int(3),
        ])
    }

    #[test]
    fn parse_index_info() {
        let info = index_info(&info_reply()).unwrap();

        assert_eq!(info.definition.key_type, "JSON");
        assert_eq!(info.definition.prefixes, vec!["user:"]);
        assert_eq!(
            info.attributes,
            vec![
                LiveAttribute {
                    identifier: "$.status".into(),
                    alias: "status".into(),
                    kind: "TAG".into(),
                },
                LiveAttribute {
                    identifier: "$.name".into(),
                    alias: "name".into(),
                    kind: "TEXT".into(),
                },
            ]
        );
    }

    #[test]
    fn index_info_without_definition() {
        let reply = array([bulk("index_name"), bulk("users-idx")]);
        let err = index_info(&reply).unwrap_err();
        assert!(err.is_configuration_mismatch());
    }

    #[test]
    fn parse_search_reply() {
        let reply = array([
            Value::Int(5),
            bulk("user:1"),
            array([bulk("$"), bulk(r#"{"name":"alice"}"#)]),
            bulk("user:2"),
            array([bulk("name"), bulk("bob")]),
        ]);

        let parsed = search_reply(&reply, false).unwrap();
        assert_eq!(parsed.total, 5);
        assert_eq!(
            parsed.hits,
            vec![
                SearchHit {
                    key: "user:1".into(),
                    document: Some(serde_json::json!({"name": "alice"})),
                },
                SearchHit {
                    key: "user:2".into(),
                    document: Some(serde_json::json!({"name": "bob"})),
                },
            ]
        );
    }

    #[test]
    fn parse_search_reply_no_content() {
        let reply = array([Value::Int(2), bulk("user:1"), bulk("user:2")]);

        let parsed = search_reply(&reply, true).unwrap();
        assert_eq!(parsed.total, 2);
        assert_eq!(
            parsed.hits.iter().map(|h| h.key.as_str()).collect::<Vec<_>>(),
            vec!["user:1", "user:2"]
        );
        assert!(parsed.hits.iter().all(|h| h.document.is_none()));
    }
}
