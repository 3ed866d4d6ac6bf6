use std::fmt;

use serde_json::Value as Json;

use crate::common::{Error, Result};
use crate::search::{FieldKind, IndexSchema};

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FilterValue::Text(s) => f.write_str(s),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Number(n)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(n as f64)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

/// Condition tree compiled into a search query.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Field {
        name: String,
        value: FilterValue,
    },
    // Inclusive numeric range, open on a side when the bound is None.
    Range {
        name: String,
        min: Option<f64>,
        max: Option<f64>,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Filter::Field {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn range(name: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        Filter::Range {
            name: name.into(),
            min,
            max,
        }
    }

    pub fn and(children: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(children.into_iter().collect())
    }

    /// Read the dynamic form `{"AND": [..]}`, `{"OR": [..]}`, `{"field": value}`.
    ///
    /// An object holding several field entries is the conjunction of them.
    /// A field whose value is an object with `min` and/or `max` is a range.
    pub fn from_json(json: &Json) -> Result<Filter> {
        let object = json
            .as_object()
            .ok_or_else(|| Error::invalid_filter(format!("expected object, got {}", json)))?;

        let mut filters = Vec::with_capacity(object.len());
        for (key, value) in object {
            let filter = match key.as_str() {
                "AND" => Filter::And(Filter::children(key, value)?),
                "OR" => Filter::Or(Filter::children(key, value)?),
                name => Filter::leaf(name, value)?,
            };
            filters.push(filter);
        }

        if filters.len() > 1 {
            return Ok(Filter::And(filters));
        }
        filters
            .pop()
            .ok_or_else(|| Error::invalid_filter("empty filter object"))
    }

    /// Compile into query syntax, looking up field kinds in `schema`.
    pub fn compile(&self, schema: &IndexSchema) -> Result<String> {
        match self {
            Filter::Field { name, value } => Ok(match schema.kind_of(name) {
                Some(FieldKind::Tag) => format!("(@{}:{{{}}})", name, value),
                _ => format!("(@{}:{})", name, value),
            }),
            Filter::Range { name, min, max } => Ok(format!(
                "(@{}:[{} {}])",
                name,
                min.map(|n| n.to_string()).unwrap_or_else(|| "-inf".into()),
                max.map(|n| n.to_string()).unwrap_or_else(|| "+inf".into()),
            )),
            Filter::And(children) => {
                if children.is_empty() {
                    return Err(Error::invalid_filter("AND requires at least one term"));
                }
                Ok(format!("({})", Filter::compile_all(children, schema)?.join(" ")))
            }
            Filter::Or(children) => {
                if children.is_empty() {
                    return Err(Error::invalid_filter("OR requires at least one term"));
                }
                Ok(format!(
                    "({})",
                    Filter::compile_all(children, schema)?.join(" | ")
                ))
            }
        }
    }

    fn compile_all(children: &[Filter], schema: &IndexSchema) -> Result<Vec<String>> {
        children.iter().map(|c| c.compile(schema)).collect()
    }

    fn children(key: &str, json: &Json) -> Result<Vec<Filter>> {
        json.as_array()
            .ok_or_else(|| Error::invalid_filter(format!("{} expects an array", key)))?
            .iter()
            .map(Filter::from_json)
            .collect()
    }

    fn leaf(name: &str, json: &Json) -> Result<Filter> {
        let value = match json {
            Json::String(s) => FilterValue::Text(s.clone()),
            Json::Bool(b) => FilterValue::Bool(*b),
            Json::Number(n) => n
                .as_f64()
                .map(FilterValue::Number)
                .ok_or_else(|| Error::invalid_filter(format!("{}: bad number {}", name, n)))?,
            Json::Object(bounds) => {
                let bound = |key: &str| -> Result<Option<f64>> {
                    match bounds.get(key) {
                        None | Some(Json::Null) => Ok(None),
                        Some(v) => v.as_f64().map(Some).ok_or_else(|| {
                            Error::invalid_filter(format!("{}.{} must be a number", name, key))
                        }),
                    }
                };
                if bounds.keys().any(|k| k != "min" && k != "max") {
                    return Err(Error::invalid_filter(format!(
                        "{}: range accepts only min and max",
                        name
                    )));
                }
                return Ok(Filter::range(name, bound("min")?, bound("max")?));
            }
            other => {
                return Err(Error::invalid_filter(format!(
                    "{}: unsupported value {}",
                    name, other
                )))
            }
        };

        Ok(Filter::eq(name, value))
    }
}
