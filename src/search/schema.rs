use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Tag,
    Text,
    Numeric,
    Geo,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Tag => "TAG",
            FieldKind::Text => "TEXT",
            FieldKind::Numeric => "NUMERIC",
            FieldKind::Geo => "GEO",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSpec {
    // Document path ("$.status") or hash field name.
    pub path: String,
    pub kind: FieldKind,
}

/// Declared index fields, keyed by the alias queries refer to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct IndexSchema {
    fields: BTreeMap<String, FieldSpec>,
}

impl IndexSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        alias: impl Into<String>,
        path: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        self.fields.insert(
            alias.into(),
            FieldSpec {
                path: path.into(),
                kind,
            },
        );
        self
    }

    pub fn tag(self, alias: impl Into<String>, path: impl Into<String>) -> Self {
        self.field(alias, path, FieldKind::Tag)
    }

    pub fn text(self, alias: impl Into<String>, path: impl Into<String>) -> Self {
        self.field(alias, path, FieldKind::Text)
    }

    pub fn numeric(self, alias: impl Into<String>, path: impl Into<String>) -> Self {
        self.field(alias, path, FieldKind::Numeric)
    }

    pub fn geo(self, alias: impl Into<String>, path: impl Into<String>) -> Self {
        self.field(alias, path, FieldKind::Geo)
    }

    pub fn get(&self, alias: &str) -> Option<&FieldSpec> {
        self.fields.get(alias)
    }

    pub fn kind_of(&self, alias: &str) -> Option<FieldKind> {
        self.get(alias).map(|spec| spec.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(alias, spec)| (alias.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Kind of key the index reads documents from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Hash,
    #[default]
    Json,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Hash => "HASH",
            KeyType::Json => "JSON",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOptions {
    pub on: KeyType,
    pub prefixes: Vec<String>,
}

impl IndexOptions {
    pub fn json<S: Into<String>>(prefixes: impl IntoIterator<Item = S>) -> Self {
        Self {
            on: KeyType::Json,
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn hash<S: Into<String>>(prefixes: impl IntoIterator<Item = S>) -> Self {
        Self {
            on: KeyType::Hash,
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_schema() {
        let schema: IndexSchema = serde_yaml::from_str(
            r#"
status:
  path: $.status
  kind: tag
name:
  path: $.name
  kind: text
"#,
        )
        .unwrap();

        assert_eq!(
            schema,
            IndexSchema::new()
                .tag("status", "$.status")
                .text("name", "$.name")
        );
        assert_eq!(schema.kind_of("status"), Some(FieldKind::Tag));
        assert_eq!(schema.kind_of("other"), None);
    }
}
