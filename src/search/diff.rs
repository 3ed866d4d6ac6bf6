use std::collections::{HashMap, HashSet};

use crate::search::{FieldKind, IndexOptions, IndexSchema};

/// Index description as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    pub attributes: Vec<LiveAttribute>,
    pub definition: LiveDefinition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveAttribute {
    // Path or hash field the attribute reads.
    pub identifier: String,
    pub alias: String,
    // Type name as reported, e.g. "TAG".
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveDefinition {
    pub key_type: String,
    pub prefixes: Vec<String>,
}

impl IndexInfo {
    /// What the store reports right after creating an index from this declaration.
    pub fn from_declaration(schema: &IndexSchema, options: &IndexOptions) -> Self {
        Self {
            attributes: schema
                .iter()
                .map(|(alias, spec)| LiveAttribute {
                    identifier: spec.path.clone(),
                    alias: alias.to_owned(),
                    kind: spec.kind.as_str().to_owned(),
                })
                .collect(),
            definition: LiveDefinition {
                key_type: options.on.as_str().to_owned(),
                prefixes: if options.prefixes.is_empty() {
                    vec![String::new()]
                } else {
                    options.prefixes.clone()
                },
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum AttributeProperty {
    Kind,
    Alias,
}

impl AttributeProperty {
    const ALL: [AttributeProperty; 2] = [AttributeProperty::Kind, AttributeProperty::Alias];

    fn matches(&self, declared: &Declared, live: &LiveAttribute) -> bool {
        match self {
            AttributeProperty::Kind => live.kind.eq_ignore_ascii_case(declared.kind.as_str()),
            AttributeProperty::Alias => live.alias == declared.alias,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum DefinitionProperty {
    KeyType,
    Prefixes,
}

impl DefinitionProperty {
    const ALL: [DefinitionProperty; 2] =
        [DefinitionProperty::KeyType, DefinitionProperty::Prefixes];

    fn matches(&self, declared: &IndexOptions, live: &LiveDefinition) -> bool {
        match self {
            DefinitionProperty::KeyType => {
                live.key_type.eq_ignore_ascii_case(declared.on.as_str())
            }
            DefinitionProperty::Prefixes => {
                prefix_set(&declared.prefixes) == prefix_set(&live.prefixes)
            }
        }
    }
}

// An index created without prefixes covers every key and is reported with
// the single prefix "".
fn prefix_set(prefixes: &[String]) -> HashSet<&str> {
    if prefixes.is_empty() {
        return HashSet::from([""]);
    }
    prefixes.iter().map(String::as_str).collect()
}

struct Declared<'a> {
    alias: &'a str,
    kind: FieldKind,
}

/// Whether the live index differs from the declaration and must be rebuilt.
pub fn has_changed(schema: &IndexSchema, options: &IndexOptions, live: &IndexInfo) -> bool {
    let declared = schema
        .iter()
        .map(|(alias, spec)| (spec.path.as_str(), Declared { alias, kind: spec.kind }))
        .collect::<HashMap<_, _>>();
    let live_attributes = live
        .attributes
        .iter()
        .map(|attr| (attr.identifier.as_str(), attr))
        .collect::<HashMap<_, _>>();

    if declared.len() != live_attributes.len() {
        return true;
    }

    let attributes_changed = declared.iter().any(|(path, declared)| {
        match live_attributes.get(path) {
            Some(live) => !AttributeProperty::ALL
                .iter()
                .all(|property| property.matches(declared, live)),
            None => true,
        }
    });
    if attributes_changed {
        return true;
    }

    !DefinitionProperty::ALL
        .iter()
        .all(|property| property.matches(options, &live.definition))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared() -> (IndexSchema, IndexOptions) {
        (
            IndexSchema::new()
                .tag("status", "$.status")
                .text("name", "$.name")
                .numeric("age", "$.age"),
            IndexOptions::json(["user:", "admin:"]),
        )
    }

    #[test]
    fn unchanged() {
        let (schema, options) = declared();
        let live = IndexInfo::from_declaration(&schema, &options);

        assert!(!has_changed(&schema, &options, &live));
    }

    #[test]
    fn prefix_order_and_type_name_case_are_ignored() {
        let (schema, options) = declared();
        let mut live = IndexInfo::from_declaration(&schema, &options);
        live.definition.prefixes.reverse();
        live.definition.key_type = "json".into();
        for attr in live.attributes.iter_mut() {
            attr.kind = attr.kind.to_lowercase();
        }

        assert!(!has_changed(&schema, &options, &live));
    }

    #[test]
    fn kind_changed() {
        let (schema, options) = declared();
        let live = IndexInfo::from_declaration(&schema, &options);
        let schema = schema.text("status", "$.status");

        assert!(has_changed(&schema, &options, &live));
    }

    #[test]
    fn alias_changed() {
        let (schema, options) = declared();
        let mut live = IndexInfo::from_declaration(&schema, &options);
        live.attributes[0].alias = "renamed".into();

        assert!(has_changed(&schema, &options, &live));
    }

    #[test]
    fn prefixes_changed() {
        let (schema, options) = declared();
        let live = IndexInfo::from_declaration(&schema, &options);

        assert!(has_changed(&schema, &IndexOptions::json(["user:"]), &live));
        assert!(has_changed(
            &schema,
            &IndexOptions::json(["user:", "admin:", "guest:"]),
            &live
        ));
    }

    #[test]
    fn key_type_changed() {
        let (schema, options) = declared();
        let live = IndexInfo::from_declaration(&schema, &options);

        assert!(has_changed(
            &schema,
            &IndexOptions::hash(["user:", "admin:"]),
            &live
        ));
    }

    #[test]
    fn field_missing_live() {
        let (schema, options) = declared();
        let mut live = IndexInfo::from_declaration(&schema, &options);
        live.attributes.pop();

        assert!(has_changed(&schema, &options, &live));

        // Same count, different path.
        let mut live = IndexInfo::from_declaration(&schema, &options);
        live.attributes[0].identifier = "$.other".into();
        assert!(has_changed(&schema, &options, &live));
    }

    #[test]
    fn no_prefixes_matches_catch_all() {
        let (schema, _) = declared();
        let options = IndexOptions::hash(Vec::<String>::new());
        let mut live = IndexInfo::from_declaration(&schema, &options);
        assert_eq!(live.definition.prefixes, vec![String::new()]);
        assert!(!has_changed(&schema, &options, &live));

        live.definition.prefixes = Vec::new();
        assert!(!has_changed(&schema, &options, &live));

        assert!(has_changed(&schema, &IndexOptions::hash(["user:"]), &live));
    }
}
