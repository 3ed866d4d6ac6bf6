use serde::Deserialize;

use crate::search::{IndexDeclaration, IndexOptions, IndexSchema, KeyType};

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub redis: RedisConfig,
    // Indexes kept in sync on startup.
    #[serde(default)]
    pub indexes: Vec<IndexConfig>,
}

impl Config {
    pub fn index(&self, name: &str) -> Option<&IndexConfig> {
        self.indexes.iter().find(|index| index.name == name)
    }
}

// Connection configuration.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    // redis://[user:password@]host:port[/db]
    url: Option<String>,
}

impl RedisConfig {
    const DEFAULT_URL: &'static str = "redis://127.0.0.1:6379";

    pub fn set_url(&mut self, val: &mut Option<String>) {
        if let Some(val) = val.take() {
            self.url = Some(val)
        }
    }

    pub fn override_merge(&mut self, other: &mut RedisConfig) {
        self.set_url(&mut other.url);
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or(RedisConfig::DEFAULT_URL)
    }
}

/// One secondary index as written in the config file.
///
/// ```yaml
/// name: users-idx
/// on: json
/// prefixes: ["user:"]
/// fields:
///   status: { path: $.status, kind: tag }
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct IndexConfig {
    pub name: String,
    #[serde(default)]
    pub on: Option<KeyType>,
    #[serde(default)]
    pub prefixes: Vec<String>,
    pub fields: IndexSchema,
}

impl IndexConfig {
    pub fn declaration(&self) -> IndexDeclaration {
        IndexDeclaration::new(
            self.name.clone(),
            self.fields.clone(),
            IndexOptions {
                on: self.on.unwrap_or_default(),
                prefixes: self.prefixes.clone(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::FieldKind;

    #[test]
    fn parse_yaml() {
        let config = serde_yaml::from_str::<Config>(
            r#"
redis:
  url: redis://cache:6380
indexes:
  - name: users-idx
    prefixes: ["user:"]
    fields:
      status: { path: $.status, kind: tag }
      age: { path: $.age, kind: numeric }
  - name: sessions-idx
    on: hash
    fields:
      owner: { path: owner, kind: tag }
"#,
        )
        .unwrap();

        assert_eq!(config.redis.url(), "redis://cache:6380");

        let users = config.index("users-idx").unwrap().declaration();
        assert_eq!(users.options, IndexOptions::json(["user:"]));
        assert_eq!(users.schema.kind_of("age"), Some(FieldKind::Numeric));

        let sessions = config.index("sessions-idx").unwrap().declaration();
        assert_eq!(sessions.options.on, KeyType::Hash);
        assert!(sessions.options.prefixes.is_empty());
        assert!(config.index("missing").is_none());
    }

    #[test]
    fn url_override() {
        let mut config = RedisConfig::default();
        assert_eq!(config.url(), "redis://127.0.0.1:6379");

        config.override_merge(&mut RedisConfig { url: None });
        assert_eq!(config.url(), "redis://127.0.0.1:6379");

        config.override_merge(&mut RedisConfig {
            url: Some("redis://other:1".to_owned()),
        });
        assert_eq!(config.url(), "redis://other:1");
    }
}
