use clap::{ArgAction, Args};

use crate::cli::{initializer, ClientOptions};
use crate::config::Config;
use crate::search::{Filter, IndexSchema, SearchQuery, TextSearch};
use crate::{Error, ErrorKind, Result};

/// Print the query a filter compiles to
#[derive(Args, Debug, Default)]
pub struct CompileCommand {
    /// Configured index whose schema decides which fields are tags
    #[arg(long)]
    pub index: Option<String>,
    /// Filter as json, e.g. '{"AND": [{"status": "active"}]}'
    #[arg(long)]
    pub filter: Option<String>,
    /// Free-text term
    #[arg(long)]
    pub text: Option<String>,
    /// Restrict the text term to these fields
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,
    /// Use the text term as is, without wildcard expansion
    #[arg(long, action = ArgAction::SetTrue)]
    pub exact: bool,
}

impl CompileCommand {
    pub async fn run(self, options: ClientOptions) -> Result<()> {
        let initializer = initializer(options).await?;
        println!("{}", self.execute(&initializer.config)?);
        Ok(())
    }

    pub fn execute(&self, config: &Config) -> Result<String> {
        let schema = match self.index.as_deref() {
            Some(name) => config
                .index(name)
                .map(|index| index.fields.clone())
                .ok_or_else(|| {
                    Error::from(ErrorKind::UnknownIndex {
                        name: name.to_owned(),
                    })
                })?,
            None => IndexSchema::new(),
        };

        let mut query = SearchQuery::new();
        if let Some(filter) = &self.filter {
            let json = serde_json::from_str(filter)?;
            query = query.filter(Filter::from_json(&json)?);
        }
        if let Some(term) = &self.text {
            let mut text = TextSearch::new(term.as_str()).in_fields(self.fields.iter().cloned());
            if self.exact {
                text = text.exact();
            }
            query = query.text(text);
        }

        query.compile(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;

    fn config() -> Config {
        Config {
            indexes: vec![IndexConfig {
                name: "items".to_owned(),
                on: None,
                prefixes: vec!["item:".to_owned()],
                fields: IndexSchema::new()
                    .text("status", "$.status")
                    .tag("tag", "$.tag"),
            }],
            ..Config::default()
        }
    }

    #[test]
    fn filter_and_text() {
        let cmd = CompileCommand {
            index: Some("items".to_owned()),
            filter: Some(
                r#"{"AND": [{"status": "active"}, {"OR": [{"tag": "x"}, {"tag": "y"}]}]}"#
                    .to_owned(),
            ),
            text: Some("hello world".to_owned()),
            ..CompileCommand::default()
        };

        assert_eq!(
            cmd.execute(&config()).unwrap(),
            "((@status:active) ((@tag:{x}) | (@tag:{y}))) *hello*world*"
        );
    }

    #[test]
    fn unknown_index_is_rejected() {
        let cmd = CompileCommand {
            index: Some("missing".to_owned()),
            filter: Some(r#"{"tag": "x"}"#.to_owned()),
            ..CompileCommand::default()
        };
        let err = cmd.execute(&config()).unwrap_err();
        assert!(err.is_unknown_index());
        assert_eq!(err.to_string(), "index \"missing\" is not configured");

        // Without an index every field compiles as non-tag.
        let cmd = CompileCommand {
            filter: Some(r#"{"tag": "x"}"#.to_owned()),
            ..CompileCommand::default()
        };
        assert_eq!(cmd.execute(&config()).unwrap(), "(@tag:x)");
    }

    #[test]
    fn bad_input() {
        let cmd = CompileCommand {
            filter: Some(r#"{"OR": []}"#.to_owned()),
            ..CompileCommand::default()
        };
        assert!(cmd.execute(&config()).unwrap_err().is_invalid_filter());

        let cmd = CompileCommand {
            filter: Some("not json".to_owned()),
            ..CompileCommand::default()
        };
        assert!(matches!(
            cmd.execute(&config()).unwrap_err().kind(),
            crate::ErrorKind::Json(_)
        ));
    }
}
