use crate::common::{Error, ErrorKind, Result};
use crate::search::{Filter, IndexSchema};

/// Compile a filter tree into query syntax.
pub fn compile(filter: &Filter, schema: &IndexSchema) -> Result<String> {
    filter.compile(schema)
}

/// Turn a term into a substring match: `"hello world"` -> `*hello*world*`.
pub fn expand_wildcard(term: &str) -> String {
    format!("*{}*", term.split_whitespace().collect::<Vec<_>>().join("*"))
}

/// Free-text part of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSearch {
    pub term: String,
    // Restrict the match to these fields. Empty means the whole document.
    pub fields: Vec<String>,
    pub wildcard: bool,
}

impl TextSearch {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            fields: Vec::new(),
            wildcard: true,
        }
    }

    pub fn in_fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Use the trimmed term as is, without wildcard expansion.
    pub fn exact(mut self) -> Self {
        self.wildcard = false;
        self
    }

    pub fn compile(&self) -> Result<String> {
        let term = self.term.trim();
        if term.is_empty() {
            return Err(Error::from(ErrorKind::UnsupportedSearchTerm {
                term: self.term.clone(),
            }));
        }

        let term = if self.wildcard {
            expand_wildcard(term)
        } else {
            term.to_owned()
        };

        if self.fields.is_empty() {
            return Ok(term);
        }

        let matches = self
            .fields
            .iter()
            .map(|field| format!("(@{}:{})", field, term))
            .collect::<Vec<_>>();

        Ok(format!("({})", matches.join(" | ")))
    }
}

/// Filter and free text combined with an implicit AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub filter: Option<Filter>,
    pub text: Option<TextSearch>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn text(mut self, text: TextSearch) -> Self {
        self.text = Some(text);
        self
    }

    /// An empty string means nothing was asked for and nothing matches.
    pub fn compile(&self, schema: &IndexSchema) -> Result<String> {
        let mut parts = Vec::with_capacity(2);

        if let Some(filter) = &self.filter {
            parts.push(filter.compile(schema)?);
        }
        if let Some(text) = &self.text {
            parts.push(text.compile()?);
        }

        Ok(parts.join(" "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBy {
    pub field: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub offset: usize,
    pub limit: usize,
    pub sort_by: Option<SortBy>,
    // Return keys only.
    pub no_content: bool,
}

impl SearchOptions {
    const DEFAULT_LIMIT: usize = 10;

    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(SortBy {
            field: field.into(),
            order,
        });
        self
    }

    pub fn ids_only(mut self) -> Self {
        self.no_content = true;
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: SearchOptions::DEFAULT_LIMIT,
            sort_by: None,
            no_content: false,
        }
    }
}
