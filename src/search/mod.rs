//! Query building and index bookkeeping for the search module.

mod schema;
pub use schema::{FieldKind, FieldSpec, IndexOptions, IndexSchema, KeyType};

mod filter;
pub use filter::{Filter, FilterValue};

mod query;
pub use query::{
    compile, expand_wildcard, SearchOptions, SearchQuery, SortBy, SortOrder, TextSearch,
};

mod diff;
pub use diff::{has_changed, IndexInfo, LiveAttribute, LiveDefinition};

mod index;
pub use index::{IndexDeclaration, IndexState, IndexStatus};
