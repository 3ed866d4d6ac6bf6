//! Typed stores keyed by an application id.
//!
//! Every store owns a client handle and a key prefix. Ids are turned into
//! keys by prepending the prefix, and keys read back from the store are
//! turned into ids by stripping it.

mod keyspace;
pub use keyspace::{KeySpace, StoreId};

mod value;
pub use value::{BooleanStore, JsonStore, NumberStore, StringStore, ValueStore};

mod set;
pub use set::SetStore;

mod document;
pub use document::DocumentStore;

mod search;
pub use search::{SearchHit, SearchResults, SearchStore};
