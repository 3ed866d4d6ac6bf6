use crate::client::Client;
use crate::codec::{from_document, Value};
use crate::common::{debug, Result};
use crate::search::{
    IndexDeclaration, IndexOptions, IndexSchema, IndexStatus, SearchOptions, SearchQuery,
};
use crate::store::{DocumentStore, StoreId};

/// Documents under one prefix, searchable through a secondary index.
pub struct SearchStore<C, Id = String> {
    documents: DocumentStore<C, Id>,
    index: IndexDeclaration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults<Id> {
    // Matches before paging.
    pub total: u64,
    pub hits: Vec<SearchHit<Id>>,
}

impl<Id> SearchResults<Id> {
    fn empty() -> Self {
        Self {
            total: 0,
            hits: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<Id> {
    pub id: Id,
    pub document: Option<Value>,
}

impl<C, Id> SearchStore<C, Id>
where
    C: Client,
    Id: StoreId,
{
    /// The index covers every JSON document under `prefix`.
    pub fn new(
        client: C,
        prefix: impl Into<String>,
        index_name: impl Into<String>,
        schema: IndexSchema,
    ) -> Self {
        let documents = DocumentStore::new(client, prefix);
        let options = IndexOptions::json([documents.keys().prefix()]);

        Self {
            index: IndexDeclaration::new(index_name, schema, options),
            documents,
        }
    }

    /// Create the index, or recreate it when the live one differs.
    pub async fn init(&mut self) -> Result<IndexStatus> {
        self.index.reconcile(self.documents.client()).await
    }

    pub fn declaration(&self) -> &IndexDeclaration {
        &self.index
    }

    pub fn documents(&mut self) -> &mut DocumentStore<C, Id> {
        &mut self.documents
    }

    pub async fn search(
        &mut self,
        query: &SearchQuery,
        options: &SearchOptions,
    ) -> Result<SearchResults<Id>> {
        let compiled = query.compile(&self.index.schema)?;
        if compiled.is_empty() {
            debug!(index=%self.index.name, "Empty query, nothing to search");
            return Ok(SearchResults::empty());
        }
        debug!(index=%self.index.name, query=%compiled, "Search");

        let reply = self
            .documents
            .client()
            .ft_search(&self.index.name, &compiled, options)
            .await?;

        let keys = self.documents.keys();
        let hits = reply
            .hits
            .into_iter()
            .map(|hit| {
                Ok(SearchHit {
                    id: keys.key_to_id(&hit.key)?,
                    document: hit.document.map(from_document),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SearchResults {
            total: reply.total,
            hits,
        })
    }

    /// Number of matches, without fetching any.
    pub async fn count(&mut self, query: &SearchQuery) -> Result<u64> {
        let options = SearchOptions::default().page(0, 0).ids_only();
        Ok(self.search(query, &options).await?.total)
    }
}
