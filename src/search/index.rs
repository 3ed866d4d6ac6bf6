use crate::client::Client;
use crate::common::{debug, info, warn, Result};
use crate::search::{has_changed, IndexOptions, IndexSchema};

/// A named index together with what it should look like.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDeclaration {
    pub name: String,
    pub schema: IndexSchema,
    pub options: IndexOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Absent,
    Unchanged,
    Changed,
}

/// What [`IndexDeclaration::reconcile`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    Created,
    Reused,
    Recreated,
}

impl IndexDeclaration {
    pub fn new(name: impl Into<String>, schema: IndexSchema, options: IndexOptions) -> Self {
        Self {
            name: name.into(),
            schema,
            options,
        }
    }

    /// Compare the declaration with what the store currently has.
    pub async fn state<C: Client>(&self, client: &mut C) -> Result<IndexState> {
        let indexes = client.ft_list().await?;
        if !indexes.iter().any(|name| name == &self.name) {
            return Ok(IndexState::Absent);
        }

        let live = client.ft_info(&self.name).await?;
        debug!(index=%self.name, ?live, "Live index");

        if has_changed(&self.schema, &self.options, &live) {
            Ok(IndexState::Changed)
        } else {
            Ok(IndexState::Unchanged)
        }
    }

    /// Make the store's index match the declaration.
    ///
    /// A changed index is dropped and created again. This is not atomic:
    /// if creation fails the index is left absent and the next call
    /// creates it.
    pub async fn reconcile<C: Client>(&self, client: &mut C) -> Result<IndexStatus> {
        let status = match self.state(client).await? {
            IndexState::Unchanged => IndexStatus::Reused,
            IndexState::Absent => {
                client
                    .ft_create(&self.name, &self.schema, &self.options)
                    .await?;
                IndexStatus::Created
            }
            IndexState::Changed => {
                warn!(index=%self.name, "Index definition changed, recreating");
                client.ft_dropindex(&self.name).await?;
                client
                    .ft_create(&self.name, &self.schema, &self.options)
                    .await?;
                IndexStatus::Recreated
            }
        };

        info!(index=%self.name, ?status, "Index ready");

        Ok(status)
    }
}
