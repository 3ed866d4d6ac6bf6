use crate::client::Client;
use crate::codec::{from_document, to_document, Value};
use crate::common::Result;
use crate::store::{KeySpace, StoreId};

/// Structured values kept as native JSON documents.
///
/// Dates and absent values are sentineled the same way as in string slots,
/// the rest of the value is stored as is.
pub struct DocumentStore<C, Id = String> {
    client: C,
    keys: KeySpace<Id>,
}

impl<C, Id> DocumentStore<C, Id>
where
    C: Client,
    Id: StoreId,
{
    pub fn new(client: C, prefix: impl Into<String>) -> Self {
        Self {
            client,
            keys: KeySpace::new(prefix),
        }
    }

    pub fn keys(&self) -> &KeySpace<Id> {
        &self.keys
    }

    pub(crate) fn client(&mut self) -> &mut C {
        &mut self.client
    }

    pub async fn get(&mut self, id: &Id) -> Result<Option<Value>> {
        let key = self.keys.id_to_key(id);
        Ok(self.client.json_get(&key).await?.map(from_document))
    }

    pub async fn set(&mut self, id: &Id, value: &Value) -> Result<()> {
        let key = self.keys.id_to_key(id);
        self.client.json_set(&key, &to_document(value)).await
    }

    /// Documents of the ids that exist, in request order.
    pub async fn get_many(&mut self, ids: &[Id]) -> Result<Vec<Value>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys = self.keys.ids_to_keys(ids);

        Ok(self
            .client
            .json_mget(&keys)
            .await?
            .into_iter()
            .flatten()
            .map(from_document)
            .collect())
    }

    pub async fn delete(&mut self, id: &Id) -> Result<bool> {
        let key = self.keys.id_to_key(id);
        Ok(self.client.del(&[key]).await? > 0)
    }

    pub async fn ids(&mut self) -> Result<Vec<Id>> {
        self.client
            .keys(&self.keys.pattern())
            .await?
            .iter()
            .map(|key| self.keys.key_to_id(key))
            .collect()
    }
}
