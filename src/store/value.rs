use crate::client::{Client, SetOptions};
use crate::codec::{BooleanParser, JsonParser, NumberParser, Parser, StringParser};
use crate::common::Result;
use crate::store::{KeySpace, StoreId};

/// One value per key, converted with a [`Parser`].
pub struct ValueStore<C, P, Id = String> {
    client: C,
    keys: KeySpace<Id>,
    parser: P,
}

pub type StringStore<C, Id = String> = ValueStore<C, StringParser, Id>;
pub type NumberStore<C, Id = String> = ValueStore<C, NumberParser, Id>;
pub type BooleanStore<C, Id = String> = ValueStore<C, BooleanParser, Id>;
pub type JsonStore<C, Id = String> = ValueStore<C, JsonParser, Id>;

impl<C, P, Id> ValueStore<C, P, Id>
where
    C: Client,
    P: Parser,
    Id: StoreId,
{
    pub fn new(client: C, prefix: impl Into<String>) -> Self
    where
        P: Default,
    {
        Self::with_parser(client, prefix, P::default())
    }

    pub fn with_parser(client: C, prefix: impl Into<String>, parser: P) -> Self {
        Self {
            client,
            keys: KeySpace::new(prefix),
            parser,
        }
    }

    pub fn keys(&self) -> &KeySpace<Id> {
        &self.keys
    }

    pub async fn get(&mut self, id: &Id) -> Result<Option<P::Item>> {
        let key = self.keys.id_to_key(id);
        self.client
            .get(&key)
            .await?
            .map(|raw| self.parser.decode(&raw))
            .transpose()
    }

    pub async fn set(&mut self, id: &Id, value: &P::Item) -> Result<()> {
        self.set_with(id, value, SetOptions::default()).await?;
        Ok(())
    }

    /// Returns false when the set condition kept the value from being written.
    pub async fn set_with(
        &mut self,
        id: &Id,
        value: &P::Item,
        options: SetOptions,
    ) -> Result<bool> {
        let key = self.keys.id_to_key(id);
        self.client
            .set(&key, self.parser.encode(value), options)
            .await
    }

    /// Values of the ids that exist, in request order.
    pub async fn get_many(&mut self, ids: &[Id]) -> Result<Vec<P::Item>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys = self.keys.ids_to_keys(ids);

        self.client
            .mget(&keys)
            .await?
            .into_iter()
            .flatten()
            .map(|raw| self.parser.decode(&raw))
            .collect()
    }

    /// Like [`get_many`](Self::get_many), keeping the id next to each value.
    pub async fn get_many_with_ids(&mut self, ids: &[Id]) -> Result<Vec<(Id, P::Item)>>
    where
        Id: Clone,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys = self.keys.ids_to_keys(ids);
        let values = self.client.mget(&keys).await?;

        ids.iter()
            .zip(values)
            .filter_map(|(id, raw)| raw.map(|raw| (id, raw)))
            .map(|(id, raw)| Ok((id.clone(), self.parser.decode(&raw)?)))
            .collect()
    }

    pub async fn set_many(&mut self, entries: &[(Id, P::Item)]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let pairs = entries
            .iter()
            .map(|(id, value)| (self.keys.id_to_key(id), self.parser.encode(value)))
            .collect();

        self.client.mset(pairs).await
    }

    /// Returns whether the id existed.
    pub async fn delete(&mut self, id: &Id) -> Result<bool> {
        let key = self.keys.id_to_key(id);
        Ok(self.client.del(&[key]).await? > 0)
    }

    pub async fn delete_many(&mut self, ids: &[Id]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let keys = self.keys.ids_to_keys(ids);
        self.client.del(&keys).await
    }

    pub async fn ids(&mut self) -> Result<Vec<Id>> {
        self.client
            .keys(&self.keys.pattern())
            .await?
            .iter()
            .map(|key| self.keys.key_to_id(key))
            .collect()
    }

    /// Every id with its value.
    pub async fn get_all(&mut self) -> Result<Vec<(Id, P::Item)>> {
        let keys = self.client.keys(&self.keys.pattern()).await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let values = self.client.mget(&keys).await?;

        keys.iter()
            .zip(values)
            .filter_map(|(key, raw)| raw.map(|raw| (key, raw)))
            .map(|(key, raw)| Ok((self.keys.key_to_id(key)?, self.parser.decode(&raw)?)))
            .collect()
    }
}
