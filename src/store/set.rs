use crate::client::Client;
use crate::codec::{Parser, StringParser};
use crate::common::Result;
use crate::store::{KeySpace, StoreId};

/// One set of members per id.
pub struct SetStore<C, P = StringParser, Id = String> {
    client: C,
    keys: KeySpace<Id>,
    parser: P,
}

impl<C, P, Id> SetStore<C, P, Id>
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

    /// Returns how many members were not there before.
    pub async fn add(&mut self, id: &Id, members: &[P::Item]) -> Result<u64> {
        if members.is_empty() {
            return Ok(0);
        }
        let key = self.keys.id_to_key(id);
        let members = self.encode_all(members);
        self.client.sadd(&key, members).await
    }

    /// Returns how many members were removed.
    pub async fn remove(&mut self, id: &Id, members: &[P::Item]) -> Result<u64> {
        if members.is_empty() {
            return Ok(0);
        }
        let key = self.keys.id_to_key(id);
        let members = self.encode_all(members);
        self.client.srem(&key, members).await
    }

    pub async fn contains(&mut self, id: &Id, member: &P::Item) -> Result<bool> {
        let key = self.keys.id_to_key(id);
        let member = self.parser.encode(member);
        self.client.sismember(&key, &member).await
    }

    pub async fn members(&mut self, id: &Id) -> Result<Vec<P::Item>> {
        let key = self.keys.id_to_key(id);
        self.client
            .smembers(&key)
            .await?
            .iter()
            .map(|raw| self.parser.decode(raw))
            .collect()
    }

    fn encode_all(&self, members: &[P::Item]) -> Vec<String> {
        members.iter().map(|m| self.parser.encode(m)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryClient;
    use crate::codec::NumberParser;

    #[test]
    fn membership() {
        tokio_test::block_on(async move {
            let mut followers =
                SetStore::<_, StringParser, u64>::new(MemoryClient::new(), "followers:");

            assert_eq!(
                followers
                    .add(&1, &["bob".to_owned(), "carol".to_owned()])
                    .await
                    .unwrap(),
                2
            );
            assert_eq!(followers.add(&1, &["bob".to_owned()]).await.unwrap(), 0);
            assert!(followers.contains(&1, &"bob".to_owned()).await.unwrap());
            assert!(!followers.contains(&2, &"bob".to_owned()).await.unwrap());

            assert_eq!(
                followers.remove(&1, &["bob".to_owned()]).await.unwrap(),
                1
            );
            assert_eq!(
                followers.members(&1).await.unwrap(),
                vec!["carol".to_owned()]
            );
            assert_eq!(followers.add(&1, &[]).await.unwrap(), 0);
        })
    }

    #[test]
    fn typed_members() {
        tokio_test::block_on(async move {
            let mut scores =
                SetStore::<_, NumberParser, String>::new(MemoryClient::new(), "scores:");
            let id = "game".to_owned();

            scores.add(&id, &[1.0, 2.5]).await.unwrap();
            let mut members = scores.members(&id).await.unwrap();
            members.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(members, vec![1.0, 2.5]);
        })
    }
}
