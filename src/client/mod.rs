use async_trait::async_trait;
use serde_json::Value as Json;

use crate::search::{IndexInfo, IndexOptions, IndexSchema, SearchOptions};
use crate::Result;

mod memory;
pub use memory::MemoryClient;

mod remote;
pub use remote::RedisClient;

mod reply;

/// Commands the stores are built on.
///
/// Failures of the underlying connection are returned unchanged.
#[async_trait]
pub trait Client: Send {
    async fn get(&mut self, key: &str) -> Result<Option<String>>;
    /// Returns false when a set condition prevented the write.
    async fn set(&mut self, key: &str, value: String, options: SetOptions) -> Result<bool>;
    async fn mget(&mut self, keys: &[String]) -> Result<Vec<Option<String>>>;
    async fn mset(&mut self, pairs: Vec<(String, String)>) -> Result<()>;
    async fn del(&mut self, keys: &[String]) -> Result<u64>;
    async fn keys(&mut self, pattern: &str) -> Result<Vec<String>>;

    async fn sadd(&mut self, key: &str, members: Vec<String>) -> Result<u64>;
    async fn srem(&mut self, key: &str, members: Vec<String>) -> Result<u64>;
    async fn sismember(&mut self, key: &str, member: &str) -> Result<bool>;
    async fn smembers(&mut self, key: &str) -> Result<Vec<String>>;

    async fn json_get(&mut self, key: &str) -> Result<Option<Json>>;
    async fn json_set(&mut self, key: &str, document: &Json) -> Result<()>;
    async fn json_mget(&mut self, keys: &[String]) -> Result<Vec<Option<Json>>>;

    async fn ft_list(&mut self) -> Result<Vec<String>>;
    async fn ft_create(
        &mut self,
        index: &str,
        schema: &IndexSchema,
        options: &IndexOptions,
    ) -> Result<()>;
    async fn ft_dropindex(&mut self, index: &str) -> Result<()>;
    async fn ft_info(&mut self, index: &str) -> Result<IndexInfo>;
    async fn ft_search(
        &mut self,
        index: &str,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchReply>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Seconds(u64),
    Milliseconds(u64),
    // Retain the ttl the key already has.
    KeepTtl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetCondition {
    // NX
    IfAbsent,
    // XX
    IfPresent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    pub expiry: Option<Expiry>,
    pub condition: Option<SetCondition>,
}

impl SetOptions {
    pub fn expire_in_seconds(mut self, seconds: u64) -> Self {
        self.expiry = Some(Expiry::Seconds(seconds));
        self
    }

    pub fn expire_in_millis(mut self, millis: u64) -> Self {
        self.expiry = Some(Expiry::Milliseconds(millis));
        self
    }

    pub fn keep_ttl(mut self) -> Self {
        self.expiry = Some(Expiry::KeepTtl);
        self
    }

    pub fn if_absent(mut self) -> Self {
        self.condition = Some(SetCondition::IfAbsent);
        self
    }

    pub fn if_present(mut self) -> Self {
        self.condition = Some(SetCondition::IfPresent);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchReply {
    // Number of matches, not limited by paging.
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub key: String,
    // None when the search asked for keys only.
    pub document: Option<Json>,
}
