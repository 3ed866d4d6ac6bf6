use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde_json::Value as Json;

use crate::client::{reply, Client, Expiry, SearchReply, SetCondition, SetOptions};
use crate::common::{debug, info, Error, Result};
use crate::search::{IndexInfo, IndexOptions, IndexSchema, SearchOptions};

/// Client backed by a redis server with the search and JSON modules loaded.
#[derive(Clone)]
pub struct RedisClient {
    connection: ConnectionManager,
}

impl RedisClient {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }

    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let connection = client.get_connection_manager().await?;
        info!(%url, "Connected");

        Ok(RedisClient::new(connection))
    }
}

#[async_trait]
impl Client for RedisClient {
    async fn get(&mut self, key: &str) -> Result<Option<String>> {
        debug!(%key, "GET");
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection)
            .await?;
        Ok(value)
    }

    async fn set(&mut self, key: &str, value: String, options: SetOptions) -> Result<bool> {
        debug!(%key, ?options, "SET");
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);

        match options.expiry {
            Some(Expiry::Seconds(n)) => {
                cmd.arg("EX").arg(n);
            }
            Some(Expiry::Milliseconds(n)) => {
                cmd.arg("PX").arg(n);
            }
            Some(Expiry::KeepTtl) => {
                cmd.arg("KEEPTTL");
            }
            None => (),
        }
        match options.condition {
            Some(SetCondition::IfAbsent) => {
                cmd.arg("NX");
            }
            Some(SetCondition::IfPresent) => {
                cmd.arg("XX");
            }
            None => (),
        }

        // Nil when NX/XX refused the write.
        let reply: Option<String> = cmd.query_async(&mut self.connection).await?;
        Ok(reply.is_some())
    }

    async fn mget(&mut self, keys: &[String]) -> Result<Vec<Option<String>>> {
        debug!(?keys, "MGET");
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(keys)
            .query_async(&mut self.connection)
            .await?;
        Ok(values)
    }

    async fn mset(&mut self, pairs: Vec<(String, String)>) -> Result<()> {
        debug!(count = pairs.len(), "MSET");
        let mut cmd = redis::cmd("MSET");
        for (key, value) in pairs {
            cmd.arg(key).arg(value);
        }
        let _: () = cmd.query_async(&mut self.connection).await?;
        Ok(())
    }

    async fn del(&mut self, keys: &[String]) -> Result<u64> {
        debug!(?keys, "DEL");
        let n: u64 = redis::cmd("DEL")
            .arg(keys)
            .query_async(&mut self.connection)
            .await?;
        Ok(n)
    }

    async fn keys(&mut self, pattern: &str) -> Result<Vec<String>> {
        debug!(%pattern, "KEYS");
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut self.connection)
            .await?;
        Ok(keys)
    }

    async fn sadd(&mut self, key: &str, members: Vec<String>) -> Result<u64> {
        debug!(%key, "SADD");
        let n: u64 = redis::cmd("SADD")
            .arg(key)
            .arg(members)
            .query_async(&mut self.connection)
            .await?;
        Ok(n)
    }

    async fn srem(&mut self, key: &str, members: Vec<String>) -> Result<u64> {
        debug!(%key, "SREM");
        let n: u64 = redis::cmd("SREM")
            .arg(key)
            .arg(members)
            .query_async(&mut self.connection)
            .await?;
        Ok(n)
    }

    async fn sismember(&mut self, key: &str, member: &str) -> Result<bool> {
        debug!(%key, "SISMEMBER");
        let is_member: bool = redis::cmd("SISMEMBER")
            .arg(key)
            .arg(member)
            .query_async(&mut self.connection)
            .await?;
        Ok(is_member)
    }

    async fn smembers(&mut self, key: &str) -> Result<Vec<String>> {
        debug!(%key, "SMEMBERS");
        let members: Vec<String> = redis::cmd("SMEMBERS")
            .arg(key)
            .query_async(&mut self.connection)
            .await?;
        Ok(members)
    }

    async fn json_get(&mut self, key: &str) -> Result<Option<Json>> {
        debug!(%key, "JSON.GET");
        let raw: Option<String> = redis::cmd("JSON.GET")
            .arg(key)
            .query_async(&mut self.connection)
            .await?;
        raw.map(|raw| serde_json::from_str::<Json>(&raw).map_err(Error::from))
            .transpose()
    }

    async fn json_set(&mut self, key: &str, document: &Json) -> Result<()> {
        debug!(%key, "JSON.SET");
        let _: () = redis::cmd("JSON.SET")
            .arg(key)
            .arg("$")
            .arg(document.to_string())
            .query_async(&mut self.connection)
            .await?;
        Ok(())
    }

    async fn json_mget(&mut self, keys: &[String]) -> Result<Vec<Option<Json>>> {
        debug!(?keys, "JSON.MGET");
        // Legacy root path, each element is the document itself.
        let raw: Vec<Option<String>> = redis::cmd("JSON.MGET")
            .arg(keys)
            .arg(".")
            .query_async(&mut self.connection)
            .await?;
        raw.into_iter()
            .map(|raw| {
                raw.map(|raw| serde_json::from_str::<Json>(&raw).map_err(Error::from))
                    .transpose()
            })
            .collect()
    }

    async fn ft_list(&mut self) -> Result<Vec<String>> {
        let names: Vec<String> = redis::cmd("FT._LIST")
            .query_async(&mut self.connection)
            .await?;
        Ok(names)
    }

    async fn ft_create(
        &mut self,
        index: &str,
        schema: &IndexSchema,
        options: &IndexOptions,
    ) -> Result<()> {
        info!(%index, on = options.on.as_str(), prefixes = ?options.prefixes, "FT.CREATE");
        let _: () = create_index_cmd(index, schema, options)
            .query_async(&mut self.connection)
            .await?;
        Ok(())
    }

    async fn ft_dropindex(&mut self, index: &str) -> Result<()> {
        info!(%index, "FT.DROPINDEX");
        let _: () = redis::cmd("FT.DROPINDEX")
            .arg(index)
            .query_async(&mut self.connection)
            .await?;
        Ok(())
    }

    async fn ft_info(&mut self, index: &str) -> Result<IndexInfo> {
        let value: redis::Value = redis::cmd("FT.INFO")
            .arg(index)
            .query_async(&mut self.connection)
            .await?;
        reply::index_info(&value)
    }

    async fn ft_search(
        &mut self,
        index: &str,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchReply> {
        debug!(%index, %query, ?options, "FT.SEARCH");
        let mut cmd = redis::cmd("FT.SEARCH");
        cmd.arg(index).arg(query);
        if options.no_content {
            cmd.arg("NOCONTENT");
        }
        if let Some(sort) = &options.sort_by {
            cmd.arg("SORTBY").arg(sort.field.as_str()).arg(sort.order.as_str());
        }
        cmd.arg("LIMIT").arg(options.offset).arg(options.limit);

        let value: redis::Value = cmd.query_async(&mut self.connection).await?;
        reply::search_reply(&value, options.no_content)
    }
}

// Without PREFIX the index covers every key of its type.
fn create_index_cmd(index: &str, schema: &IndexSchema, options: &IndexOptions) -> redis::Cmd {
    let mut cmd = redis::cmd("FT.CREATE");
    cmd.arg(index).arg("ON").arg(options.on.as_str());
    if !options.prefixes.is_empty() {
        cmd.arg("PREFIX")
            .arg(options.prefixes.len())
            .arg(options.prefixes.as_slice());
    }
    cmd.arg("SCHEMA");
    for (alias, spec) in schema.iter() {
        cmd.arg(spec.path.as_str()).arg("AS").arg(alias).arg(spec.kind.as_str());
    }
    cmd
}
