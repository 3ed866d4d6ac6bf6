use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value as Json;
use tokio::sync::Mutex;

use crate::client::{Client, Expiry, SearchHit, SearchReply, SetCondition, SetOptions};
use crate::common::{trace, Result, Time};
use crate::search::{IndexInfo, IndexOptions, IndexSchema, SearchOptions};

/// In-process client.
///
/// Strings, sets and JSON documents live in maps shared by every clone.
/// Indexes are bookkept so that creation, listing and introspection behave
/// like the server, but search queries are not evaluated: `*` returns every
/// document under the index prefixes and any other query gets the reply
/// staged for it with [`MemoryClient::stage_search`], or nothing.
#[derive(Clone, Default)]
pub struct MemoryClient {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    strings: HashMap<String, Entry>,
    sets: HashMap<String, BTreeSet<String>>,
    documents: BTreeMap<String, Json>,
    indexes: BTreeMap<String, IndexInfo>,
    staged: HashMap<(String, String), SearchReply>,
    searches: Vec<(String, String)>,
}

struct Entry {
    value: String,
    expires_at: Option<Time>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply returned for `query` on `index`.
    pub async fn stage_search(
        &self,
        index: impl Into<String>,
        query: impl Into<String>,
        reply: SearchReply,
    ) {
        self.state
            .lock()
            .await
            .staged
            .insert((index.into(), query.into()), reply);
    }

    /// Every (index, query) searched so far, oldest first.
    pub async fn searches(&self) -> Vec<(String, String)> {
        self.state.lock().await.searches.clone()
    }
}

impl State {
    fn purge_expired(&mut self, key: &str) {
        let expired = self
            .strings
            .get(key)
            .and_then(|entry| entry.expires_at)
            .map(|at| at <= Utc::now())
            .unwrap_or(false);
        if expired {
            trace!(%key, "Expired");
            self.strings.remove(key);
        }
    }

    fn string(&mut self, key: &str) -> Option<String> {
        self.purge_expired(key);
        self.strings.get(key).map(|entry| entry.value.clone())
    }

    fn exists(&mut self, key: &str) -> bool {
        self.purge_expired(key);
        self.strings.contains_key(key)
            || self.sets.contains_key(key)
            || self.documents.contains_key(key)
    }
}

fn response_error(message: &'static str) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::ResponseError, message))
}

const INVALID_EXPIRE: &str = "invalid expire time in 'set' command";

fn expire_delta(n: u64, unit: fn(i64) -> Option<Duration>) -> Result<Duration> {
    i64::try_from(n)
        .ok()
        .and_then(unit)
        .ok_or_else(|| response_error(INVALID_EXPIRE).into())
}

#[async_trait]
impl Client for MemoryClient {
    async fn get(&mut self, key: &str) -> Result<Option<String>> {
        Ok(self.state.lock().await.string(key))
    }

    async fn set(&mut self, key: &str, value: String, options: SetOptions) -> Result<bool> {
        let mut state = self.state.lock().await;

        let ttl = match options.expiry {
            Some(Expiry::Seconds(n)) => Some(expire_delta(n, Duration::try_seconds)?),
            Some(Expiry::Milliseconds(n)) => Some(expire_delta(n, Duration::try_milliseconds)?),
            _ => None,
        };

        let exists = state.exists(key);
        match options.condition {
            Some(SetCondition::IfAbsent) if exists => return Ok(false),
            Some(SetCondition::IfPresent) if !exists => return Ok(false),
            _ => (),
        }

        let expires_at = match (options.expiry, ttl) {
            (Some(Expiry::KeepTtl), _) => state.strings.get(key).and_then(|e| e.expires_at),
            (_, Some(ttl)) => Some(
                Utc::now()
                    .checked_add_signed(ttl)
                    .ok_or_else(|| response_error(INVALID_EXPIRE))?,
            ),
            _ => None,
        };

        state.sets.remove(key);
        state.documents.remove(key);
        state
            .strings
            .insert(key.to_owned(), Entry { value, expires_at });

        Ok(true)
    }

    async fn mget(&mut self, keys: &[String]) -> Result<Vec<Option<String>>> {
        let mut state = self.state.lock().await;
        Ok(keys.iter().map(|key| state.string(key)).collect())
    }

    async fn mset(&mut self, pairs: Vec<(String, String)>) -> Result<()> {
        let mut state = self.state.lock().await;
        for (key, value) in pairs {
            state.sets.remove(&key);
            state.documents.remove(&key);
            state.strings.insert(
                key,
                Entry {
                    value,
                    expires_at: None,
                },
            );
        }
        Ok(())
    }

    async fn del(&mut self, keys: &[String]) -> Result<u64> {
        let mut state = self.state.lock().await;
        let mut n = 0;
        for key in keys {
            let existed = state.exists(key);
            state.strings.remove(key);
            state.sets.remove(key);
            state.documents.remove(key);
            if existed {
                n += 1;
            }
        }
        Ok(n)
    }

    async fn keys(&mut self, pattern: &str) -> Result<Vec<String>> {
        let mut state = self.state.lock().await;

        let candidates = state
            .strings
            .keys()
            .chain(state.sets.keys())
            .chain(state.documents.keys())
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect::<BTreeSet<_>>();

        Ok(candidates
            .into_iter()
            .filter(|key| state.exists(key))
            .collect())
    }

    async fn sadd(&mut self, key: &str, members: Vec<String>) -> Result<u64> {
        let mut state = self.state.lock().await;
        let set = state.sets.entry(key.to_owned()).or_default();
        Ok(members.into_iter().filter(|m| set.insert(m.clone())).count() as u64)
    }

    async fn srem(&mut self, key: &str, members: Vec<String>) -> Result<u64> {
        let mut state = self.state.lock().await;
        let Some(set) = state.sets.get_mut(key) else {
            return Ok(0);
        };
        let n = members.iter().filter(|m| set.remove(m.as_str())).count() as u64;
        if set.is_empty() {
            state.sets.remove(key);
        }
        Ok(n)
    }

    async fn sismember(&mut self, key: &str, member: &str) -> Result<bool> {
        let state = self.state.lock().await;
        Ok(state
            .sets
            .get(key)
            .map(|set| set.contains(member))
            .unwrap_or(false))
    }

    async fn smembers(&mut self, key: &str) -> Result<Vec<String>> {
        let state = self.state.lock().await;
        Ok(state
            .sets
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn json_get(&mut self, key: &str) -> Result<Option<Json>> {
        Ok(self.state.lock().await.documents.get(key).cloned())
    }

    async fn json_set(&mut self, key: &str, document: &Json) -> Result<()> {
        let mut state = self.state.lock().await;
        state.strings.remove(key);
        state.sets.remove(key);
        state.documents.insert(key.to_owned(), document.clone());
        Ok(())
    }

    async fn json_mget(&mut self, keys: &[String]) -> Result<Vec<Option<Json>>> {
        let state = self.state.lock().await;
        Ok(keys
            .iter()
            .map(|key| state.documents.get(key).cloned())
            .collect())
    }

    async fn ft_list(&mut self) -> Result<Vec<String>> {
        Ok(self.state.lock().await.indexes.keys().cloned().collect())
    }

    async fn ft_create(
        &mut self,
        index: &str,
        schema: &IndexSchema,
        options: &IndexOptions,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.indexes.contains_key(index) {
            return Err(response_error("Index already exists").into());
        }
        state.indexes.insert(
            index.to_owned(),
            IndexInfo::from_declaration(schema, options),
        );
        Ok(())
    }

    async fn ft_dropindex(&mut self, index: &str) -> Result<()> {
        match self.state.lock().await.indexes.remove(index) {
            Some(_) => Ok(()),
            None => Err(response_error("Unknown Index name").into()),
        }
    }

    async fn ft_info(&mut self, index: &str) -> Result<IndexInfo> {
        match self.state.lock().await.indexes.get(index) {
            Some(info) => Ok(info.clone()),
            None => Err(response_error("Unknown index name").into()),
        }
    }

    async fn ft_search(
        &mut self,
        index: &str,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchReply> {
        let mut state = self.state.lock().await;
        state.searches.push((index.to_owned(), query.to_owned()));

        let info = state
            .indexes
            .get(index)
            .ok_or_else(|| response_error("Unknown index name"))?;

        if query != "*" {
            return Ok(state
                .staged
                .get(&(index.to_owned(), query.to_owned()))
                .cloned()
                .unwrap_or_default());
        }

        let matched = state
            .documents
            .iter()
            .filter(|(key, _)| {
                info.definition
                    .prefixes
                    .iter()
                    .any(|prefix| key.starts_with(prefix.as_str()))
            })
            .collect::<Vec<_>>();

        let hits = matched
            .iter()
            .skip(options.offset)
            .take(options.limit)
            .map(|(key, document)| SearchHit {
                key: (*key).clone(),
                document: if options.no_content {
                    None
                } else {
                    Some((*document).clone())
                },
            })
            .collect();

        Ok(SearchReply {
            total: matched.len() as u64,
            hits,
        })
    }
}

// Redis style glob: `*`, `?` and backslash escapes.
fn glob_match(pattern: &str, text: &str) -> bool {
    let p = pattern.chars().collect::<Vec<_>>();
    let t = text.chars().collect::<Vec<_>>();
    let (mut pi, mut ti) = (0, 0);
    // Position of the last `*` and the text position it is matched up to.
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() {
            match p[pi] {
                '*' => {
                    star = Some((pi, ti));
                    pi += 1;
                    continue;
                }
                '?' => {
                    pi += 1;
                    ti += 1;
                    continue;
                }
                '\\' if pi + 1 < p.len() => {
                    if p[pi + 1] == t[ti] {
                        pi += 2;
                        ti += 1;
                        continue;
                    }
                }
                c => {
                    if c == t[ti] {
                        pi += 1;
                        ti += 1;
                        continue;
                    }
                }
            }
        }

        match star {
            Some((sp, st)) => {
                pi = sp + 1;
                ti = st + 1;
                star = Some((sp, st + 1));
            }
            None => return false,
        }
    }

    p[pi..].iter().all(|c| *c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob() {
        assert!(glob_match("user:*", "user:1"));
        assert!(glob_match("user:*", "user:"));
        assert!(!glob_match("user:*", "users:1"));
        assert!(glob_match("u?er:*:x", "user:abc:x"));
        assert!(glob_match("*", ""));
        assert!(glob_match(r"a\*b*", "a*bc"));
        assert!(!glob_match(r"a\*b*", "axbc"));
        assert!(glob_match("*:*:end", "a:b:c:end"));
    }

    #[test]
    fn strings() {
        tokio_test::block_on(async move {
            let mut client = MemoryClient::new();

            assert_eq!(client.get("k").await.unwrap(), None);
            assert!(client
                .set("k", "v1".into(), SetOptions::default())
                .await
                .unwrap());
            assert!(!client
                .set("k", "v2".into(), SetOptions::default().if_absent())
                .await
                .unwrap());
            assert!(!client
                .set("other", "v".into(), SetOptions::default().if_present())
                .await
                .unwrap());
            assert_eq!(client.get("k").await.unwrap(), Some("v1".into()));

            client
                .mset(vec![("a".into(), "1".into()), ("b".into(), "2".into())])
                .await
                .unwrap();
            assert_eq!(
                client
                    .mget(&["a".into(), "missing".into(), "b".into()])
                    .await
                    .unwrap(),
                vec![Some("1".into()), None, Some("2".into())]
            );
            assert_eq!(
                client.keys("*").await.unwrap(),
                vec!["a", "b", "k"]
            );
            assert_eq!(
                client.del(&["a".into(), "missing".into()]).await.unwrap(),
                1
            );
        })
    }

    #[test]
    fn expiry() {
        tokio_test::block_on(async move {
            let mut client = MemoryClient::new();
            client
                .set("k", "v".into(), SetOptions::default().expire_in_millis(0))
                .await
                .unwrap();

            assert_eq!(client.get("k").await.unwrap(), None);
            assert!(client.keys("*").await.unwrap().is_empty());
        })
    }

    #[test]
    fn expiry_out_of_range() {
        tokio_test::block_on(async move {
            let mut client = MemoryClient::new();

            for options in [
                SetOptions::default().expire_in_seconds(u64::MAX),
                SetOptions::default().expire_in_seconds(i64::MAX as u64),
                SetOptions::default().expire_in_millis(u64::MAX),
            ] {
                let err = client.set("k", "v".into(), options).await.unwrap_err();
                assert!(matches!(err.kind(), crate::ErrorKind::Store(_)));
            }
            assert_eq!(client.get("k").await.unwrap(), None);

            assert!(client
                .set("k", "v".into(), SetOptions::default().expire_in_seconds(60))
                .await
                .unwrap());
            assert_eq!(client.get("k").await.unwrap(), Some("v".into()));
        })
    }

    #[test]
    fn sets() {
        tokio_test::block_on(async move {
            let mut client = MemoryClient::new();

            assert_eq!(
                client
                    .sadd("s", vec!["a".into(), "b".into(), "a".into()])
                    .await
                    .unwrap(),
                2
            );
            assert!(client.sismember("s", "a").await.unwrap());
            assert_eq!(
                client.srem("s", vec!["a".into(), "z".into()]).await.unwrap(),
                1
            );
            assert_eq!(client.smembers("s").await.unwrap(), vec!["b"]);
            client.srem("s", vec!["b".into()]).await.unwrap();
            assert!(client.keys("s").await.unwrap().is_empty());
        })
    }

    #[test]
    fn search_is_recorded() {
        tokio_test::block_on(async move {
            let mut client = MemoryClient::new();
            client
                .ft_create(
                    "idx",
                    &IndexSchema::new().tag("status", "$.status"),
                    &IndexOptions::json(["doc:"]),
                )
                .await
                .unwrap();
            client
                .json_set("doc:1", &serde_json::json!({"status": "a"}))
                .await
                .unwrap();
            client
                .json_set("other:1", &serde_json::json!({"status": "a"}))
                .await
                .unwrap();

            let all = client
                .ft_search("idx", "*", &SearchOptions::default())
                .await
                .unwrap();
            assert_eq!(all.total, 1);
            assert_eq!(all.hits[0].key, "doc:1");

            let staged = SearchReply {
                total: 7,
                hits: Vec::new(),
            };
            client
                .stage_search("idx", "(@status:{a})", staged.clone())
                .await;
            assert_eq!(
                client
                    .ft_search("idx", "(@status:{a})", &SearchOptions::default())
                    .await
                    .unwrap(),
                staged
            );

            assert_eq!(
                client.searches().await,
                vec![
                    ("idx".to_owned(), "*".to_owned()),
                    ("idx".to_owned(), "(@status:{a})".to_owned()),
                ]
            );
            assert!(client
                .ft_search("missing", "*", &SearchOptions::default())
                .await
                .is_err());
        })
    }
}
