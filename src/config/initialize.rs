use std::path::Path;

use tokio::fs;

use crate::client::{Client, RedisClient};
use crate::common::{info, Result};
use crate::config::Config;
use crate::search::{IndexState, IndexStatus};

#[derive(Debug, Default)]
pub struct Initializer {
    pub config: Config,
}

impl Initializer {
    pub async fn load_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let f = fs::File::open(path).await?;
        let config = serde_yaml::from_reader::<_, Config>(f.into_std().await)?;

        Ok(Self { config })
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub async fn connect(&self) -> Result<RedisClient> {
        let url = self.config.redis.url();
        info!(%url, "Connecting");
        RedisClient::connect(url).await
    }

    /// State of every configured index, in declaration order.
    pub async fn index_states<C: Client>(
        &self,
        client: &mut C,
    ) -> Result<Vec<(String, IndexState)>> {
        let mut states = Vec::with_capacity(self.config.indexes.len());
        for index in &self.config.indexes {
            let state = index.declaration().state(client).await?;
            states.push((index.name.clone(), state));
        }
        Ok(states)
    }

    /// Create every configured index, recreating the ones that changed.
    pub async fn sync_indexes<C: Client>(
        &self,
        client: &mut C,
    ) -> Result<Vec<(String, IndexStatus)>> {
        let mut statuses = Vec::with_capacity(self.config.indexes.len());
        for index in &self.config.indexes {
            let status = index.declaration().reconcile(client).await?;
            statuses.push((index.name.clone(), status));
        }
        Ok(statuses)
    }
}
