use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use crate::kv::{KeyValueStore, StoreError};

const KEY_PREFIX: &str = "aura";

#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    fn key(name: &str) -> String {
        format!("{}:{}", KEY_PREFIX, name)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(Self::key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(Self::key(key), value).await?;
        debug!("Persisted {} ({} bytes)", key, value.len());
        Ok(())
    }
}
