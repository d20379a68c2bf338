use redis::{aio::ConnectionManager, Client};
use serenity::async_trait;
use tracing::info;

use super::{BlobStore, StorageError};

const KEY_PREFIX: &str = "calendar";

/// Keeps blobs as plain string values under `calendar:<name>`.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    pub async fn new(url: &str) -> Result<Self, StorageError> {
        let client = Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self { manager })
    }

    pub fn connection(&self) -> ConnectionManager {
        self.manager.clone()
    }
}

pub fn blob_key(name: &str) -> String {
    format!("{KEY_PREFIX}:{name}")
}

#[async_trait]
impl BlobStore for RedisStore {
    async fn put_json(&self, name: &str, body: Vec<u8>) -> Result<String, StorageError> {
        let mut conn = self.connection();
        let key = blob_key(name);

        redis::cmd("SET")
            .arg(&key)
            .arg(body)
            .query_async::<()>(&mut conn)
            .await?;

        info!("Stored {} in redis", key);
        Ok(format!("redis://{key}"))
    }
}
