use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use serenity::async_trait;

pub mod gcs;
pub mod local;
pub mod redis_store;

pub use gcs::GcsStore;
pub use local::LocalStore;
pub use redis_store::RedisStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is not configured: {0}")]
    NotConfigured(String),
    #[error("invalid blob name {0:?}")]
    InvalidName(String),
    #[error("storage request failed: {0}")]
    Http(String),
    #[error("storage returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Where calendar snapshots are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Gcs {
        bucket: Option<String>,
        access_token: Option<String>,
    },
    Local {
        dir: PathBuf,
    },
    Redis {
        url: Option<String>,
    },
}

impl StorageConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            StorageConfig::Gcs { .. } => "gcs",
            StorageConfig::Local { .. } => "local",
            StorageConfig::Redis { .. } => "redis",
        }
    }
}

/// A flat namespace of JSON blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `body` under `name`, replacing any previous blob, and return its URL.
    async fn put_json(&self, name: &str, body: Vec<u8>) -> Result<String, StorageError>;
}

/// Build the configured store.
pub async fn from_config(
    config: &StorageConfig,
    timeout: StdDuration,
) -> Result<Arc<dyn BlobStore>, StorageError> {
    match config {
        StorageConfig::Gcs {
            bucket,
            access_token,
        } => {
            let bucket = bucket.clone().ok_or_else(|| {
                StorageError::NotConfigured(
                    "set CALENDAR_BUCKET or GOOGLE_CLOUD_PROJECT".to_string(),
                )
            })?;
            Ok(Arc::new(GcsStore::new(bucket, access_token.clone(), timeout)?))
        }
        StorageConfig::Local { dir } => Ok(Arc::new(LocalStore::new(dir.clone()))),
        StorageConfig::Redis { url } => {
            let url = url
                .as_deref()
                .ok_or_else(|| StorageError::NotConfigured("REDIS_URL not set".to_string()))?;
            Ok(Arc::new(RedisStore::new(url).await?))
        }
    }
}
