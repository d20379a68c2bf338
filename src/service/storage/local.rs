use std::path::PathBuf;

use serenity::async_trait;
use tracing::info;

use super::{BlobStore, StorageError};

/// Writes blobs as files under a directory. Handy for local runs.
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl BlobStore for LocalStore {
    async fn put_json(&self, name: &str, body: Vec<u8>) -> Result<String, StorageError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, body).await?;

        info!("Wrote {} to {}", name, self.dir.display());
        Ok(path.display().to_string())
    }
}
