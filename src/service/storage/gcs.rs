use std::time::Duration as StdDuration;

use serde::Deserialize;
use serenity::async_trait;
use tracing::{info, warn};

use super::{BlobStore, StorageError};

const UPLOAD_BASE: &str = "https://storage.googleapis.com/upload/storage/v1/b";
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// Google Cloud Storage bucket written through the JSON API media upload.
pub struct GcsStore {
    client: reqwest::Client,
    bucket: String,
    static_token: Option<String>,
    upload_base: String,
}

impl GcsStore {
    pub fn new(
        bucket: impl Into<String>,
        static_token: Option<String>,
        timeout: StdDuration,
    ) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Http(format!("failed to build client: {e}")))?;
        Ok(Self {
            client,
            bucket: bucket.into(),
            static_token,
            upload_base: UPLOAD_BASE.to_string(),
        })
    }

    /// Point uploads at another JSON API endpoint (emulators, tests).
    pub fn with_upload_base(mut self, base: impl Into<String>) -> Self {
        self.upload_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// `GCS_ACCESS_TOKEN` when given, otherwise the runtime service account
    /// token from the metadata server.
    async fn access_token(&self) -> Result<String, StorageError> {
        if let Some(token) = &self.static_token {
            return Ok(token.clone());
        }

        let resp = self
            .client
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| StorageError::Http(format!("metadata token request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Status { status, body });
        }

        let token: MetadataToken = resp
            .json()
            .await
            .map_err(|e| StorageError::Http(format!("metadata token parse failed: {e}")))?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl BlobStore for GcsStore {
    async fn put_json(&self, name: &str, body: Vec<u8>) -> Result<String, StorageError> {
        let token = self.access_token().await?;
        let url = format!("{}/{}/o", self.upload_base, self.bucket);

        let resp = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", name)])
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                warn!("GCS upload request failed: {}", e);
                StorageError::Http(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unable to read body".to_string());
            warn!("GCS upload returned error status {}: {}", status, body);
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("Successfully uploaded {} to bucket {}", name, self.bucket);
        Ok(format!("gs://{}/{}", self.bucket, name))
    }
}
