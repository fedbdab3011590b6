// SPDX-License-Identifier: GPL-3.0-only

//! Publish pipeline
//!
//! Uploads the two spooled artifacts to the blob store under remote names
//! that share one capture timestamp, and collects their public URLs.
//!
//! Uploads are sequential with no rollback: when the preview upload fails
//! the original may already be public even though the request reports NG.

use crate::config::Config;
use crate::constants::TIMESTAMP_FORMAT;
use crate::errors::PublishError;
use crate::pipelines::capture::CapturedArtifacts;
use tracing::{debug, info};
use ureq::Agent;

/// JPEG content type for all uploaded artifacts
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Remote object storage accepting bytes and yielding a public URL
pub trait BlobStore: Send + Sync {
    /// Upload `data` under `remote_name` and return the public URL.
    fn upload(
        &self,
        remote_name: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, PublishError>;
}

/// Blob store speaking the GCS-style simple media upload protocol
///
/// `POST <endpoint>/b/<bucket>/o?uploadType=media&name=<name>` with the
/// artifact bytes as the body; the public URL is derived from the
/// configured public base, `<public_base>/<bucket>/<name>`.
pub struct HttpBlobStore {
    agent: Agent,
    endpoint: String,
    bucket: String,
    public_base: String,
    token: Option<String>,
}

impl HttpBlobStore {
    pub fn from_config(config: &Config) -> Self {
        Self {
            agent: Agent::new_with_defaults(),
            endpoint: config.storage_endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            public_base: config.public_base.trim_end_matches('/').to_string(),
            token: config.storage_token(),
        }
    }
}

impl BlobStore for HttpBlobStore {
    fn upload(
        &self,
        remote_name: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, PublishError> {
        let url = format!(
            "{}/b/{}/o?uploadType=media&name={}",
            self.endpoint, self.bucket, remote_name
        );

        let mut request = self.agent.post(&url).header("Content-Type", content_type);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send(data).map_err(|e| match e {
            ureq::Error::StatusCode(code) => PublishError::RejectedStatus(code),
            other => PublishError::Transport(other.to_string()),
        })?;
        if !(200..300).contains(&response.status().as_u16()) {
            return Err(PublishError::RejectedStatus(response.status().as_u16()));
        }

        let public_url = format!("{}/{}/{}", self.public_base, self.bucket, remote_name);
        debug!(remote_name, url = %public_url, "Artifact uploaded");
        Ok(public_url)
    }
}

/// Public URLs of the two published artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedUrls {
    pub original: String,
    pub preview: String,
}

/// Complete publish pipeline
pub struct PublishPipeline<'a> {
    store: &'a dyn BlobStore,
}

impl<'a> PublishPipeline<'a> {
    pub fn new(store: &'a dyn BlobStore) -> Self {
        Self { store }
    }

    /// Upload both artifacts under one shared capture timestamp.
    ///
    /// Bytes are re-read from the spool files rather than taken from
    /// memory; the spool files are the persisted hand-off between the two
    /// pipelines.
    pub fn publish(&self, artifacts: &CapturedArtifacts) -> Result<PublishedUrls, PublishError> {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();

        let original_name = format!("original_{}.jpg", timestamp);
        let preview_name = format!("preview_{}.jpg", timestamp);

        let original_bytes = std::fs::read(&artifacts.original.path)?;
        let original = self
            .store
            .upload(&original_name, &original_bytes, JPEG_CONTENT_TYPE)?;

        let preview_bytes = std::fs::read(&artifacts.preview.path)?;
        let preview = self
            .store
            .upload(&preview_name, &preview_bytes, JPEG_CONTENT_TYPE)?;

        info!(%original, %preview, "Capture published");
        Ok(PublishedUrls { original, preview })
    }
}
