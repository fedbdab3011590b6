// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{self, JpegQuality};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the optional blob-store bearer token
pub const STORAGE_TOKEN_ENV: &str = "CAMSHOT_STORAGE_TOKEN";

/// Service configuration, constructed once at startup and passed to the
/// server — no global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bind address for the HTTP server
    pub bind: String,
    /// HTTP listen port
    pub port: u16,
    /// Camera device index (/dev/video<N>)
    pub device_index: usize,
    /// Directory holding the two per-capture spool JPEGs
    pub spool_dir: PathBuf,
    /// JPEG encoding quality for both artifacts
    pub jpeg_quality: JpegQuality,
    /// Blob-store upload endpoint (GCS-style JSON API base)
    pub storage_endpoint: String,
    /// Blob-store bucket name
    pub bucket: String,
    /// Public base URL that uploaded objects are served from
    pub public_base: String,
    /// Webhook control endpoint; None disables registration entirely
    pub webhook_url: Option<String>,
    /// Externally visible path registered with the webhook
    pub webhook_path: String,
    /// Whether to run the keep-awake inhibitor task
    pub keep_awake: bool,
}

impl Config {
    /// Bearer token for blob-store uploads, read from the environment.
    pub fn storage_token(&self) -> Option<String> {
        std::env::var(STORAGE_TOKEN_ENV).ok().filter(|t| !t.is_empty())
    }

    /// Socket address string the server binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: constants::DEFAULT_BIND.to_string(),
            port: constants::DEFAULT_PORT,
            device_index: 0,
            spool_dir: std::env::temp_dir().join("camshot"),
            jpeg_quality: JpegQuality::default(),
            storage_endpoint: "https://storage.googleapis.com/upload/storage/v1".to_string(),
            bucket: "camshot-img".to_string(),
            public_base: "https://storage.googleapis.com".to_string(),
            webhook_url: None,
            webhook_path: "/".to_string(),
            keep_awake: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listen_addr() {
        let config = Config::default();
        assert_eq!(config.listen_addr(), "0.0.0.0:8089");
    }
}
