use std::env;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::{OffchainStore, Result, StoreError};

#[derive(Debug, Clone)]
pub enum StoreNetwork {
    Local,
    Devnet,
}

impl Default for StoreNetwork {
    fn default() -> Self {
        StoreNetwork::Devnet
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub network: StoreNetwork,
    /// Storage duration requested on upload, in store epochs.
    pub epochs: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            network: StoreNetwork::Devnet,
            epochs: 14,
        }
    }
}

impl StoreConfig {
    pub fn publisher_url(&self) -> String {
        match self.network {
            StoreNetwork::Local => "http://127.0.0.1:31415".to_string(),
            StoreNetwork::Devnet => env::var("STORE_PUBLISHER")
                .unwrap_or_else(|_| "https://store-publisher-devnet.staketab.org".to_string()),
        }
    }

    pub fn aggregator_url(&self) -> String {
        match self.network {
            StoreNetwork::Local => "http://127.0.0.1:31415/v1/blobs/".to_string(),
            StoreNetwork::Devnet => env::var("STORE_AGGREGATOR").unwrap_or_else(|_| {
                "https://store-aggregator-devnet.staketab.org/v1/blobs/".to_string()
            }),
        }
    }
}

/// HTTP client for the content-addressed store.
pub struct StoreClient {
    config: StoreConfig,
    client: reqwest::Client,
}

impl StoreClient {
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Read URL for a blob id.
    pub fn blob_url(&self, blob_id: &str) -> Result<String> {
        if blob_id.is_empty() {
            return Err(StoreError::InvalidReference("blob id is empty".to_string()));
        }
        Ok(format!("{}{}", self.config.aggregator_url(), blob_id))
    }

    async fn put_bytes(&self, bytes: Vec<u8>) -> Result<String> {
        let url = format!(
            "{}/v1/blobs?epochs={}",
            self.config.publisher_url(),
            self.config.epochs
        );

        info!("Uploading {} bytes to off-chain store", bytes.len());
        let start = Instant::now();

        let response = self
            .client
            .put(&url)
            .body(bytes)
            .send()
            .await
            .map_err(|e| StoreError::Upload(format!("failed to send request: {}", e)))?;

        debug!("Upload request completed in {:?}", start.elapsed());

        if !response.status().is_success() {
            let status = response.status();
            error!(
                "Store upload failed: {} {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            );
            return Err(StoreError::Upload(format!(
                "store returned {}",
                status
            )));
        }

        let info: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Upload(format!("failed to parse response: {}", e)))?;

        // The publisher reports either a fresh write or an existing blob
        // for the same content.
        let blob_id = info
            .pointer("/newlyCreated/blobObject/blobId")
            .or_else(|| info.pointer("/alreadyCertified/blobId"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| StoreError::Upload("no blob id in publisher response".to_string()))?;

        info!("Stored blob: {}", blob_id);
        self.blob_url(&blob_id)
    }
}

impl Default for StoreClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OffchainStore for StoreClient {
    async fn upload_blob(&self, bytes: Vec<u8>) -> Result<String> {
        self.put_bytes(bytes).await
    }

    async fn upload_json(&self, document: &Value) -> Result<String> {
        let bytes = serde_json::to_vec(document)
            .map_err(|e| StoreError::Upload(format!("failed to encode document: {}", e)))?;
        self.put_bytes(bytes).await
    }

    async fn fetch_json(&self, reference: &str) -> Result<Value> {
        if reference.is_empty() {
            return Err(StoreError::InvalidReference(
                "reference is empty".to_string(),
            ));
        }

        debug!("Fetching off-chain document: {}", reference);
        let start = Instant::now();

        let response = self
            .client
            .get(reference)
            .send()
            .await
            .map_err(|e| StoreError::Fetch(format!("failed to send request: {}", e)))?;

        debug!("Fetch completed in {:?}", start.elapsed());

        if !response.status().is_success() {
            let status = response.status();
            error!(
                "Store fetch failed for {}: {} {}",
                reference,
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            );
            return Err(StoreError::Fetch(format!(
                "store returned {} for {}",
                status, reference
            )));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::InvalidDocument {
                reference: reference.to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_urls() {
        let local = StoreConfig {
            network: StoreNetwork::Local,
            ..Default::default()
        };

        assert_eq!(local.publisher_url(), "http://127.0.0.1:31415");
        assert_eq!(local.aggregator_url(), "http://127.0.0.1:31415/v1/blobs/");
    }

    #[test]
    fn blob_url_contains_id() {
        let client = StoreClient::with_config(StoreConfig {
            network: StoreNetwork::Local,
            ..Default::default()
        });

        let url = client.blob_url("abc123").expect("url");
        assert!(url.contains("abc123"));
        assert!(url.starts_with("http://"));
    }

    #[test]
    fn empty_blob_id_is_rejected() {
        let client = StoreClient::new();
        assert!(client.blob_url("").is_err());
    }
}
