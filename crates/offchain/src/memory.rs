use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::{OffchainStore, Result, StoreError};

const MEMORY_SCHEME: &str = "memory://";

/// In-memory content-addressed store.
///
/// References are `memory://<base58(sha256(bytes))>`, so storing the same
/// content twice yields the same reference, matching the idempotence of
/// the real store. Failure and delay injection exist for exercising the
/// partial-failure paths of callers.
#[derive(Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    failing: RwLock<HashSet<String>>,
    delays: RwLock<HashMap<String, Duration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn reference_for(bytes: &[u8]) -> String {
        let digest = Sha256::digest(bytes);
        format!("{}{}", MEMORY_SCHEME, bs58::encode(digest).into_string())
    }

    /// Make subsequent fetches of `reference` fail.
    pub async fn set_failure(&self, reference: &str) {
        self.failing.write().await.insert(reference.to_string());
    }

    /// Delay subsequent fetches of `reference` by `delay`.
    pub async fn set_delay(&self, reference: &str, delay: Duration) {
        self.delays
            .write()
            .await
            .insert(reference.to_string(), delay);
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl OffchainStore for MemoryStore {
    async fn upload_blob(&self, bytes: Vec<u8>) -> Result<String> {
        let reference = Self::reference_for(&bytes);
        self.blobs.write().await.insert(reference.clone(), bytes);
        Ok(reference)
    }

    async fn upload_json(&self, document: &Value) -> Result<String> {
        let bytes = serde_json::to_vec(document)
            .map_err(|e| StoreError::Upload(format!("failed to encode document: {}", e)))?;
        self.upload_blob(bytes).await
    }

    async fn fetch_json(&self, reference: &str) -> Result<Value> {
        if let Some(delay) = self.delays.read().await.get(reference).copied() {
            tokio::time::sleep(delay).await;
        }

        if self.failing.read().await.contains(reference) {
            return Err(StoreError::Fetch(format!(
                "injected failure for {}",
                reference
            )));
        }

        let blobs = self.blobs.read().await;
        let bytes = blobs
            .get(reference)
            .ok_or_else(|| StoreError::Fetch(format!("no blob at {}", reference)))?;

        serde_json::from_slice(bytes).map_err(|e| StoreError::InvalidDocument {
            reference: reference.to_string(),
            message: e.to_string(),
        })
    }
}
