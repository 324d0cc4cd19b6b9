//! Content-addressed off-chain store access.
//!
//! Asset bytes and metadata JSON documents live in an external
//! content-addressed store, referenced from ledger records by URI.
//! `StoreClient` talks to a publisher (writes) and an aggregator (reads)
//! over plain HTTP; `MemoryStore` provides the same contract in memory
//! for tests.

pub mod client;
pub mod memory;

pub use client::{StoreClient, StoreConfig, StoreNetwork};
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors at the off-chain store boundary.
///
/// Uploads are not retried automatically: the store is content-addressed,
/// so a manual retry-from-scratch is always safe.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("invalid document at {reference}: {message}")]
    InvalidDocument { reference: String, message: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Off-chain store boundary.
///
/// `upload_*` return a stable reference URI for the stored content.
/// A reference carries no validity guarantee until `fetch_json` on it
/// succeeds.
#[async_trait]
pub trait OffchainStore: Send + Sync {
    /// Store raw bytes, returning the reference URI.
    async fn upload_blob(&self, bytes: Vec<u8>) -> Result<String>;

    /// Store a JSON document, returning the reference URI.
    async fn upload_json(&self, document: &Value) -> Result<String>;

    /// Fetch the JSON document a reference points at.
    async fn fetch_json(&self, reference: &str) -> Result<Value>;
}
