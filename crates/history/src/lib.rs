//! Holdings resolution for one owner.
//!
//! A single ledger query enumerates the owner's records, then the
//! metadata document behind each record's URI is fetched concurrently.
//! Fan-out is all-or-nothing in initiation and best-effort in
//! completion: a failed or timed-out fetch marks its own entry and
//! never fails siblings or the overall response.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use ledger::{Address, LedgerClient, LedgerError};
use offchain::OffchainStore;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Upper bound on in-flight metadata fetches.
    pub max_concurrent_fetches: usize,
    /// Deadline per fetch; an overrun becomes that entry's error.
    pub fetch_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 8,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl ResolverConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_concurrent_fetches: env::var("HISTORY_MAX_CONCURRENT_FETCHES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_concurrent_fetches),
            fetch_timeout: env::var("HISTORY_FETCH_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.fetch_timeout),
        }
    }
}

/// One resolved holding: the record's address and URI, plus either the
/// fetched document or the fetch error. Never both.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub mint_address: Address,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Resolve every record owned by `owner` into a history entry.
///
/// An owner with zero records yields an empty vec. Output order follows
/// completion, not query order; each entry maps to exactly one source
/// record.
pub async fn resolve_history(
    ledger: &dyn LedgerClient,
    store: &dyn OffchainStore,
    owner: &Address,
    config: &ResolverConfig,
) -> Result<Vec<HistoryEntry>, LedgerError> {
    let records = ledger.records_by_owner(owner).await?;
    info!("Resolving {} records owned by {}", records.len(), owner);

    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_fetches));

    let fetches = records.into_iter().map(|record| {
        let semaphore = semaphore.clone();
        async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    return HistoryEntry {
                        mint_address: record.mint,
                        uri: record.uri,
                        metadata: None,
                        error: Some(format!("fetch pool unavailable: {}", e)),
                    };
                }
            };

            debug!("Fetching metadata for {} at {}", record.mint, record.uri);
            match timeout(config.fetch_timeout, store.fetch_json(&record.uri)).await {
                Ok(Ok(metadata)) => HistoryEntry {
                    mint_address: record.mint,
                    uri: record.uri,
                    metadata: Some(metadata),
                    error: None,
                },
                Ok(Err(e)) => {
                    warn!("Metadata fetch for {} failed: {}", record.mint, e);
                    HistoryEntry {
                        mint_address: record.mint,
                        uri: record.uri,
                        metadata: None,
                        error: Some(e.to_string()),
                    }
                }
                Err(_) => {
                    warn!(
                        "Metadata fetch for {} timed out after {:?}",
                        record.mint, config.fetch_timeout
                    );
                    HistoryEntry {
                        mint_address: record.mint,
                        uri: record.uri,
                        metadata: None,
                        error: Some(format!(
                            "fetch timed out after {}ms",
                            config.fetch_timeout.as_millis()
                        )),
                    }
                }
            }
        }
    });

    Ok(join_all(fetches).await)
}
