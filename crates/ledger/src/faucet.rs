use anyhow::anyhow;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::error::{LedgerError, Result};
use crate::types::Address;

/// Default airdrop amount in base units (1 unit of the native token).
const DEFAULT_AIRDROP_BASE_UNITS: u64 = 1_000_000_000;

/// Response from the faucet service.
#[derive(Debug, Deserialize)]
struct FaucetResponse {
    error: Option<String>,
    signature: Option<String>,
}

/// Request an airdrop of native tokens to `address`.
///
/// Returns the airdrop transaction signature on success.
pub async fn request_airdrop(faucet_url: &str, address: &Address) -> Result<String> {
    debug!("Requesting airdrop for {} from {}", address, faucet_url);

    let client = reqwest::Client::new();
    let response = client
        .post(faucet_url)
        .json(&json!({
            "address": address.as_str(),
            "amount": DEFAULT_AIRDROP_BASE_UNITS,
        }))
        .send()
        .await
        .map_err(|e| LedgerError::RpcConnection(format!("faucet request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LedgerError::Other(anyhow!(
            "faucet returned {}: {}",
            status,
            response.text().await.unwrap_or_default()
        )));
    }

    let body: FaucetResponse = response
        .json()
        .await
        .map_err(|e| LedgerError::Other(anyhow!("failed to parse faucet response: {}", e)))?;

    if let Some(error) = body.error {
        return Err(LedgerError::Other(anyhow!("faucet error: {}", error)));
    }

    let signature = body
        .signature
        .ok_or_else(|| LedgerError::Other(anyhow!("faucet response carried no signature")))?;

    info!("Airdrop to {} landed, tx: {}", address, signature);
    Ok(signature)
}
