use std::env;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::client::LedgerClient;
use crate::error::{LedgerError, Result};
use crate::keypair::Identity;
use crate::types::{Address, AssetRecord, Commitment, CreateRecordParams, TransactionReceipt};

/// JSON-RPC error code for a missing record or account.
const RPC_NOT_FOUND: i64 = -32004;
/// JSON-RPC error code for insufficient funds or token balance.
const RPC_INSUFFICIENT_BALANCE: i64 = -32005;

#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub rpc_url: String,
}

impl RpcConfig {
    pub fn from_env() -> Self {
        Self {
            rpc_url: env::var("LEDGER_RPC_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8899".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

/// `LedgerClient` over a JSON-RPC 2.0 endpoint.
///
/// Write calls carry the submitting identity's address and an ed25519
/// signature over the serialized parameters; the RPC node assembles and
/// submits the actual transaction.
pub struct RpcLedgerClient {
    config: RpcConfig,
    client: reqwest::Client,
}

impl RpcLedgerClient {
    pub fn new(config: RpcConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(RpcConfig::from_env())
    }

    async fn call(&self, method: &str, params: Value, is_query: bool) -> Result<Value> {
        debug!("RPC call {} to {}", method, self.config.rpc_url);

        let response = self
            .client
            .post(&self.config.rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params,
            }))
            .send()
            .await
            .map_err(|e| LedgerError::RpcConnection(format!("{}: {}", method, e)))?;

        let status = response.status();
        if !status.is_success() {
            error!("RPC {} returned {}", method, status);
            return Err(LedgerError::RpcConnection(format!(
                "{} returned {}",
                method, status
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::RpcConnection(format!("{}: bad response: {}", method, e)))?;

        if let Some(err) = body.error {
            return Err(map_rpc_error(method, err, is_query));
        }

        body.result
            .ok_or_else(|| LedgerError::Query(format!("{}: response carried no result", method)))
    }

    /// Attach the signer address and a signature over the serialized
    /// parameters to a write call.
    fn signed(identity: &Identity, mut params: Value) -> Result<Value> {
        let payload = serde_json::to_string(&params)
            .map_err(|e| LedgerError::Other(anyhow::anyhow!("failed to encode params: {}", e)))?;
        let signature = identity.sign(payload.as_bytes());

        let obj = params
            .as_object_mut()
            .ok_or_else(|| LedgerError::Other(anyhow::anyhow!("params must be an object")))?;
        obj.insert("signer".to_string(), json!(identity.address().as_str()));
        obj.insert("signature".to_string(), json!(signature));
        Ok(params)
    }

    fn parse<T: serde::de::DeserializeOwned>(method: &str, value: Value) -> Result<T> {
        serde_json::from_value(value)
            .map_err(|e| LedgerError::Query(format!("{}: failed to parse result: {}", method, e)))
    }
}

fn map_rpc_error(method: &str, err: RpcErrorBody, is_query: bool) -> LedgerError {
    match err.code {
        RPC_NOT_FOUND => LedgerError::NotFound(err.message),
        RPC_INSUFFICIENT_BALANCE => LedgerError::InsufficientBalance(err.message),
        _ if is_query => LedgerError::Query(format!("{}: {}", method, err.message)),
        _ => LedgerError::Transaction {
            message: format!("{}: {}", method, err.message),
            signature: None,
        },
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn create_record(
        &self,
        authority: &Identity,
        params: CreateRecordParams,
        commitment: Commitment,
    ) -> Result<AssetRecord> {
        let mut body = serde_json::to_value(&params)
            .map_err(|e| LedgerError::Other(anyhow::anyhow!("failed to encode params: {}", e)))?;
        body.as_object_mut()
            .ok_or_else(|| LedgerError::Other(anyhow::anyhow!("params must be an object")))?
            .insert("commitment".to_string(), json!(commitment.as_str()));

        let result = self
            .call("recordCreate", Self::signed(authority, body)?, false)
            .await?;
        Self::parse("recordCreate", result)
    }

    async fn verify_membership(
        &self,
        authority: &Identity,
        mint: &Address,
        collection: &Address,
        sized: bool,
    ) -> Result<TransactionReceipt> {
        let body = Self::signed(
            authority,
            json!({
                "mint": mint.as_str(),
                "collection": collection.as_str(),
                "sized": sized,
                "commitment": Commitment::Finalized.as_str(),
            }),
        )?;
        let result = self.call("recordVerifyMembership", body, false).await?;
        Self::parse("recordVerifyMembership", result)
    }

    async fn update_record_uri(
        &self,
        authority: &Identity,
        mint: &Address,
        uri: &str,
        commitment: Commitment,
    ) -> Result<TransactionReceipt> {
        let body = Self::signed(
            authority,
            json!({
                "mint": mint.as_str(),
                "uri": uri,
                "commitment": commitment.as_str(),
            }),
        )?;
        let result = self.call("recordUpdateUri", body, false).await?;
        Self::parse("recordUpdateUri", result)
    }

    async fn transfer_record(
        &self,
        authority: &Identity,
        mint: &Address,
        from: &Address,
        to: &Address,
        quantity: u64,
    ) -> Result<TransactionReceipt> {
        let body = Self::signed(
            authority,
            json!({
                "mint": mint.as_str(),
                "from": from.as_str(),
                "to": to.as_str(),
                "quantity": quantity,
                "commitment": Commitment::Finalized.as_str(),
            }),
        )?;
        let result = self.call("recordTransfer", body, false).await?;
        Self::parse("recordTransfer", result)
    }

    async fn record_by_address(&self, mint: &Address) -> Result<AssetRecord> {
        let result = self
            .call("recordByMint", json!({ "mint": mint.as_str() }), true)
            .await?;
        Self::parse("recordByMint", result)
    }

    async fn records_by_owner(&self, owner: &Address) -> Result<Vec<AssetRecord>> {
        let result = self
            .call("recordsByOwner", json!({ "owner": owner.as_str() }), true)
            .await?;
        Self::parse("recordsByOwner", result)
    }

    async fn balance(&self, address: &Address) -> Result<u64> {
        let result = self
            .call("getBalance", json!({ "address": address.as_str() }), true)
            .await?;
        Self::parse("getBalance", result)
    }

    async fn create_token_mint(&self, authority: &Identity, decimals: u8) -> Result<Address> {
        let body = Self::signed(authority, json!({ "decimals": decimals }))?;
        let result = self.call("tokenCreateMint", body, false).await?;
        Self::parse("tokenCreateMint", result)
    }

    async fn ensure_token_account(
        &self,
        authority: &Identity,
        mint: &Address,
        owner: &Address,
    ) -> Result<Address> {
        let body = Self::signed(
            authority,
            json!({
                "mint": mint.as_str(),
                "owner": owner.as_str(),
            }),
        )?;
        let result = self.call("tokenEnsureAccount", body, false).await?;
        Self::parse("tokenEnsureAccount", result)
    }

    async fn mint_tokens(
        &self,
        authority: &Identity,
        mint: &Address,
        account: &Address,
        amount: u64,
    ) -> Result<TransactionReceipt> {
        let body = Self::signed(
            authority,
            json!({
                "mint": mint.as_str(),
                "account": account.as_str(),
                "amount": amount,
            }),
        )?;
        let result = self.call("tokenMintTo", body, false).await?;
        Self::parse("tokenMintTo", result)
    }

    async fn revoke_mint_authority(
        &self,
        authority: &Identity,
        mint: &Address,
    ) -> Result<TransactionReceipt> {
        let body = Self::signed(authority, json!({ "mint": mint.as_str() }))?;
        let result = self.call("tokenRevokeMintAuthority", body, false).await?;
        Self::parse("tokenRevokeMintAuthority", result)
    }

    async fn transfer_tokens(
        &self,
        authority: &Identity,
        from_account: &Address,
        to_account: &Address,
        amount: u64,
    ) -> Result<TransactionReceipt> {
        let body = Self::signed(
            authority,
            json!({
                "fromAccount": from_account.as_str(),
                "toAccount": to_account.as_str(),
                "amount": amount,
            }),
        )?;
        let result = self.call("tokenTransfer", body, false).await?;
        Self::parse("tokenTransfer", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_errors_map_to_taxonomy() {
        let not_found = map_rpc_error(
            "recordByMint",
            RpcErrorBody {
                code: RPC_NOT_FOUND,
                message: "no record".to_string(),
            },
            true,
        );
        assert!(matches!(not_found, LedgerError::NotFound(_)));

        let broke = map_rpc_error(
            "recordTransfer",
            RpcErrorBody {
                code: RPC_INSUFFICIENT_BALANCE,
                message: "empty account".to_string(),
            },
            false,
        );
        assert!(matches!(broke, LedgerError::InsufficientBalance(_)));

        let query = map_rpc_error(
            "recordsByOwner",
            RpcErrorBody {
                code: -32000,
                message: "node unavailable".to_string(),
            },
            true,
        );
        assert!(matches!(query, LedgerError::Query(_)));

        let submit = map_rpc_error(
            "recordCreate",
            RpcErrorBody {
                code: -32000,
                message: "simulation failed".to_string(),
            },
            false,
        );
        assert!(matches!(submit, LedgerError::Transaction { .. }));
    }

    #[test]
    fn signed_params_carry_signer_and_signature() {
        let identity = Identity::generate();
        let params = RpcLedgerClient::signed(&identity, json!({"mint": "abc"})).expect("signed");

        assert_eq!(
            params.get("signer").and_then(|v| v.as_str()),
            Some(identity.address().as_str())
        );
        assert!(params.get("signature").and_then(|v| v.as_str()).is_some());
    }
}
