use async_trait::async_trait;

use crate::error::Result;
use crate::keypair::Identity;
use crate::types::{Address, AssetRecord, Commitment, CreateRecordParams, TransactionReceipt};

/// Trusted RPC boundary to the ledger.
///
/// Submissions take an explicit commitment level; the multi-step mint
/// flows always request `Finalized` before acting on a result. No retry
/// or backoff is layered here.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    // ===== Collectible records =====

    /// Submit a record-creation transaction and wait for `commitment`.
    async fn create_record(
        &self,
        authority: &Identity,
        params: CreateRecordParams,
        commitment: Commitment,
    ) -> Result<AssetRecord>;

    /// Assert membership of `mint` in `collection`, with sized-collection
    /// accounting when `sized` is set.
    async fn verify_membership(
        &self,
        authority: &Identity,
        mint: &Address,
        collection: &Address,
        sized: bool,
    ) -> Result<TransactionReceipt>;

    /// Replace the URI pointer of an existing record.
    async fn update_record_uri(
        &self,
        authority: &Identity,
        mint: &Address,
        uri: &str,
        commitment: Commitment,
    ) -> Result<TransactionReceipt>;

    /// Move `quantity` units of `mint` between two accounts in one
    /// atomic instruction.
    async fn transfer_record(
        &self,
        authority: &Identity,
        mint: &Address,
        from: &Address,
        to: &Address,
        quantity: u64,
    ) -> Result<TransactionReceipt>;

    // ===== Queries =====

    /// Look up one record by its mint address.
    async fn record_by_address(&self, mint: &Address) -> Result<AssetRecord>;

    /// All records currently owned by `owner`. Unpaginated.
    async fn records_by_owner(&self, owner: &Address) -> Result<Vec<AssetRecord>>;

    /// Native balance of an address, in base units.
    async fn balance(&self, address: &Address) -> Result<u64>;

    // ===== Fungible token provisioning =====

    /// Create a fungible token mint with the given decimals.
    async fn create_token_mint(&self, authority: &Identity, decimals: u8) -> Result<Address>;

    /// Get or create the token account holding `mint` for `owner`.
    async fn ensure_token_account(
        &self,
        authority: &Identity,
        mint: &Address,
        owner: &Address,
    ) -> Result<Address>;

    /// Mint `amount` base units into a token account.
    async fn mint_tokens(
        &self,
        authority: &Identity,
        mint: &Address,
        account: &Address,
        amount: u64,
    ) -> Result<TransactionReceipt>;

    /// Permanently revoke the mint authority.
    async fn revoke_mint_authority(
        &self,
        authority: &Identity,
        mint: &Address,
    ) -> Result<TransactionReceipt>;

    /// Move fungible tokens between two token accounts.
    async fn transfer_tokens(
        &self,
        authority: &Identity,
        from_account: &Address,
        to_account: &Address,
        amount: u64,
    ) -> Result<TransactionReceipt>;
}
