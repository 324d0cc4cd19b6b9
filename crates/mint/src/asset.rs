use ledger::{
    Address, AssetRecord, Commitment, CreateRecordParams, Identity, LedgerClient,
    MetadataDescriptor, TransactionReceipt,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;

/// Where a member mint ended up.
///
/// `FailedUnverified` is a valid terminal state, not a failure: the
/// record exists on the ledger and only the membership verification is
/// missing. A rollback is not possible; the caller can resume with
/// [`verify_asset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MintState {
    Created,
    Verified,
    FailedUnverified,
}

/// Result of the two-phase member mint.
#[derive(Debug, Clone)]
pub struct AssetMint {
    pub record: AssetRecord,
    pub state: MintState,
    /// Phase-2 error when `state` is `FailedUnverified`.
    pub verify_error: Option<String>,
}

/// Mint a member record into a collection.
///
/// Phase 1 submits the creation referencing `collection` and waits for
/// finalized commitment. Phase 2 submits the sized-collection membership
/// verification and must not start before phase 1's address is known.
/// A phase-2 failure leaves the phase-1 record in place and is reported
/// in the returned state, not as an error.
pub async fn create_asset(
    ledger: &dyn LedgerClient,
    authority: &Identity,
    uri: &str,
    descriptor: &MetadataDescriptor,
    collection: &Address,
) -> Result<AssetMint> {
    let record = ledger
        .create_record(
            authority,
            CreateRecordParams {
                uri: uri.to_string(),
                name: descriptor.name.clone(),
                symbol: descriptor.symbol.clone(),
                royalty_basis_points: descriptor.royalty_basis_points,
                collection: Some(collection.clone()),
                is_collection: false,
            },
            Commitment::Finalized,
        )
        .await?;

    info!("Token mint: {}", record.mint);

    match ledger
        .verify_membership(authority, &record.mint, collection, true)
        .await
    {
        Ok(receipt) => {
            info!(
                "Verified {} as member of {}, tx: {}",
                record.mint, collection, receipt.signature
            );
            let mut record = record;
            record.verified = true;
            Ok(AssetMint {
                record,
                state: MintState::Verified,
                verify_error: None,
            })
        }
        Err(e) => {
            warn!(
                "Record {} created but verification against {} failed: {}",
                record.mint, collection, e
            );
            Ok(AssetMint {
                record,
                state: MintState::FailedUnverified,
                verify_error: Some(e.to_string()),
            })
        }
    }
}

/// Resume phase 2 alone for a created-but-unverified record.
pub async fn verify_asset(
    ledger: &dyn LedgerClient,
    authority: &Identity,
    mint: &Address,
    collection: &Address,
) -> Result<TransactionReceipt> {
    let receipt = ledger
        .verify_membership(authority, mint, collection, true)
        .await?;
    info!(
        "Verified {} as member of {}, tx: {}",
        mint, collection, receipt.signature
    );
    Ok(receipt)
}
