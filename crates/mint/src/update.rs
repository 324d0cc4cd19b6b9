use ledger::{Address, Commitment, Identity, LedgerClient, TransactionReceipt};
use tracing::{debug, info};

use crate::error::Result;

/// Rewrite a record's metadata URI pointer in place.
///
/// Read-then-write with last-write-wins semantics: no optimistic
/// concurrency detection against external mutation of the same record.
pub async fn update_uri(
    ledger: &dyn LedgerClient,
    authority: &Identity,
    mint: &Address,
    new_uri: &str,
) -> Result<TransactionReceipt> {
    let record = ledger.record_by_address(mint).await?;
    debug!("Updating {} uri: {} -> {}", mint, record.uri, new_uri);

    let receipt = ledger
        .update_record_uri(authority, &record.mint, new_uri, Commitment::Finalized)
        .await?;

    info!("Updated uri of {}, tx: {}", mint, receipt.signature);
    Ok(receipt)
}
