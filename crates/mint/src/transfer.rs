use ledger::{Address, Identity, LedgerClient, TransactionReceipt};
use tracing::info;

use crate::error::Result;

/// Quantity moved for a non-fungible record.
pub const COLLECTIBLE_QUANTITY: u64 = 1;

/// Move `quantity` units of a record between two accounts.
///
/// One atomic instruction: either the whole move lands or none of it.
/// The destination account must already exist; creating it is the
/// caller's concern.
pub async fn transfer(
    ledger: &dyn LedgerClient,
    authority: &Identity,
    mint: &Address,
    from: &Address,
    to: &Address,
    quantity: u64,
) -> Result<TransactionReceipt> {
    let receipt = ledger
        .transfer_record(authority, mint, from, to, quantity)
        .await?;
    info!(
        "Transferred {} x{} from {} to {}, tx: {}",
        mint, quantity, from, to, receipt.signature
    );
    Ok(receipt)
}
