use ledger::{
    CollectionRecord, Commitment, CreateRecordParams, Identity, LedgerClient, MetadataDescriptor,
};
use tracing::info;

use crate::error::Result;

/// Create the anchor record for a collection at finalized commitment.
///
/// The anchor carries no collection reference of its own and is created
/// as a sized collection, so member verification maintains an on-chain
/// count.
pub async fn create_collection(
    ledger: &dyn LedgerClient,
    authority: &Identity,
    uri: &str,
    descriptor: &MetadataDescriptor,
) -> Result<CollectionRecord> {
    let record = ledger
        .create_record(
            authority,
            CreateRecordParams {
                uri: uri.to_string(),
                name: descriptor.name.clone(),
                symbol: descriptor.symbol.clone(),
                royalty_basis_points: descriptor.royalty_basis_points,
                collection: None,
                is_collection: true,
            },
            Commitment::Finalized,
        )
        .await?;

    info!("Collection mint: {}", record.mint);

    Ok(CollectionRecord {
        address: record.address,
        mint: record.mint,
        authority: authority.address().clone(),
        uri: record.uri,
        sized: true,
    })
}
