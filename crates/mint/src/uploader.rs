use ledger::MetadataDescriptor;
use offchain::OffchainStore;
use serde_json::json;
use tracing::info;

use crate::error::Result;

/// Upload an asset and its metadata document, returning the document URI.
///
/// Strict two-step sequence: the asset bytes go up first, and the JSON
/// document embeds the resulting reference as its `image` field, so the
/// second upload cannot start before the first completes. Either failure
/// fails the whole call; the store is content-addressed, so a full retry
/// is safe and nothing is cached locally.
pub async fn upload_metadata(
    store: &dyn OffchainStore,
    descriptor: &MetadataDescriptor,
    asset_bytes: Vec<u8>,
) -> Result<String> {
    let image_uri = store.upload_blob(asset_bytes).await?;
    info!("image uri: {}", image_uri);

    let document = json!({
        "name": descriptor.name,
        "symbol": descriptor.symbol,
        "description": descriptor.description,
        "image": image_uri,
    });

    let uri = store.upload_json(&document).await?;
    info!("metadata uri: {}", uri);
    Ok(uri)
}
