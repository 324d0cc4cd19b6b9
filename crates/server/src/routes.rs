use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use history::{resolve_history, HistoryEntry, ResolverConfig};
use ledger::{initialize_keypair, Address, LedgerClient};
use mint::{
    create_asset, create_collection, provision_token, transfer, upload_metadata, MintState,
    TokenProvision, TokenProvisionParams, COLLECTIBLE_QUANTITY,
};
use offchain::OffchainStore;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn LedgerClient>,
    pub store: Arc<dyn OffchainStore>,
    pub config: Arc<ServerConfig>,
    pub resolver: ResolverConfig,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/create-nft", get(create_nft))
        .route("/transfer-nft", post(transfer_nft))
        .route("/create-token", get(create_token))
        .route("/api/transaction-history", post(transaction_history))
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNftResponse {
    pub message: String,
    pub collection_mint: Address,
    pub asset_mint: Address,
    pub mint_state: MintState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub nft_mint_address: Option<String>,
    pub from_public_key: Option<String>,
    pub to_public_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub message: String,
    pub signature: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenResponse {
    pub message: String,
    #[serde(flatten)]
    pub provision: TokenProvision,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    pub wallet_address: Option<String>,
}

async fn read_gallery_file(gallery_dir: &Path, file_name: &str) -> Result<Vec<u8>, ApiError> {
    let path = gallery_dir.join(file_name);
    tokio::fs::read(&path).await.map_err(|e| {
        ApiError::internal(format!("failed to read asset file {}: {}", path.display(), e))
    })
}

/// Demo mint flow: collection anchor first, then one verified member,
/// both described by the configured request-scoped descriptors.
pub async fn create_nft(
    State(state): State<AppState>,
) -> Result<Json<CreateNftResponse>, ApiError> {
    let identity = initialize_keypair(&*state.ledger).await?;
    info!("PublicKey: {}", identity.address());

    let collection_descriptor = state.config.collection_descriptor.clone();
    let collection_bytes =
        read_gallery_file(&state.config.gallery_dir, &collection_descriptor.image_file).await?;
    let collection_uri =
        upload_metadata(&*state.store, &collection_descriptor, collection_bytes).await?;
    let collection =
        create_collection(&*state.ledger, &identity, &collection_uri, &collection_descriptor)
            .await?;

    let asset_descriptor = state.config.asset_descriptor.clone();
    let asset_bytes =
        read_gallery_file(&state.config.gallery_dir, &asset_descriptor.image_file).await?;
    let asset_uri = upload_metadata(&*state.store, &asset_descriptor, asset_bytes).await?;
    let minted = create_asset(
        &*state.ledger,
        &identity,
        &asset_uri,
        &asset_descriptor,
        &collection.mint,
    )
    .await?;

    // Created-but-unverified is reported as its own outcome, not a 500:
    // the record exists and only the verification step can be retried.
    let message = match minted.state {
        MintState::FailedUnverified => {
            "NFT created but collection membership is unverified".to_string()
        }
        _ => "NFT created successfully".to_string(),
    };

    Ok(Json(CreateNftResponse {
        message,
        collection_mint: collection.mint,
        asset_mint: minted.record.mint,
        mint_state: minted.state,
        verify_error: minted.verify_error,
    }))
}

/// Move one collectible between two accounts.
pub async fn transfer_nft(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    // All fields are validated before any I/O happens.
    let mint_address = request
        .nft_mint_address
        .as_deref()
        .ok_or_else(|| ApiError::validation("nftMintAddress is required"))?;
    let from = request
        .from_public_key
        .as_deref()
        .ok_or_else(|| ApiError::validation("fromPublicKey is required"))?;
    let to = request
        .to_public_key
        .as_deref()
        .ok_or_else(|| ApiError::validation("toPublicKey is required"))?;

    let mint_address = Address::parse(mint_address)
        .map_err(|e| ApiError::validation(format!("nftMintAddress: {}", e)))?;
    let from = Address::parse(from)
        .map_err(|e| ApiError::validation(format!("fromPublicKey: {}", e)))?;
    let to =
        Address::parse(to).map_err(|e| ApiError::validation(format!("toPublicKey: {}", e)))?;

    let identity = initialize_keypair(&*state.ledger).await?;
    let receipt = transfer(
        &*state.ledger,
        &identity,
        &mint_address,
        &from,
        &to,
        COLLECTIBLE_QUANTITY,
    )
    .await?;

    Ok(Json(TransferResponse {
        message: "NFT transferred successfully".to_string(),
        signature: receipt.signature,
    }))
}

/// Provision a fungible token. Failures come back as typed envelopes
/// like every other endpoint.
pub async fn create_token(
    State(state): State<AppState>,
) -> Result<Json<CreateTokenResponse>, ApiError> {
    let identity = initialize_keypair(&*state.ledger).await?;

    let provision = provision_token(
        &*state.ledger,
        &identity,
        TokenProvisionParams {
            recipient: state.config.token_recipient.clone(),
            ..Default::default()
        },
    )
    .await?;

    Ok(Json(CreateTokenResponse {
        message: "Token created successfully".to_string(),
        provision,
    }))
}

/// Resolve every holding of a wallet into its metadata document.
pub async fn transaction_history(
    State(state): State<AppState>,
    Json(request): Json<HistoryRequest>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let wallet = request
        .wallet_address
        .as_deref()
        .ok_or_else(|| ApiError::validation("Wallet address is required"))?;
    let owner = Address::parse(wallet)
        .map_err(|e| ApiError::validation(format!("walletAddress: {}", e)))?;

    let entries = resolve_history(&*state.ledger, &*state.store, &owner, &state.resolver).await?;
    info!("Resolved {} holdings for {}", entries.len(), owner);

    Ok(Json(entries))
}
