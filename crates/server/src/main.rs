use std::env;
use std::sync::Arc;

use anyhow::Result;
use ledger::{RpcConfig, RpcLedgerClient};
use offchain::{StoreClient, StoreConfig, StoreNetwork};
use server::routes::{create_router, AppState};
use server::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let rpc_config = RpcConfig::from_env();

    let store_config = StoreConfig {
        network: match env::var("STORE_NETWORK").as_deref() {
            Ok("local") => StoreNetwork::Local,
            _ => StoreNetwork::Devnet,
        },
        ..Default::default()
    };

    info!("Ledger RPC: {}", rpc_config.rpc_url);
    info!("Store publisher: {}", store_config.publisher_url());
    info!("Store aggregator: {}", store_config.aggregator_url());

    let state = AppState {
        ledger: Arc::new(RpcLedgerClient::new(rpc_config)),
        store: Arc::new(StoreClient::with_config(store_config)),
        config: Arc::new(config.clone()),
        resolver: history::ResolverConfig::from_env(),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server is running on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
