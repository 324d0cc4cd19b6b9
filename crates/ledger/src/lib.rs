// Module declarations
pub mod client;
pub mod error;
pub mod faucet;
pub mod keypair;
pub mod memory;
pub mod rpc;
pub mod types;

// Re-export commonly used types
pub use client::LedgerClient;
pub use error::{LedgerError, Result};
pub use keypair::{initialize_keypair, Identity};
pub use memory::MemoryLedger;
pub use rpc::{RpcConfig, RpcLedgerClient};
pub use types::{
    Address, AssetRecord, CollectionRecord, Commitment, CreateRecordParams, MetadataDescriptor,
    TransactionReceipt,
};
