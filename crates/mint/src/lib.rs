//! Asset lifecycle orchestration.
//!
//! The flows here combine off-chain uploads with on-chain submissions.
//! Every step is causally ordered: an upload must complete before the
//! creation call that references its result, and a creation must be
//! finalized before verification can reference its address. Partial
//! on-chain state is never rolled back; it is reported.

pub mod asset;
pub mod collection;
pub mod error;
pub mod token;
pub mod transfer;
pub mod update;
pub mod uploader;

pub use asset::{create_asset, verify_asset, AssetMint, MintState};
pub use collection::create_collection;
pub use error::{MintError, Result};
pub use token::{provision_token, TokenProvision, TokenProvisionParams};
pub use transfer::{transfer, COLLECTIBLE_QUANTITY};
pub use update::update_uri;
pub use uploader::upload_metadata;
