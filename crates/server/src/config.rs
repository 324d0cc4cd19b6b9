//! Server configuration.
//!
//! The demo mint descriptors live here so handlers work from an explicit
//! request-scoped copy instead of process-wide mutable defaults.

use std::env;
use std::path::PathBuf;

use ledger::{Address, MetadataDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Directory holding the demo asset files.
    #[serde(default = "default_gallery_dir")]
    pub gallery_dir: PathBuf,

    /// Descriptor for the demo collection anchor.
    #[serde(default = "default_collection_descriptor")]
    pub collection_descriptor: MetadataDescriptor,

    /// Descriptor for the demo member record.
    #[serde(default = "default_asset_descriptor")]
    pub asset_descriptor: MetadataDescriptor,

    /// Optional recipient for the fungible provisioning flow's initial
    /// transfer.
    #[serde(default)]
    pub token_recipient: Option<Address>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            gallery_dir: default_gallery_dir(),
            collection_descriptor: default_collection_descriptor(),
            asset_descriptor: default_asset_descriptor(),
            token_recipient: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = env::var("SERVER_ADDRESS") {
            config.bind_addr = addr;
        }
        if let Ok(dir) = env::var("GALLERY_DIR") {
            config.gallery_dir = PathBuf::from(dir);
        }
        if let Ok(recipient) = env::var("TOKEN_RECIPIENT") {
            match Address::parse(&recipient) {
                Ok(address) => config.token_recipient = Some(address),
                Err(e) => {
                    tracing::warn!("Ignoring invalid TOKEN_RECIPIENT: {}", e);
                }
            }
        }

        config
    }
}

fn default_bind_addr() -> String {
    format!("0.0.0.0:{}", env::var("PORT").unwrap_or_else(|_| "3000".to_string()))
}

fn default_gallery_dir() -> PathBuf {
    PathBuf::from("gallery")
}

fn default_collection_descriptor() -> MetadataDescriptor {
    MetadataDescriptor {
        name: "TYCHO_TECH".to_string(),
        symbol: "TECH".to_string(),
        description: "Test Description Collection".to_string(),
        royalty_basis_points: 0,
        image_file: "gallery-nft-03.png".to_string(),
    }
}

fn default_asset_descriptor() -> MetadataDescriptor {
    MetadataDescriptor {
        name: "Name".to_string(),
        symbol: "SYMBOL".to_string(),
        description: "Description".to_string(),
        royalty_basis_points: 0,
        image_file: "gallery-nft-02.png".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = ServerConfig::default();
        assert_eq!(config.collection_descriptor.symbol, "TECH");
        assert_eq!(config.asset_descriptor.name, "Name");
        assert!(config.token_recipient.is_none());
    }
}
