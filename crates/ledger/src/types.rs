use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Base58-encoded 32-byte ledger address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Parse and validate a base58 address string.
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| LedgerError::InvalidAddress(format!("{}: {}", s, e)))?;
        if bytes.len() != 32 {
            return Err(LedgerError::InvalidAddress(format!(
                "{}: expected 32 bytes, got {}",
                s,
                bytes.len()
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Encode raw key bytes as an address.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(bs58::encode(bytes).into_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Confirmation level requested when submitting a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

/// Off-chain metadata description for a record to be minted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDescriptor {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub royalty_basis_points: u16,
    /// File name of the asset image, relative to the gallery directory.
    pub image_file: String,
}

/// Parameters for a record-creation transaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordParams {
    pub uri: String,
    pub name: String,
    pub symbol: String,
    pub royalty_basis_points: u16,
    /// Collection anchor this record claims membership of (unverified
    /// until a verification transaction lands).
    pub collection: Option<Address>,
    /// Marks the record itself as a collection anchor.
    pub is_collection: bool,
}

/// Ledger-resident collectible record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub address: Address,
    pub mint: Address,
    pub owner: Address,
    pub uri: String,
    pub name: String,
    pub symbol: String,
    pub collection: Option<Address>,
    /// Collection membership verification status.
    pub verified: bool,
    pub is_collection: bool,
}

/// Ledger-resident collection anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    pub address: Address,
    pub mint: Address,
    pub authority: Address,
    pub uri: String,
    /// Sized collections track member counts on chain.
    pub sized: bool,
}

/// Receipt for a submitted transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub signature: String,
    pub slot: u64,
}
