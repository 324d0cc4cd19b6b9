use std::env;

use anyhow::anyhow;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use tracing::{info, warn};

use crate::client::LedgerClient;
use crate::error::{LedgerError, Result};
use crate::faucet;
use crate::types::Address;

/// Environment variable holding the base58-encoded 32-byte signing seed.
pub const SECRET_KEY_ENV: &str = "MINTER_SECRET_KEY";

/// Balance floor below which `initialize_keypair` asks the faucet for funds.
const MIN_FUNDING_BASE_UNITS: u64 = 1_000_000_000;

/// Signing credential with its derived public address.
///
/// Owned by the process for the duration of one request and never
/// persisted by this system.
pub struct Identity {
    signing_key: SigningKey,
    address: Address,
}

impl Identity {
    /// Generate a fresh random identity.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let address = Address::from_bytes(&signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Load an identity from a base58-encoded 32-byte seed.
    pub fn from_base58(seed: &str) -> Result<Self> {
        let bytes = bs58::decode(seed)
            .into_vec()
            .map_err(|e| LedgerError::Other(anyhow!("invalid secret key encoding: {}", e)))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| LedgerError::Other(anyhow!("secret key must be 32 bytes")))?;
        let signing_key = SigningKey::from_bytes(&seed);
        let address = Address::from_bytes(&signing_key.verifying_key().to_bytes());
        Ok(Self {
            signing_key,
            address,
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Sign a message, returning the base58-encoded signature.
    pub fn sign(&self, message: &[u8]) -> String {
        let signature = self.signing_key.sign(message);
        bs58::encode(signature.to_bytes()).into_string()
    }
}

/// Load or generate the request's signing identity and ensure it is funded.
///
/// The secret is taken from `MINTER_SECRET_KEY` when present; otherwise a
/// fresh keypair is generated. Funding is requested from the faucet only
/// when `FAUCET_URL` is configured and the balance is below the floor; a
/// faucet failure is logged and tolerated so read-only flows still work.
pub async fn initialize_keypair(ledger: &dyn LedgerClient) -> Result<Identity> {
    let identity = match env::var(SECRET_KEY_ENV) {
        Ok(seed) => Identity::from_base58(&seed)?,
        Err(_) => {
            info!("{} not set, generating a fresh keypair", SECRET_KEY_ENV);
            Identity::generate()
        }
    };

    let balance = ledger.balance(identity.address()).await.unwrap_or(0);

    if balance < MIN_FUNDING_BASE_UNITS {
        match env::var("FAUCET_URL") {
            Ok(faucet_url) => {
                match faucet::request_airdrop(&faucet_url, identity.address()).await {
                    Ok(signature) => {
                        info!(
                            "Funded {} via faucet, tx: {}",
                            identity.address(),
                            signature
                        );
                    }
                    Err(e) => {
                        warn!(
                            "Faucet request for {} failed: {}. Continuing unfunded.",
                            identity.address(),
                            e
                        );
                    }
                }
            }
            Err(_) => {
                warn!(
                    "Balance of {} is {} and FAUCET_URL is not set. Continuing unfunded.",
                    identity.address(),
                    balance
                );
            }
        }
    }

    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_address_is_valid() {
        let identity = Identity::generate();
        assert!(Address::parse(identity.address().as_str()).is_ok());
    }

    #[test]
    fn seed_is_deterministic() {
        let seed = bs58::encode([42u8; 32]).into_string();
        let a = Identity::from_base58(&seed).expect("identity");
        let b = Identity::from_base58(&seed).expect("identity");
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn wrong_seed_length_is_rejected() {
        let seed = bs58::encode([1u8; 16]).into_string();
        assert!(Identity::from_base58(&seed).is_err());
    }

    #[test]
    fn signatures_differ_per_message() {
        let identity = Identity::generate();
        assert_ne!(identity.sign(b"one"), identity.sign(b"two"));
    }
}
