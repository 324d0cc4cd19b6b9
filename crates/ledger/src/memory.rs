use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::client::LedgerClient;
use crate::error::{LedgerError, Result};
use crate::keypair::Identity;
use crate::types::{Address, AssetRecord, Commitment, CreateRecordParams, TransactionReceipt};

#[derive(Debug, Clone)]
struct TokenMint {
    decimals: u8,
    /// None once the mint authority has been revoked.
    authority: Option<Address>,
}

#[derive(Debug, Clone)]
struct TokenAccount {
    mint: Address,
    owner: Address,
    amount: u64,
}

#[derive(Default)]
struct State {
    /// Collectible records keyed by mint address.
    records: HashMap<Address, AssetRecord>,
    balances: HashMap<Address, u64>,
    token_mints: HashMap<Address, TokenMint>,
    token_accounts: HashMap<Address, TokenAccount>,
    slot: u64,
}

impl State {
    fn receipt(&mut self) -> TransactionReceipt {
        self.slot += 1;
        TransactionReceipt {
            signature: random_signature(),
            slot: self.slot,
        }
    }
}

fn random_address() -> Address {
    Address::from_bytes(&rand::random::<[u8; 32]>())
}

fn random_signature() -> String {
    let bytes: [u8; 32] = rand::random();
    bs58::encode(bytes).into_string()
}

/// In-memory ledger with the same observable semantics as the RPC-backed
/// client: dangling collection references verify-fail, double transfers
/// hit insufficient balance, revoked mints refuse further minting.
///
/// Every submission is immediately final, so commitment levels are
/// accepted and ignored.
#[derive(Default)]
pub struct MemoryLedger {
    state: RwLock<State>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit native balance to an address (test setup).
    pub async fn credit(&self, address: &Address, amount: u64) {
        let mut state = self.state.write().await;
        *state.balances.entry(address.clone()).or_insert(0) += amount;
    }

    /// Fungible balance of a token account (test inspection).
    pub async fn token_account_amount(&self, account: &Address) -> Option<u64> {
        self.state
            .read()
            .await
            .token_accounts
            .get(account)
            .map(|a| a.amount)
    }

    /// Decimals of a token mint (test inspection).
    pub async fn token_mint_decimals(&self, mint: &Address) -> Option<u8> {
        self.state
            .read()
            .await
            .token_mints
            .get(mint)
            .map(|m| m.decimals)
    }
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn create_record(
        &self,
        authority: &Identity,
        params: CreateRecordParams,
        _commitment: Commitment,
    ) -> Result<AssetRecord> {
        let mut state = self.state.write().await;
        let record = AssetRecord {
            address: random_address(),
            mint: random_address(),
            owner: authority.address().clone(),
            uri: params.uri,
            name: params.name,
            symbol: params.symbol,
            collection: params.collection,
            verified: false,
            is_collection: params.is_collection,
        };
        state.records.insert(record.mint.clone(), record.clone());
        state.slot += 1;
        Ok(record)
    }

    async fn verify_membership(
        &self,
        _authority: &Identity,
        mint: &Address,
        collection: &Address,
        _sized: bool,
    ) -> Result<TransactionReceipt> {
        let mut state = self.state.write().await;

        let collection_ok = state
            .records
            .get(collection)
            .map(|r| r.is_collection)
            .unwrap_or(false);
        if !collection_ok {
            return Err(LedgerError::NotFound(format!(
                "collection anchor {} does not exist",
                collection
            )));
        }

        let record = state
            .records
            .get_mut(mint)
            .ok_or_else(|| LedgerError::NotFound(format!("record {}", mint)))?;

        if record.collection.as_ref() != Some(collection) {
            return Err(LedgerError::Transaction {
                message: format!("record {} does not reference collection {}", mint, collection),
                signature: None,
            });
        }

        record.verified = true;
        Ok(state.receipt())
    }

    async fn update_record_uri(
        &self,
        _authority: &Identity,
        mint: &Address,
        uri: &str,
        _commitment: Commitment,
    ) -> Result<TransactionReceipt> {
        let mut state = self.state.write().await;
        let record = state
            .records
            .get_mut(mint)
            .ok_or_else(|| LedgerError::NotFound(format!("record {}", mint)))?;
        record.uri = uri.to_string();
        Ok(state.receipt())
    }

    async fn transfer_record(
        &self,
        _authority: &Identity,
        mint: &Address,
        from: &Address,
        to: &Address,
        quantity: u64,
    ) -> Result<TransactionReceipt> {
        if quantity != 1 {
            return Err(LedgerError::Transaction {
                message: format!("quantity for a collectible record must be 1, got {}", quantity),
                signature: None,
            });
        }

        let mut state = self.state.write().await;
        let record = state
            .records
            .get_mut(mint)
            .ok_or_else(|| LedgerError::NotFound(format!("record {}", mint)))?;

        if &record.owner != from {
            return Err(LedgerError::InsufficientBalance(format!(
                "{} does not hold record {}",
                from, mint
            )));
        }

        record.owner = to.clone();
        Ok(state.receipt())
    }

    async fn record_by_address(&self, mint: &Address) -> Result<AssetRecord> {
        self.state
            .read()
            .await
            .records
            .get(mint)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(format!("record {}", mint)))
    }

    async fn records_by_owner(&self, owner: &Address) -> Result<Vec<AssetRecord>> {
        Ok(self
            .state
            .read()
            .await
            .records
            .values()
            .filter(|r| &r.owner == owner)
            .cloned()
            .collect())
    }

    async fn balance(&self, address: &Address) -> Result<u64> {
        Ok(self
            .state
            .read()
            .await
            .balances
            .get(address)
            .copied()
            .unwrap_or(0))
    }

    async fn create_token_mint(&self, authority: &Identity, decimals: u8) -> Result<Address> {
        let mut state = self.state.write().await;
        let mint = random_address();
        state.token_mints.insert(
            mint.clone(),
            TokenMint {
                decimals,
                authority: Some(authority.address().clone()),
            },
        );
        state.slot += 1;
        Ok(mint)
    }

    async fn ensure_token_account(
        &self,
        _authority: &Identity,
        mint: &Address,
        owner: &Address,
    ) -> Result<Address> {
        let mut state = self.state.write().await;

        if !state.token_mints.contains_key(mint) {
            return Err(LedgerError::NotFound(format!("token mint {}", mint)));
        }

        let existing = state
            .token_accounts
            .iter()
            .find(|(_, acc)| &acc.mint == mint && &acc.owner == owner)
            .map(|(addr, _)| addr.clone());
        if let Some(address) = existing {
            return Ok(address);
        }

        let address = random_address();
        state.token_accounts.insert(
            address.clone(),
            TokenAccount {
                mint: mint.clone(),
                owner: owner.clone(),
                amount: 0,
            },
        );
        state.slot += 1;
        Ok(address)
    }

    async fn mint_tokens(
        &self,
        authority: &Identity,
        mint: &Address,
        account: &Address,
        amount: u64,
    ) -> Result<TransactionReceipt> {
        let mut state = self.state.write().await;

        let mint_info = state
            .token_mints
            .get(mint)
            .ok_or_else(|| LedgerError::NotFound(format!("token mint {}", mint)))?;
        match &mint_info.authority {
            Some(addr) if addr == authority.address() => {}
            Some(_) => {
                return Err(LedgerError::Transaction {
                    message: format!("{} is not the mint authority of {}", authority.address(), mint),
                    signature: None,
                });
            }
            None => {
                return Err(LedgerError::Transaction {
                    message: format!("mint authority of {} has been revoked", mint),
                    signature: None,
                });
            }
        }

        let token_account = state
            .token_accounts
            .get_mut(account)
            .ok_or_else(|| LedgerError::NotFound(format!("token account {}", account)))?;
        if &token_account.mint != mint {
            return Err(LedgerError::Transaction {
                message: format!("token account {} does not hold mint {}", account, mint),
                signature: None,
            });
        }
        token_account.amount += amount;
        Ok(state.receipt())
    }

    async fn revoke_mint_authority(
        &self,
        authority: &Identity,
        mint: &Address,
    ) -> Result<TransactionReceipt> {
        let mut state = self.state.write().await;
        let mint_info = state
            .token_mints
            .get_mut(mint)
            .ok_or_else(|| LedgerError::NotFound(format!("token mint {}", mint)))?;

        if mint_info.authority.as_ref() != Some(authority.address()) {
            return Err(LedgerError::Transaction {
                message: format!("{} is not the mint authority of {}", authority.address(), mint),
                signature: None,
            });
        }

        mint_info.authority = None;
        Ok(state.receipt())
    }

    async fn transfer_tokens(
        &self,
        _authority: &Identity,
        from_account: &Address,
        to_account: &Address,
        amount: u64,
    ) -> Result<TransactionReceipt> {
        let mut state = self.state.write().await;

        let from = state
            .token_accounts
            .get(from_account)
            .ok_or_else(|| LedgerError::NotFound(format!("token account {}", from_account)))?;
        if from.amount < amount {
            return Err(LedgerError::InsufficientBalance(format!(
                "token account {} holds {}, needs {}",
                from_account, from.amount, amount
            )));
        }
        let from_mint = from.mint.clone();

        let to = state
            .token_accounts
            .get(to_account)
            .ok_or_else(|| LedgerError::NotFound(format!("token account {}", to_account)))?;
        if to.mint != from_mint {
            return Err(LedgerError::Transaction {
                message: format!(
                    "token accounts {} and {} hold different mints",
                    from_account, to_account
                ),
                signature: None,
            });
        }

        if let Some(acc) = state.token_accounts.get_mut(from_account) {
            acc.amount -= amount;
        }
        if let Some(acc) = state.token_accounts.get_mut(to_account) {
            acc.amount += amount;
        }
        Ok(state.receipt())
    }
}
