use ledger::LedgerError;
use offchain::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MintError {
    /// Off-chain store unreachable or rejected content. Safe to retry
    /// manually; nothing partial is kept.
    #[error("upload failed: {0}")]
    Upload(#[from] StoreError),

    /// Ledger submission or query failed. Prior finalized steps are not
    /// rolled back.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, MintError>;
