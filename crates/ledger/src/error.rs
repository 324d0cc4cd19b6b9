use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("RPC connection failed: {0}")]
    RpcConnection(String),

    #[error("transaction failed: {message}{}", signature.as_ref().map(|s| format!(" (tx: {})", s)).unwrap_or_default())]
    Transaction {
        message: String,
        signature: Option<String>,
    },

    #[error("insufficient balance: {0}")]
    InsufficientBalance(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl LedgerError {
    /// True for failures of read calls rather than submissions.
    pub fn is_query_failure(&self) -> bool {
        matches!(self, LedgerError::Query(_) | LedgerError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
