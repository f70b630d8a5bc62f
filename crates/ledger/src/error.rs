//! Error types for ledger primitives and the RPC client

use thiserror::Error;

/// Ledger errors
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid public key input: {0}")]
    InvalidPubkey(String),

    #[error("Invalid blockhash: {0}")]
    InvalidHash(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("Unsupported cluster: {0}")]
    UnsupportedCluster(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Transaction too large: {0} bytes")]
    TransactionTooLarge(usize),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
