//! Error types for the faucet service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use drip_ledger::LedgerError;
use thiserror::Error;

/// Faucet service errors
#[derive(Error, Debug)]
pub enum FaucetError {
    #[error("Invalid receiver address")]
    InvalidAddress,

    #[error("Invalid transfer amount")]
    InvalidAmount,

    #[error("Invalid amount, SOL can have at most 9 places of decimal precision")]
    AmountPrecision,

    #[error("Invalid amount, at most 3 SOL can be sent at once")]
    AmountOutOfRange,

    #[error("Not enough SOL to send")]
    InsufficientFunds,

    #[error("Failed to send SOL: {0}")]
    Configuration(String),

    #[error("Failed to send SOL: {0}")]
    Ledger(#[from] LedgerError),
}

impl FaucetError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FaucetError::InvalidAddress
            | FaucetError::InvalidAmount
            | FaucetError::AmountPrecision
            | FaucetError::AmountOutOfRange => StatusCode::BAD_REQUEST,
            // 500 is the established contract for an underfunded faucet.
            FaucetError::InsufficientFunds => StatusCode::INTERNAL_SERVER_ERROR,
            FaucetError::Configuration(_) | FaucetError::Ledger(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Plain-text body, status per `status_code`.
impl IntoResponse for FaucetError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

pub type FaucetResult<T> = Result<T, FaucetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(FaucetError::InvalidAddress.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(FaucetError::AmountOutOfRange.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(FaucetError::InsufficientFunds.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!FaucetError::Configuration("x".into()).is_client_error());
    }

    #[test]
    fn test_ledger_error_wraps_cause() {
        let err: FaucetError = LedgerError::Rpc {
            code: -32002,
            message: "Blockhash not found".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Failed to send SOL: RPC error -32002: Blockhash not found");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
