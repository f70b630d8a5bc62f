//! Devnet SOL faucet
//!
//! One endpoint, `GET /transfer/:addr?amount=<sol>`, that sends a bounded
//! amount of test-cluster SOL from a single pre-funded account and answers
//! with an explorer link to the submitted transaction.

pub mod api;
pub mod config;
pub mod error;
pub mod service;
pub mod validation;

pub use config::FaucetConfig;
pub use error::{FaucetError, FaucetResult};
pub use service::{FaucetService, TransferReceipt};
