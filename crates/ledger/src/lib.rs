//! Ledger primitives and client for Solana-style test clusters
//!
//! Covers what a native SOL transfer needs end to end:
//! - base-58 public keys, blockhashes and signatures
//! - ed25519 keypairs loaded from JSON byte-array secrets
//! - the system-program transfer instruction
//! - v0 message compilation and versioned transaction signing
//! - a JSON-RPC client behind the `LedgerConnector` / `LedgerConnection` traits

pub mod client;
pub mod cluster;
pub mod error;
pub mod instruction;
pub mod keypair;
pub mod message;
pub mod transaction;
pub mod types;

pub use client::{LedgerConnection, LedgerConnector, RpcConnection, RpcConnector};
pub use cluster::{Cluster, Commitment};
pub use error::{LedgerError, LedgerResult};
pub use instruction::{system_instruction, AccountMeta, Instruction, SYSTEM_PROGRAM_ID};
pub use keypair::Keypair;
pub use message::MessageV0;
pub use transaction::VersionedTransaction;
pub use types::{sol_to_lamports, Hash, Pubkey, Signature, LAMPORTS_PER_SOL};
