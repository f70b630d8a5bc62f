//! Shared plumbing for the faucet workspace: logging and config-file loading.

pub mod utils;
