//! Faucet service core logic

use super::config::FaucetConfig;
use super::error::{FaucetError, FaucetResult};
use super::validation::{check_address, parse_amount};
use drip_ledger::{
    system_instruction, LedgerConnector, MessageV0, Pubkey, Signature, VersionedTransaction,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a successful transfer.
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub signature: Signature,
    pub recipient: Pubkey,
    pub lamports: u64,
    pub explorer_url: String,
}

/// Faucet service
pub struct FaucetService {
    config: Arc<FaucetConfig>,
    connector: Arc<dyn LedgerConnector>,
}

impl FaucetService {
    pub fn new(config: Arc<FaucetConfig>, connector: Arc<dyn LedgerConnector>) -> Self {
        Self { config, connector }
    }

    pub fn config(&self) -> &FaucetConfig {
        &self.config
    }

    /// Send SOL from the faucet account to `address`.
    ///
    /// `amount` is a decimal SOL string; `None` sends the default amount.
    /// Both inputs are validated before the ledger is contacted. The
    /// transaction is broadcast once and not awaited for confirmation.
    pub async fn transfer(&self, address: &str, amount: Option<&str>) -> FaucetResult<TransferReceipt> {
        // 1. Validate request
        check_address(address)?;
        let lamports = parse_amount(amount)?;

        // 2. Load sender
        let sender = self.config.sender_keypair()?;
        let sender_pubkey = sender.pubkey();

        // 3. Check faucet balance
        let connection = self.connector.connect(self.config.rpc_endpoint()).await?;
        let balance = connection.get_balance(&sender_pubkey).await?;
        if balance < lamports {
            warn!("Faucet balance low: {} lamports, requested {}", balance, lamports);
            return Err(FaucetError::InsufficientFunds);
        }
        debug!("Faucet balance: {} lamports", balance);

        // 4. Build and sign
        let recipient: Pubkey = address.parse()?;
        let ix = system_instruction::transfer(&sender_pubkey, &recipient, lamports);
        let blockhash = connection.get_latest_blockhash().await?;
        let message = MessageV0::compile(&sender_pubkey, &[ix], blockhash)?;
        let transaction = VersionedTransaction::try_new(message, &[&sender])?;

        // 5. Submit
        let signature = connection.send_transaction(&transaction).await?;

        debug!("Submitted transaction {}", signature);

        let explorer_url = self
            .config
            .cluster
            .explorer_tx_url(&self.config.explorer_url, &signature);

        Ok(TransferReceipt {
            signature,
            recipient,
            lamports,
            explorer_url,
        })
    }
}
