use crate::error::{LedgerError, LedgerResult};
use crate::keypair::Keypair;
use crate::message::{encode_compact_u16, MessageV0};
use crate::types::Signature;
use tracing::debug;

/// Maximum serialized transaction size accepted by the cluster.
pub const PACKET_DATA_SIZE: usize = 1232;

/// Signed v0 transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedTransaction {
    pub signatures: Vec<Signature>,
    pub message: MessageV0,
}

impl VersionedTransaction {
    /// Sign `message` with `signers`, which must cover exactly the message's
    /// required signer keys.
    pub fn try_new(message: MessageV0, signers: &[&Keypair]) -> LedgerResult<Self> {
        let required = message.signer_keys();
        if signers.len() != required.len() {
            return Err(LedgerError::Signing(format!(
                "expected {} signers, got {}",
                required.len(),
                signers.len()
            )));
        }

        let message_bytes = message.serialize()?;

        let signatures = required
            .iter()
            .map(|key| {
                signers
                    .iter()
                    .find(|kp| kp.pubkey() == *key)
                    .map(|kp| kp.sign_message(&message_bytes))
                    .ok_or_else(|| LedgerError::Signing(format!("missing signer {}", key)))
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        debug!("Signed transaction with {} signature(s)", signatures.len());
        Ok(Self { signatures, message })
    }

    /// Wire encoding: compact signature count, signatures, then the message.
    pub fn serialize(&self) -> LedgerResult<Vec<u8>> {
        let message_bytes = self.message.serialize()?;

        let mut out = Vec::with_capacity(1 + self.signatures.len() * 64 + message_bytes.len());
        encode_compact_u16(self.signatures.len() as u16, &mut out);
        for sig in &self.signatures {
            out.extend_from_slice(sig.as_bytes());
        }
        out.extend_from_slice(&message_bytes);

        if out.len() > PACKET_DATA_SIZE {
            return Err(LedgerError::TransactionTooLarge(out.len()));
        }
        Ok(out)
    }
}
