//! Ed25519 keypair for the custodial sender account

use crate::error::{LedgerError, LedgerResult};
use crate::types::{Pubkey, Signature};
use ed25519_dalek::{Signer, SigningKey, KEYPAIR_LENGTH, SECRET_KEY_LENGTH};
use std::fmt;

/// Signing keypair. The secret half zeroizes on drop.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Create from a 32-byte secret seed.
    pub fn from_seed(seed: [u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Create from the 64-byte `seed || pubkey` layout used by CLI keypair files.
    ///
    /// Fails if the trailing public key does not match the seed.
    pub fn from_bytes(bytes: &[u8]) -> LedgerResult<Self> {
        let bytes: &[u8; KEYPAIR_LENGTH] = bytes.try_into().map_err(|_| {
            LedgerError::InvalidSecretKey(format!(
                "expected {} bytes, got {}",
                KEYPAIR_LENGTH,
                bytes.len()
            ))
        })?;

        let signing_key = SigningKey::from_keypair_bytes(bytes)
            .map_err(|_| LedgerError::InvalidSecretKey("public key does not match seed".to_string()))?;

        Ok(Self { signing_key })
    }

    /// Parse a JSON array of byte values, e.g. `[12,250,...]`.
    pub fn from_json_secret(secret: &str) -> LedgerResult<Self> {
        let bytes: Vec<u8> = serde_json::from_str(secret.trim())
            .map_err(|e| LedgerError::InvalidSecretKey(format!("not a JSON byte array: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Serialize back to the JSON byte-array form.
    pub fn to_json_secret(&self) -> String {
        let bytes = self.signing_key.to_keypair_bytes();
        serde_json::Value::from(bytes.to_vec()).to_string()
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign_message(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair").field("pubkey", &self.pubkey()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Verifier, VerifyingKey};

    #[test]
    fn test_json_secret_roundtrip() {
        let keypair = Keypair::from_seed([3u8; 32]);
        let json = keypair.to_json_secret();
        assert!(json.starts_with('['));

        let restored = Keypair::from_json_secret(&json).unwrap();
        assert_eq!(restored.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_rejects_malformed_secret() {
        assert!(Keypair::from_json_secret("").is_err());
        assert!(Keypair::from_json_secret("not json").is_err());
        assert!(Keypair::from_json_secret("[1,2,3]").is_err());
        assert!(Keypair::from_json_secret("[256]").is_err());
    }

    #[test]
    fn test_rejects_mismatched_pubkey() {
        let keypair = Keypair::from_seed([3u8; 32]);
        let mut bytes = keypair.signing_key.to_keypair_bytes();
        bytes[40] ^= 0xff;

        let err = Keypair::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidSecretKey(_)));
    }

    #[test]
    fn test_signature_verifies() {
        let keypair = Keypair::from_seed([9u8; 32]);
        let sig = keypair.sign_message(b"transfer");

        let vk = VerifyingKey::from_bytes(keypair.pubkey().as_bytes()).unwrap();
        let sig = ed25519_dalek::Signature::from_bytes(sig.as_bytes());
        assert!(vk.verify(b"transfer", &sig).is_ok());
    }

    #[test]
    fn test_debug_hides_secret() {
        let keypair = Keypair::from_seed([5u8; 32]);
        let dbg = format!("{:?}", keypair);
        assert!(dbg.contains(&keypair.pubkey().to_string()));
        assert!(!dbg.contains("signing_key"));
    }
}
