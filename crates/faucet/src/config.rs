//! Faucet configuration

use crate::error::{FaucetError, FaucetResult};
use drip_common::utils::config::load_config_with_defaults;
use drip_common::utils::logging::LoggingConfig;
use drip_ledger::{Cluster, Commitment, Keypair};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the sender secret as a JSON byte array.
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Faucet service configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaucetConfig {
    /// Interface to bind
    pub bind_addr: String,

    /// Listening port
    pub port: u16,

    /// Target test cluster
    pub cluster: Cluster,

    /// Overrides the cluster's public RPC endpoint
    pub rpc_url: Option<String>,

    /// Block explorer base URL used in success responses
    pub explorer_url: String,

    /// Commitment for balance/blockhash reads and preflight
    pub commitment: Commitment,

    /// Sender secret key, JSON array of 64 byte values
    pub private_key: Option<String>,

    /// Per-call timeout for RPC requests (seconds)
    pub request_timeout_secs: u64,

    /// Enable CORS
    pub cors_enabled: bool,

    pub logging: LoggingConfig,
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
            cluster: Cluster::Devnet,
            rpc_url: None,
            explorer_url: "https://explorer.solana.com".to_string(),
            commitment: Commitment::Finalized,
            private_key: None,
            request_timeout_secs: 30,
            cors_enabled: true,
            logging: LoggingConfig::default(),
        }
    }
}

// Debug without the secret
impl fmt::Debug for FaucetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaucetConfig")
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("cluster", &self.cluster)
            .field("rpc_url", &self.rpc_url)
            .field("explorer_url", &self.explorer_url)
            .field("commitment", &self.commitment)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("cors_enabled", &self.cors_enabled)
            .field("logging", &self.logging)
            .finish()
    }
}

impl FaucetConfig {
    /// Defaults, then the optional config file, then the environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => load_config_with_defaults(&Self::default(), path)?,
            None => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from environment variables with defaults
    pub fn from_env() -> anyhow::Result<Self> {
        Self::load(None)
    }

    /// Overlay values found by `lookup`. Split from `from_env` so tests can
    /// feed a map instead of mutating the process environment.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT '{}': {}", port, e))?;
        }

        if let Some(key) = lookup(PRIVATE_KEY_ENV) {
            self.private_key = Some(key);
        }

        if let Some(addr) = lookup("FAUCET_BIND_ADDR") {
            self.bind_addr = addr;
        }

        if let Some(cluster) = lookup("FAUCET_CLUSTER") {
            self.cluster = cluster.parse()?;
        }

        if let Some(rpc_url) = lookup("FAUCET_RPC_URL") {
            self.rpc_url = Some(rpc_url);
        }

        if let Some(explorer) = lookup("FAUCET_EXPLORER_URL") {
            self.explorer_url = explorer;
        }

        if let Some(commitment) = lookup("FAUCET_COMMITMENT") {
            self.commitment = commitment.parse().map_err(anyhow::Error::msg)?;
        }

        if let Some(timeout) = lookup("FAUCET_REQUEST_TIMEOUT") {
            self.request_timeout_secs = timeout
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid FAUCET_REQUEST_TIMEOUT '{}': {}", timeout, e))?;
        }

        if let Some(enabled) = lookup("FAUCET_CORS_ENABLED") {
            self.cors_enabled = enabled.to_lowercase() == "true";
        }

        if let Some(level) = lookup("FAUCET_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = lookup("FAUCET_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// RPC endpoint to connect to.
    pub fn rpc_endpoint(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.cluster.default_rpc_url())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse the sender keypair from the configured secret.
    pub fn sender_keypair(&self) -> FaucetResult<Keypair> {
        let secret = self
            .private_key
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| FaucetError::Configuration(format!("{} is not set", PRIVATE_KEY_ENV)))?;

        Keypair::from_json_secret(secret).map_err(|e| FaucetError::Configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = FaucetConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.cluster, Cluster::Devnet);
        assert_eq!(config.rpc_endpoint(), "https://api.devnet.solana.com");
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
        assert!(config.private_key.is_none());
    }

    #[test]
    fn test_env_overlay() {
        let mut config = FaucetConfig::default();
        config
            .apply_env_with(lookup_from(&[
                ("PORT", "8080"),
                ("FAUCET_CLUSTER", "testnet"),
                ("FAUCET_COMMITMENT", "confirmed"),
                ("FAUCET_CORS_ENABLED", "false"),
            ]))
            .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.cluster, Cluster::Testnet);
        assert_eq!(config.commitment, Commitment::Confirmed);
        assert!(!config.cors_enabled);
        assert_eq!(config.rpc_endpoint(), "https://api.testnet.solana.com");
    }

    #[test]
    fn test_env_rejects_mainnet_and_bad_port() {
        let mut config = FaucetConfig::default();
        assert!(config
            .apply_env_with(lookup_from(&[("FAUCET_CLUSTER", "mainnet-beta")]))
            .is_err());
        assert!(config.apply_env_with(lookup_from(&[("PORT", "http")])).is_err());
    }

    #[test]
    fn test_env_request_timeout() {
        let mut config = FaucetConfig::default();
        config
            .apply_env_with(lookup_from(&[("FAUCET_REQUEST_TIMEOUT", "5")]))
            .unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(5));

        let err = config
            .apply_env_with(lookup_from(&[("FAUCET_REQUEST_TIMEOUT", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("FAUCET_REQUEST_TIMEOUT"));
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_rpc_url_override() {
        let mut config = FaucetConfig::default();
        config
            .apply_env_with(lookup_from(&[("FAUCET_RPC_URL", "http://10.0.0.5:8899")]))
            .unwrap();
        assert_eq!(config.rpc_endpoint(), "http://10.0.0.5:8899");
    }

    #[test]
    fn test_sender_keypair() {
        let keypair = Keypair::from_seed([11u8; 32]);
        let config = FaucetConfig {
            private_key: Some(keypair.to_json_secret()),
            ..Default::default()
        };
        assert_eq!(config.sender_keypair().unwrap().pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_missing_or_malformed_secret() {
        let missing = FaucetConfig::default();
        assert!(matches!(missing.sender_keypair(), Err(FaucetError::Configuration(_))));

        let blank = FaucetConfig {
            private_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(blank.sender_keypair(), Err(FaucetError::Configuration(_))));

        let garbage = FaucetConfig {
            private_key: Some("[1, 2, 3]".to_string()),
            ..Default::default()
        };
        assert!(matches!(garbage.sender_keypair(), Err(FaucetError::Configuration(_))));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = FaucetConfig {
            private_key: Some("[1,2,3,4]".to_string()),
            ..Default::default()
        };
        let dbg = format!("{:?}", config);
        assert!(dbg.contains("<redacted>"));
        assert!(!dbg.contains("[1,2,3,4]"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "port = 4000\ncluster = \"testnet\"\n\n[logging]\nlevel = \"debug\"").unwrap();

        let config: FaucetConfig = load_config_with_defaults(&FaucetConfig::default(), file.path()).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.cluster, Cluster::Testnet);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.explorer_url, "https://explorer.solana.com");
    }
}
