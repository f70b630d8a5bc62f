//! Ledger client seam and its JSON-RPC implementation

use crate::cluster::Commitment;
use crate::error::{LedgerError, LedgerResult};
use crate::transaction::VersionedTransaction;
use crate::types::{Hash, Pubkey, Signature};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Opens connections to a cluster endpoint.
#[async_trait]
pub trait LedgerConnector: Send + Sync {
    async fn connect(&self, rpc_url: &str) -> LedgerResult<Box<dyn LedgerConnection>>;
}

/// The cluster operations a transfer needs.
#[async_trait]
pub trait LedgerConnection: Send + Sync {
    /// Balance in lamports.
    async fn get_balance(&self, pubkey: &Pubkey) -> LedgerResult<u64>;

    async fn get_latest_blockhash(&self) -> LedgerResult<Hash>;

    /// Broadcast without waiting for confirmation.
    async fn send_transaction(&self, transaction: &VersionedTransaction) -> LedgerResult<Signature>;
}

/// Connector backed by HTTP JSON-RPC.
#[derive(Clone)]
pub struct RpcConnector {
    client: reqwest::Client,
    commitment: Commitment,
}

impl RpcConnector {
    pub fn new(commitment: Commitment, timeout: Duration) -> LedgerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        Ok(Self { client, commitment })
    }
}

#[async_trait]
impl LedgerConnector for RpcConnector {
    async fn connect(&self, rpc_url: &str) -> LedgerResult<Box<dyn LedgerConnection>> {
        let url = reqwest::Url::parse(rpc_url)
            .map_err(|e| LedgerError::Transport(format!("invalid RPC url {}: {}", rpc_url, e)))?;

        Ok(Box::new(RpcConnection {
            url,
            client: self.client.clone(),
            commitment: self.commitment,
        }))
    }
}

/// One cluster endpoint. Holds no socket; the pooled HTTP client is shared.
pub struct RpcConnection {
    url: reqwest::Url,
    client: reqwest::Client,
    commitment: Commitment,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockhashValue {
    blockhash: String,
    #[allow(dead_code)]
    last_valid_block_height: u64,
}

fn parse_result<T: serde::de::DeserializeOwned>(method: &str, value: Value) -> LedgerResult<T> {
    serde_json::from_value(value)
        .map_err(|e| LedgerError::InvalidResponse(format!("{}: {}", method, e)))
}

impl RpcConnection {
    async fn call(&self, method: &str, params: Value) -> LedgerResult<Value> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        debug!("RPC {} -> {}", method, self.url);

        let response = self
            .client
            .post(self.url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(format!("{}: {}", method, e)))?;

        if let Some(error) = body.error {
            return Err(LedgerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        body.result
            .ok_or_else(|| LedgerError::InvalidResponse(format!("{}: missing result", method)))
    }
}

#[async_trait]
impl LedgerConnection for RpcConnection {
    async fn get_balance(&self, pubkey: &Pubkey) -> LedgerResult<u64> {
        let result = self
            .call(
                "getBalance",
                json!([pubkey.to_string(), { "commitment": self.commitment.as_str() }]),
            )
            .await?;
        let balance: WithContext<u64> = parse_result("getBalance", result)?;
        Ok(balance.value)
    }

    async fn get_latest_blockhash(&self) -> LedgerResult<Hash> {
        let result = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": self.commitment.as_str() }]),
            )
            .await?;
        let latest: WithContext<BlockhashValue> = parse_result("getLatestBlockhash", result)?;
        latest.value.blockhash.parse()
    }

    async fn send_transaction(&self, transaction: &VersionedTransaction) -> LedgerResult<Signature> {
        let encoded = STANDARD.encode(transaction.serialize()?);
        let result = self
            .call(
                "sendTransaction",
                json!([
                    encoded,
                    {
                        "encoding": "base64",
                        "preflightCommitment": self.commitment.as_str(),
                    }
                ]),
            )
            .await?;
        let signature: String = parse_result("sendTransaction", result)?;
        signature.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::system_instruction;
    use crate::keypair::Keypair;
    use crate::message::MessageV0;
    use axum::{routing::post, Json, Router};
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<Value>>>;

    /// Serve a JSON-RPC stub on an ephemeral port, replying with `reply(request)`.
    async fn spawn_stub(reply: fn(&Value) -> Value) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let recorded = seen.clone();

        let app = Router::new().route(
            "/",
            post(move |Json(request): Json<Value>| {
                let recorded = recorded.clone();
                async move {
                    let response = reply(&request);
                    recorded.lock().unwrap().push(request);
                    Json(response)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/", addr), seen)
    }

    async fn connect(url: &str) -> Box<dyn LedgerConnection> {
        RpcConnector::new(Commitment::Confirmed, Duration::from_secs(5))
            .unwrap()
            .connect(url)
            .await
            .unwrap()
    }

    fn blockhash_b58() -> String {
        Hash([8u8; 32]).to_string()
    }

    fn signature_b58() -> String {
        Signature([6u8; 64]).to_string()
    }

    fn node_reply(request: &Value) -> Value {
        let result = match request["method"].as_str().unwrap_or_default() {
            "getBalance" => json!({ "context": { "slot": 1 }, "value": 2_000_000_000u64 }),
            "getLatestBlockhash" => json!({
                "context": { "slot": 1 },
                "value": { "blockhash": blockhash_b58(), "lastValidBlockHeight": 300 }
            }),
            "sendTransaction" => json!(signature_b58()),
            _ => Value::Null,
        };
        json!({ "jsonrpc": "2.0", "id": request["id"], "result": result })
    }

    fn error_reply(request: &Value) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": { "code": -32002, "message": "Transaction simulation failed" }
        })
    }

    #[tokio::test]
    async fn test_get_balance() {
        let (url, seen) = spawn_stub(node_reply).await;
        let conn = connect(&url).await;

        let owner = Pubkey::new([1u8; 32]);
        assert_eq!(conn.get_balance(&owner).await.unwrap(), 2_000_000_000);

        let requests = seen.lock().unwrap();
        assert_eq!(requests[0]["method"], "getBalance");
        assert_eq!(requests[0]["params"][0], owner.to_string());
        assert_eq!(requests[0]["params"][1]["commitment"], "confirmed");
    }

    #[tokio::test]
    async fn test_get_latest_blockhash() {
        let (url, _) = spawn_stub(node_reply).await;
        let conn = connect(&url).await;

        assert_eq!(conn.get_latest_blockhash().await.unwrap(), Hash([8u8; 32]));
    }

    #[tokio::test]
    async fn test_send_transaction_posts_base64() {
        let (url, seen) = spawn_stub(node_reply).await;
        let conn = connect(&url).await;

        let payer = Keypair::from_seed([1u8; 32]);
        let ix = system_instruction::transfer(&payer.pubkey(), &Pubkey::new([2u8; 32]), 10);
        let message = MessageV0::compile(&payer.pubkey(), &[ix], Hash([8u8; 32])).unwrap();
        let tx = VersionedTransaction::try_new(message, &[&payer]).unwrap();

        let sig = conn.send_transaction(&tx).await.unwrap();
        assert_eq!(sig, Signature([6u8; 64]));

        let requests = seen.lock().unwrap();
        let params = &requests[0]["params"];
        assert_eq!(params[1]["encoding"], "base64");
        let wire = STANDARD.decode(params[0].as_str().unwrap()).unwrap();
        assert_eq!(wire, tx.serialize().unwrap());
    }

    #[tokio::test]
    async fn test_rpc_error_is_surfaced() {
        let (url, _) = spawn_stub(error_reply).await;
        let conn = connect(&url).await;

        let err = conn.get_balance(&Pubkey::default()).await.unwrap_err();
        match err {
            LedgerError::Rpc { code, message } => {
                assert_eq!(code, -32002);
                assert!(message.contains("simulation failed"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let conn = connect("http://127.0.0.1:9/").await;
        let err = conn.get_latest_blockhash().await.unwrap_err();
        assert!(matches!(err, LedgerError::Transport(_)));
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_url() {
        let connector = RpcConnector::new(Commitment::Finalized, Duration::from_secs(1)).unwrap();
        assert!(connector.connect("not a url").await.is_err());
    }
}
