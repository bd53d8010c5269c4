//! Reqwest-backed JSON-RPC client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use chainwatch_types::{BlockHeight, Transaction};

use crate::{GatewayError, LedgerGateway};

/// Default timeout for a single JSON-RPC round-trip.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// JSON-RPC 2.0 response envelope.
///
/// A well-formed response carries either `result` or `error`; both are kept
/// optional so a malformed response surfaces as a decode problem on the
/// field we actually need rather than a parse failure.
#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

/// JSON-RPC `error` member.
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Block body as returned by `eth_getBlockByNumber` with full transaction
/// objects requested.
#[derive(Debug, Default, Deserialize)]
struct BlockBody {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

/// HTTP JSON-RPC client for an Ethereum-style node.
///
/// Holds a reusable [`reqwest::Client`] (connection pool) and the node
/// endpoint URL. One instance is shared by the ingestion engine and the
/// subscribe-time catch-up path.
pub struct JsonRpcGateway {
    /// Node endpoint URL.
    endpoint: String,
    /// Reusable HTTP client.
    client: reqwest::Client,
}

impl JsonRpcGateway {
    /// Create a gateway for `endpoint` with default timeouts.
    pub fn new(endpoint: &str) -> Self {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a gateway with a custom per-request timeout.
    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// The configured node endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one JSON-RPC call and decode its envelope.
    ///
    /// Returns `Ok(None)` when the node answers with `result: null` and no
    /// error member; callers decide what a null result means for them.
    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>, GatewayError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    GatewayError::Unreachable(e.to_string())
                } else {
                    GatewayError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status().as_u16()));
        }

        let envelope: RpcEnvelope<T> = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        if let Some(err) = envelope.error {
            return Err(GatewayError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(envelope.result)
    }
}

#[async_trait]
impl LedgerGateway for JsonRpcGateway {
    async fn current_height(&self) -> Result<BlockHeight, GatewayError> {
        let quantity: Option<String> =
            self.call("eth_blockNumber", serde_json::json!([])).await?;
        let quantity = quantity
            .ok_or_else(|| GatewayError::Decode("eth_blockNumber returned null".into()))?;
        parse_quantity(&quantity)
    }

    async fn block_transactions(
        &self,
        height: BlockHeight,
    ) -> Result<Vec<Transaction>, GatewayError> {
        let params = serde_json::json!([format!("{height:#x}"), true]);
        let block: Option<BlockBody> = self.call("eth_getBlockByNumber", params).await?;
        // An unknown block decodes as `result: null`; report it as empty
        // rather than failing; that is the node's own "nothing there".
        Ok(block.unwrap_or_default().transactions)
    }
}

/// Parse a `0x`-prefixed hex quantity into a block height.
pub fn parse_quantity(quantity: &str) -> Result<BlockHeight, GatewayError> {
    let digits = quantity
        .strip_prefix("0x")
        .or_else(|| quantity.strip_prefix("0X"))
        .ok_or_else(|| GatewayError::InvalidQuantity(quantity.to_string()))?;
    BlockHeight::from_str_radix(digits, 16)
        .map_err(|_| GatewayError::InvalidQuantity(quantity.to_string()))
}
