//! JSON-RPC transport over `reqwest`.
//!
//! ## Resilience
//!
//! * View queries that fail at the HTTP level (connection reset, timeout, 429,
//!   5xx) are retried with exponential back-off, at most `query_retries` times.
//! * Contract-level query errors are returned immediately; they are deterministic.
//! * Transactions are broadcast exactly once. A timeout from the node, or any
//!   HTTP failure while waiting on it, is reported as a
//!   [`ClientError::RemoteExecution`] that says the outcome is unknown.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::errors::{ClientError, Result};
use crate::outcome::ExecutionOutcome;
use crate::transport::{SignedTransaction, Transport};
use crate::types::AccountId;

const INITIAL_BACKOFF_MS: u64 = 250;
const MAX_BACKOFF_MS: u64 = 4_000;
const REQUEST_ID: &str = "grant_client";
const UNKNOWN_OUTCOME: &str = "the transaction may still execute; check state before retrying";

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cause: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RpcError {
    /// Node's diagnostic, preferring the detailed `data` string.
    pub fn describe(&self) -> String {
        match &self.data {
            Some(Value::String(data)) => data.clone(),
            Some(other) => format!("{}: {}", self.message, other),
            None => match &self.cause {
                Some(cause) => format!("{}: {}", self.message, cause),
                None => self.message.clone(),
            },
        }
    }

    pub fn cause_name(&self) -> Option<&str> {
        self.cause.as_ref()?.get("name")?.as_str()
    }

    pub fn is_timeout(&self) -> bool {
        self.cause_name() == Some("TIMEOUT_ERROR")
    }
}

/// `result` of a `call_function` query. Older nodes report contract failures in
/// `error` instead of a JSON-RPC error.
#[derive(Debug, Deserialize)]
pub struct CallFunctionResult {
    #[serde(default)]
    pub result: Option<Vec<u8>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub block_height: Option<u64>,
}

// ─────────────────────────────────────────────────────────
// Transport
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct JsonRpcTransport {
    client: Client,
    rpc_url: String,
    query_retries: u32,
}

impl JsonRpcTransport {
    pub fn new(client: Client, rpc_url: impl Into<String>, query_retries: u32) -> Self {
        Self {
            client,
            rpc_url: rpc_url.into(),
            query_retries,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::new(client, config.rpc_url.clone(), config.query_retries))
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Post one request, retrying HTTP-level failures up to `retries` times.
    async fn post<T: DeserializeOwned>(
        &self,
        body: &Value,
        retries: u32,
    ) -> Result<RpcResponse<T>> {
        let mut backoff = INITIAL_BACKOFF_MS;
        let mut attempt = 0;

        loop {
            let response = self.client.post(&self.rpc_url).json(body).send().await;

            let retry_reason = match response {
                Err(e) if attempt < retries && is_transient(&e) => e.to_string(),
                Err(e) => return Err(e.into()),
                Ok(resp) => {
                    let status = resp.status();
                    if attempt < retries
                        && (status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error())
                    {
                        format!("HTTP {status}")
                    } else {
                        return Ok(resp.json().await?);
                    }
                }
            };

            attempt += 1;
            warn!(
                "RPC request failed (attempt {attempt}, retrying in {backoff}ms): {retry_reason}"
            );
            tokio::time::sleep(Duration::from_millis(backoff)).await;
            backoff = (backoff * 2).min(MAX_BACKOFF_MS);
        }
    }
}

#[async_trait]
impl Transport for JsonRpcTransport {
    async fn query(&self, contract_id: &AccountId, method: &str, args: &[u8]) -> Result<Vec<u8>> {
        let body = build_query_request(contract_id, method, args);
        let response: RpcResponse<CallFunctionResult> =
            self.post(&body, self.query_retries).await?;
        let bytes = parse_query_response(response)?;
        debug!("Query {method} on {contract_id} returned {} bytes", bytes.len());
        Ok(bytes)
    }

    async fn submit(&self, transaction: SignedTransaction) -> Result<ExecutionOutcome> {
        let body = build_broadcast_request(&transaction);
        // Never retried: a resubmitted change call could apply twice.
        let response: RpcResponse<ExecutionOutcome> = match self.post(&body, 0).await {
            // The node may have accepted the transaction before the connection dropped.
            Err(ClientError::Http(e)) => {
                warn!("broadcast_tx_commit failed with unknown outcome: {e}");
                return Err(ClientError::RemoteExecution(format!("{e} ({UNKNOWN_OUTCOME})")));
            }
            other => other?,
        };
        parse_broadcast_response(response)
    }
}

// ─────────────────────────────────────────────────────────
// Request building and response parsing
// ─────────────────────────────────────────────────────────

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_request()
}

fn build_query_request(contract_id: &AccountId, method: &str, args: &[u8]) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": REQUEST_ID,
        "method": "query",
        "params": {
            "request_type": "call_function",
            "finality": "final",
            "account_id": contract_id,
            "method_name": method,
            "args_base64": STANDARD.encode(args),
        }
    })
}

fn build_broadcast_request(transaction: &SignedTransaction) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": REQUEST_ID,
        "method": "broadcast_tx_commit",
        "params": [transaction.encoded],
    })
}

fn parse_query_response(response: RpcResponse<CallFunctionResult>) -> Result<Vec<u8>> {
    if let Some(err) = response.error {
        return Err(ClientError::RemoteQuery(err.describe()));
    }
    let result = response
        .result
        .ok_or_else(|| ClientError::RemoteQuery("Empty result from query".to_string()))?;
    if let Some(err) = result.error {
        return Err(ClientError::RemoteQuery(err));
    }
    result
        .result
        .ok_or_else(|| ClientError::RemoteQuery("Query result carries no value".to_string()))
}

fn parse_broadcast_response(response: RpcResponse<ExecutionOutcome>) -> Result<ExecutionOutcome> {
    if let Some(err) = response.error {
        let message = err.describe();
        return Err(ClientError::RemoteExecution(if err.is_timeout() {
            format!("{message} ({UNKNOWN_OUTCOME})")
        } else {
            message
        }));
    }
    response.result.ok_or_else(|| {
        ClientError::RemoteExecution("Empty result from broadcast_tx_commit".to_string())
    })
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
