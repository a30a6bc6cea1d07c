//! JSON-RPC contract gateway.
//!
//! Contract calls are wrapped in a JSON-RPC 2.0 envelope and posted to a
//! single endpoint. Reads go out as `eth_call`, writes as
//! `eth_sendTransaction`; the contract method and its arguments travel as
//! a JSON string in the call's `data` field.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, field, info, instrument, warn, Span};

use archive_core::{logging, methods, ContractGateway, Error, Result};

use crate::config::GatewayConfig;

/// Longest slice of a response body quoted in error messages.
const MAX_ERROR_BODY: usize = 200;

/// Which side of the contract a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Read,
    Write,
}

impl CallKind {
    fn rpc_method(self) -> &'static str {
        match self {
            CallKind::Read => "eth_call",
            CallKind::Write => "eth_sendTransaction",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallKind::Read => write!(f, "query"),
            CallKind::Write => write!(f, "mutate"),
        }
    }
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: [CallParams<'a>; 1],
    id: u64,
}

#[derive(Serialize)]
struct CallParams<'a> {
    to: &'a str,
    data: String,
}

#[derive(Serialize)]
struct ContractCall<'a> {
    method: &'a str,
    args: &'a [String],
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<JsonValue>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

/// HTTP gateway to the archive contract.
pub struct JsonRpcGateway {
    client: Client,
    endpoint: String,
    contract_address: String,
    next_id: AtomicU64,
}

impl JsonRpcGateway {
    /// Create a gateway from validated configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        info!(
            endpoint = %config.endpoint(),
            contract = %config.contract_address,
            timeout_secs = config.timeout_secs,
            "Initializing contract gateway"
        );

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            contract_address: config.contract_address.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Create from environment variables (and `ARCHIVE_CONFIG`, if set).
    pub fn from_env() -> Result<Self> {
        let config = GatewayConfig::load()?;
        Self::new(&config)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check that the contract answers a cheap read.
    ///
    /// Transport failures report `false`; remote or data errors propagate.
    pub async fn health_check(&self) -> Result<bool> {
        match self.query(methods::COUNT_IMAGES, &[]).await {
            Ok(_) => Ok(true),
            Err(Error::Request(e)) => {
                warn!(error = %e, "Contract gateway unreachable");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn envelope<'a>(
        &'a self,
        kind: CallKind,
        method: &'a str,
        args: &'a [String],
    ) -> Result<RpcRequest<'a>> {
        let data = serde_json::to_string(&ContractCall { method, args })?;
        Ok(RpcRequest {
            jsonrpc: "2.0",
            method: kind.rpc_method(),
            params: [CallParams {
                to: &self.contract_address,
                data,
            }],
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        })
    }

    #[instrument(
        skip(self, args),
        fields(
            subsystem = "gateway",
            op = %kind,
            arg_count = args.len(),
            duration_ms = field::Empty,
            success = field::Empty,
        )
    )]
    async fn call(&self, kind: CallKind, method: &str, args: &[String]) -> Result<JsonValue> {
        let started = Instant::now();
        let outcome = self.send(kind, method, args).await;

        let span = Span::current();
        span.record(logging::DURATION_MS, started.elapsed().as_millis() as u64);
        span.record(logging::SUCCESS, outcome.is_ok());

        match &outcome {
            Ok(_) => debug!("Contract call completed"),
            Err(e) => warn!(error = %e, "Contract call failed"),
        }
        outcome
    }

    async fn send(&self, kind: CallKind, method: &str, args: &[String]) -> Result<JsonValue> {
        let request = self.envelope(kind, method, args)?;

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Request(format!("{} {}: {}", kind, method, e)))?;

        let status = response.status();
        let body = response.text().await?;

        let envelope: RpcResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(Error::Serialization(format!(
                    "invalid RPC response for {}: {}",
                    method, e
                )));
            }
            Err(_) => {
                return Err(Error::Request(format!(
                    "HTTP {} from contract RPC: {}",
                    status,
                    truncate(&body)
                )));
            }
        };

        if let Some(err) = envelope.error {
            let message = match err.code {
                Some(code) if err.message.is_empty() => format!("RPC error {}", code),
                _ => err.message,
            };
            return Err(Error::Remote(message));
        }

        if !status.is_success() {
            return Err(Error::Request(format!(
                "HTTP {} from contract RPC: {}",
                status,
                truncate(&body)
            )));
        }

        let result = envelope.result.unwrap_or(JsonValue::Null);
        Ok(match kind {
            CallKind::Read => unwrap_string_result(result),
            CallKind::Write => result,
        })
    }
}

#[async_trait]
impl ContractGateway for JsonRpcGateway {
    async fn query(&self, method: &str, args: &[String]) -> Result<JsonValue> {
        self.call(CallKind::Read, method, args).await
    }

    async fn mutate(&self, method: &str, args: &[String]) -> Result<JsonValue> {
        self.call(CallKind::Write, method, args).await
    }
}

/// Read results often arrive as JSON text inside a string; parse it when
/// possible and keep the raw string otherwise.
fn unwrap_string_result(result: JsonValue) -> JsonValue {
    match result {
        JsonValue::String(text) => serde_json::from_str(&text).unwrap_or(JsonValue::String(text)),
        other => other,
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gateway() -> JsonRpcGateway {
        JsonRpcGateway::new(&GatewayConfig {
            rpc_url: "http://localhost:4000".to_string(),
            contract_address: "0xcontract".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = JsonRpcGateway::new(&GatewayConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_read_envelope_shape() {
        let gw = gateway();
        let args = vec!["rare".to_string(), "7".to_string(), String::new()];
        let request = gw.envelope(CallKind::Read, "search", &args).unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "eth_call");
        assert_eq!(value["params"][0]["to"], "0xcontract");

        let data: JsonValue =
            serde_json::from_str(value["params"][0]["data"].as_str().unwrap()).unwrap();
        assert_eq!(data, json!({"method": "search", "args": ["rare", "7", ""]}));
    }

    #[test]
    fn test_write_envelope_uses_send_transaction() {
        let gw = gateway();
        let request = gw.envelope(CallKind::Write, "add_image_and_rate", &[]).unwrap();
        assert_eq!(request.method, "eth_sendTransaction");
    }

    #[test]
    fn test_request_ids_increase() {
        let gw = gateway();
        let first = gw.envelope(CallKind::Read, "count_images", &[]).unwrap().id;
        let second = gw.envelope(CallKind::Read, "count_images", &[]).unwrap().id;
        assert!(second > first);
    }

    #[test]
    fn test_unwrap_string_result() {
        assert_eq!(unwrap_string_result(json!("[1,2]")), json!([1, 2]));
        assert_eq!(unwrap_string_result(json!("42")), json!(42));
        assert_eq!(unwrap_string_result(json!("plain text")), json!("plain text"));
        assert_eq!(unwrap_string_result(json!({"a": 1})), json!({"a": 1}));
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "x".repeat(500);
        assert_eq!(truncate(&body).len(), MAX_ERROR_BODY);
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn test_call_kind_display() {
        assert_eq!(CallKind::Read.to_string(), "query");
        assert_eq!(CallKind::Write.to_string(), "mutate");
    }
}
