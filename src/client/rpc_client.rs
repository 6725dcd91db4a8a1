// JSON-RPC client for a toncenter-compatible HTTP endpoint
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::LedgerLookup;
use crate::config::NetworkConfig;
use crate::error::{CoreError, Result};

pub struct RpcClient {
    url: String,
    api_key: Option<String>,
    client: Client,
    request_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: String, api_key: Option<String>) -> Self {
        Self {
            url,
            api_key,
            client: Client::new(),
            request_id: AtomicU64::new(1),
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(config.endpoint.clone(), config.api_key.clone())
    }

    async fn send_request(&self, method: &str, params: Value) -> std::result::Result<Value, String> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("X-API-Key", key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| format!("RPC request failed: {}", e))?;

        let json: Value = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        parse_response(json)
    }
}

/// Unwrap a toncenter reply: `{ok, result}` or a JSON-RPC `error` object.
fn parse_response(json: Value) -> std::result::Result<Value, String> {
    if let Some(error) = json.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| error.as_str())
            .unwrap_or("Unknown error");
        return Err(message.to_string());
    }
    if json.get("ok").and_then(Value::as_bool) == Some(false) {
        return Err("Request rejected by ledger".to_string());
    }
    json.get("result")
        .cloned()
        .ok_or_else(|| "No 'result' field in response".to_string())
}

fn parse_balance(result: &Value) -> std::result::Result<u128, String> {
    match result {
        Value::String(s) => s
            .parse::<u128>()
            .map_err(|_| format!("Invalid balance: {}", s)),
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| format!("Invalid balance: {}", n)),
        other => Err(format!("Invalid balance: {}", other)),
    }
}

#[async_trait]
impl LedgerLookup for RpcClient {
    async fn get_balance(&self, address: &str) -> Result<u128> {
        let to_ledger_error = |reason: String| CoreError::Ledger {
            address: address.to_string(),
            reason,
        };

        let result = self
            .send_request("getAddressBalance", json!({ "address": address }))
            .await
            .map_err(to_ledger_error)?;
        let balance = parse_balance(&result).map_err(to_ledger_error)?;

        debug!("Balance of {} is {} nanotons", address, balance);
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ok_response() {
        let json = json!({ "ok": true, "result": "1500000000", "id": 1, "jsonrpc": "2.0" });
        let result = parse_response(json).unwrap();
        assert_eq!(parse_balance(&result).unwrap(), 1_500_000_000);
    }

    #[test]
    fn test_parse_error_responses() {
        let rate_limited = json!({ "ok": false, "error": "Ratelimit exceed", "code": 429 });
        assert_eq!(parse_response(rate_limited).unwrap_err(), "Ratelimit exceed");

        let rpc_error = json!({ "jsonrpc": "2.0", "error": { "code": -32601, "message": "Method not found" } });
        assert_eq!(parse_response(rpc_error).unwrap_err(), "Method not found");

        assert!(parse_response(json!({ "ok": false })).is_err());
    }

    #[test]
    fn test_parse_balance_variants() {
        assert_eq!(parse_balance(&json!(42)).unwrap(), 42);
        assert!(parse_balance(&json!("-1")).is_err());
        assert!(parse_balance(&json!(null)).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_ledger_error() {
        let client = RpcClient::new("http://127.0.0.1:9/jsonRPC".to_string(), None);
        let err = client.get_balance("EQabc").await.unwrap_err();
        assert!(matches!(err, CoreError::Ledger { .. }));
    }
}
