// RPC envelope types shared by the page, the bridge and the background
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ type, message }` as posted on the page bus and over the port.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: RpcMessage,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorBody>,
    pub jsonrpc: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcErrorBody {
    pub message: String,
}

impl Envelope {
    pub fn request(kind: &str, id: Value, method: &str, params: Option<Value>) -> Self {
        Self {
            kind: kind.to_string(),
            message: RpcMessage {
                id: Some(id),
                method: Some(method.to_string()),
                params,
                result: None,
                error: None,
                jsonrpc: true,
            },
        }
    }

    pub fn result(kind: &str, id: Option<Value>, method: Option<String>, result: Value) -> Self {
        Self {
            kind: kind.to_string(),
            message: RpcMessage {
                id,
                method,
                params: None,
                result: Some(result),
                error: None,
                jsonrpc: true,
            },
        }
    }

    /// Error reply for a raw request payload; keeps its `id` and `method`.
    pub fn error_for(kind: &str, request: &Value, message: &str) -> Self {
        let inner = request.get("message");
        Self {
            kind: kind.to_string(),
            message: RpcMessage {
                id: inner.and_then(|m| m.get("id")).cloned(),
                method: inner
                    .and_then(|m| m.get("method"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                params: None,
                result: None,
                error: Some(RpcErrorBody {
                    message: message.to_string(),
                }),
                jsonrpc: true,
            },
        }
    }

    pub fn to_value(&self) -> Value {
        // only string keys and JSON values inside, serialization cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// The `type` field of a raw bus message, if it has one.
pub fn kind_of(data: &Value) -> Option<&str> {
    data.get("type").and_then(Value::as_str)
}
