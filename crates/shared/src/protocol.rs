use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::RpcError;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequestEnvelope {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
}

impl RpcRequestEnvelope {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: Uuid::new_v4().to_string(),
            authorization: None,
        }
    }

    pub fn with_authorization(mut self, authorization: Option<String>) -> Self {
        self.authorization = authorization;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponseEnvelope {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    #[serde(default)]
    pub id: Option<Value>,
}

// `"result": null` is a valid answer and must not read as a missing field.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq)]
pub enum RpcOutcome {
    Result(Value),
    Error(RpcError),
    Malformed,
}

impl RpcResponseEnvelope {
    pub fn success(id: impl Into<String>, result: Value) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            result: Some(result),
            error: None,
            id: Some(Value::String(id.into())),
        }
    }

    /// Whether the response answers the request with `request_id`. Servers
    /// may answer parse errors with a null id, which is accepted.
    pub fn answers(&self, request_id: &str) -> bool {
        match &self.id {
            None | Some(Value::Null) => true,
            Some(Value::String(id)) => id == request_id,
            Some(_) => false,
        }
    }

    pub fn into_outcome(self) -> RpcOutcome {
        match (self.result, self.error) {
            (_, Some(error)) => RpcOutcome::Error(error),
            (Some(result), None) => RpcOutcome::Result(result),
            (None, None) => RpcOutcome::Malformed,
        }
    }
}
