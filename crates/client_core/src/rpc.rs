use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::CallError;

#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    pub method: String,
    pub params: Value,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: impl Serialize) -> anyhow::Result<Self> {
        let method = method.into();
        let params = serde_json::to_value(params)
            .with_context(|| format!("failed to encode params for rpc method {method}"))?;
        Ok(Self { method, params })
    }

    pub async fn call(self, transport: &dyn RpcTransport) -> Result<Value, CallError> {
        transport.call(self).await
    }
}

#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(&self, request: RpcRequest) -> Result<Value, CallError>;
}

pub struct MissingRpcTransport;

#[async_trait]
impl RpcTransport for MissingRpcTransport {
    async fn call(&self, request: RpcRequest) -> Result<Value, CallError> {
        Err(anyhow!("rpc transport is unavailable for method {}", request.method).into())
    }
}
