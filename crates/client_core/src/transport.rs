use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::protocol::{RpcOutcome, RpcRequestEnvelope, RpcResponseEnvelope};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::CallError,
    rpc::{RpcRequest, RpcTransport},
};

pub const DEFAULT_RPC_PATH: &str = "/jsonrpc";

/// Resolves `rpc_path` against `server_url`. An absolute `rpc_path` replaces
/// any path already present on the server url.
pub fn endpoint_url(server_url: &str, rpc_path: &str) -> anyhow::Result<Url> {
    let base = Url::parse(server_url.trim())
        .with_context(|| format!("invalid server url '{server_url}'"))?;
    if base.cannot_be_a_base() {
        return Err(anyhow!("server url '{server_url}' cannot carry an rpc path"));
    }
    let rpc_path = if rpc_path.trim().is_empty() {
        DEFAULT_RPC_PATH
    } else {
        rpc_path.trim()
    };
    base.join(rpc_path)
        .with_context(|| format!("invalid rpc path '{rpc_path}' for server url '{server_url}'"))
}

pub struct HttpRpcTransport {
    http: Client,
    endpoint: Url,
    authorization: RwLock<Option<String>>,
}

impl HttpRpcTransport {
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build rpc http client")?;
        Ok(Self::with_client(http, endpoint))
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self {
            http,
            endpoint,
            authorization: RwLock::new(None),
        }
    }

    pub async fn set_authorization(&self, authorization: Option<String>) {
        *self.authorization.write().await = authorization;
    }

    pub async fn authorization(&self) -> Option<String> {
        self.authorization.read().await.clone()
    }
}

#[async_trait]
impl RpcTransport for HttpRpcTransport {
    async fn call(&self, request: RpcRequest) -> Result<Value, CallError> {
        let authorization = self.authorization.read().await.clone();
        let envelope = RpcRequestEnvelope::new(request.method, request.params)
            .with_authorization(authorization);
        debug!(method = %envelope.method, id = %envelope.id, "sending rpc request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&envelope)
            .send()
            .await
            .with_context(|| format!("failed to reach rpc endpoint {}", self.endpoint))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .context("failed to read rpc response body")?;

        // Some platforms answer auth failures with a non-2xx status and a
        // regular JSON-RPC error body, so the body is decoded first.
        let reply: RpcResponseEnvelope = match serde_json::from_slice(&body) {
            Ok(reply) => reply,
            Err(_) if !status.is_success() => {
                return Err(anyhow!(
                    "rpc endpoint {} returned HTTP {status} for method {}",
                    self.endpoint,
                    envelope.method
                )
                .into());
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("malformed rpc response for method {}", envelope.method))
                    .into());
            }
        };

        if !reply.answers(&envelope.id) {
            return Err(anyhow!(
                "rpc response id {:?} does not match request id {}",
                reply.id,
                envelope.id
            )
            .into());
        }

        match reply.into_outcome() {
            RpcOutcome::Result(result) => Ok(result),
            RpcOutcome::Error(error) => {
                warn!(
                    method = %envelope.method,
                    code = error.code,
                    message = %error.message,
                    "rpc call returned an error"
                );
                Err(CallError::Rpc(error))
            }
            RpcOutcome::Malformed => Err(anyhow!(
                "rpc response for method {} carries neither result nor error",
                envelope.method
            )
            .into()),
        }
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
