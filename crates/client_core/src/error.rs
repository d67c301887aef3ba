use shared::error::RpcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Rpc(RpcError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CallError {
    pub fn is_rpc(&self) -> bool {
        matches!(self, CallError::Rpc(_))
    }
}

impl From<RpcError> for CallError {
    fn from(value: RpcError) -> Self {
        CallError::Rpc(value)
    }
}

#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// Anything other than an RPC error. Nothing was dispatched.
    #[error("authorization request failed: {0:#}")]
    Unhandled(#[from] anyhow::Error),
    #[error("authorization request was cancelled before it settled")]
    Cancelled,
    #[error("authorization task aborted: {0}")]
    Task(String),
}
