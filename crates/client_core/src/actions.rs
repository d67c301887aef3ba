use std::sync::{Arc, Mutex, PoisonError};

use shared::{
    action::{Action, ActionType},
    domain::{Authorization, Credentials},
};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{
    dispatcher::Dispatcher,
    error::{AuthorizationError, CallError},
    rpc::{RpcRequest, RpcTransport},
};

pub const GET_AUTHORIZATION: &str = "getAuthorization";

pub struct PlatformManagerActions {
    transport: Arc<dyn RpcTransport>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl PlatformManagerActions {
    pub fn new(transport: Arc<dyn RpcTransport>, dispatcher: Arc<dyn Dispatcher>) -> Arc<Self> {
        Arc::new(Self {
            transport,
            dispatcher,
        })
    }

    /// Only RPC errors are dispatched as `REQUEST_AUTHORIZATION_FAIL`; any
    /// other failure is returned without dispatching. On success the type of
    /// the dispatched action is returned.
    pub async fn request_authorization(
        &self,
        username: &str,
        password: &str,
    ) -> Result<ActionType, AuthorizationError> {
        self.run_request(Credentials::new(username, password), None)
            .await
    }

    pub fn spawn_request_authorization(
        self: &Arc<Self>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> PendingAuthorization {
        let credentials = Credentials::new(username, password);
        let gate = Arc::new(CancelGate::default());
        let actions = Arc::clone(self);
        let task_gate = Arc::clone(&gate);

        let task = tokio::spawn(async move {
            let outcome = actions.run_request(credentials, Some(task_gate.as_ref())).await;
            if let Err(AuthorizationError::Unhandled(err)) = &outcome {
                error!("unhandled authorization failure: {err:#}");
            }
            outcome
        });

        PendingAuthorization { gate, task }
    }

    pub fn clear_authorization(&self) {
        self.dispatcher.dispatch(Action::ClearAuthorization);
    }

    async fn run_request(
        &self,
        credentials: Credentials,
        gate: Option<&CancelGate>,
    ) -> Result<ActionType, AuthorizationError> {
        let username = credentials.username.clone();
        let request = RpcRequest::new(GET_AUTHORIZATION, credentials)?;

        let action = match request.call(self.transport.as_ref()).await {
            Ok(result) => {
                info!(username = %username, "authorization granted");
                Action::RequestAuthorizationSuccess {
                    authorization: Authorization(result),
                }
            }
            Err(CallError::Rpc(error)) => {
                warn!(
                    username = %username,
                    code = error.code,
                    "authorization rejected: {}",
                    error.message
                );
                Action::RequestAuthorizationFail { error }
            }
            Err(CallError::Other(err)) => return Err(AuthorizationError::Unhandled(err)),
        };
        let action_type = action.action_type();

        match gate {
            Some(gate) => {
                if gate.run_unless_cancelled(|| self.dispatcher.dispatch(action)) {
                    Ok(action_type)
                } else {
                    info!(
                        username = %username,
                        "discarding result of cancelled authorization request"
                    );
                    Err(AuthorizationError::Cancelled)
                }
            }
            None => {
                self.dispatcher.dispatch(action);
                Ok(action_type)
            }
        }
    }
}

#[derive(Default)]
struct CancelGate {
    cancelled: Mutex<bool>,
}

impl CancelGate {
    fn cancel(&self) {
        *self.cancelled.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }

    fn is_cancelled(&self) -> bool {
        *self.cancelled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run_unless_cancelled(&self, f: impl FnOnce()) -> bool {
        let cancelled = self.cancelled.lock().unwrap_or_else(PoisonError::into_inner);
        if *cancelled {
            return false;
        }
        f();
        true
    }
}

/// Handle to an in-flight authorization request. Dropping it does not cancel
/// the request.
pub struct PendingAuthorization {
    gate: Arc<CancelGate>,
    task: JoinHandle<Result<ActionType, AuthorizationError>>,
}

impl PendingAuthorization {
    /// Invalidates the request. No action is dispatched for it once this
    /// returns; cancelling a request that already dispatched has no effect.
    pub fn cancel(&self) {
        self.gate.cancel();
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.gate.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn wait(self) -> Result<ActionType, AuthorizationError> {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => Err(AuthorizationError::Cancelled),
            Err(err) => Err(AuthorizationError::Task(err.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "tests/actions_tests.rs"]
mod tests;
