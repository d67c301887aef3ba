use std::sync::Arc;

use shared::{action::Action, domain::Authorization, error::RpcError};
use tokio::{
    sync::{broadcast, broadcast::error::RecvError, RwLock},
    task::JoinHandle,
};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorizationState {
    pub authorization: Option<Authorization>,
    pub last_error: Option<RpcError>,
}

impl AuthorizationState {
    pub fn reduce(&mut self, action: &Action) {
        match action {
            Action::RequestAuthorizationSuccess { authorization } => {
                self.authorization = Some(authorization.clone());
                self.last_error = None;
            }
            Action::RequestAuthorizationFail { error } => {
                self.authorization = None;
                self.last_error = Some(error.clone());
            }
            Action::ClearAuthorization => {
                self.authorization = None;
                self.last_error = None;
            }
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.authorization.is_some()
    }
}

#[derive(Clone, Default)]
pub struct AuthorizationStore {
    state: Arc<RwLock<AuthorizationState>>,
}

impl AuthorizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn apply(&self, action: &Action) {
        self.state.write().await.reduce(action);
        debug!(action = %action.action_type(), "authorization store updated");
    }

    pub async fn snapshot(&self) -> AuthorizationState {
        self.state.read().await.clone()
    }

    pub fn spawn(&self, mut receiver: broadcast::Receiver<Action>) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(action) => store.apply(&action).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "authorization store lagged behind the dispatcher");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
