use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{domain::Authorization, error::RpcError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    RequestAuthorizationSuccess,
    RequestAuthorizationFail,
    ClearAuthorization,
}

impl ActionType {
    pub const ALL: [ActionType; 3] = [
        ActionType::RequestAuthorizationSuccess,
        ActionType::RequestAuthorizationFail,
        ActionType::ClearAuthorization,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::RequestAuthorizationSuccess => "REQUEST_AUTHORIZATION_SUCCESS",
            ActionType::RequestAuthorizationFail => "REQUEST_AUTHORIZATION_FAIL",
            ActionType::ClearAuthorization => "CLEAR_AUTHORIZATION",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    RequestAuthorizationSuccess { authorization: Authorization },
    RequestAuthorizationFail { error: RpcError },
    ClearAuthorization,
}

impl Action {
    pub fn action_type(&self) -> ActionType {
        match self {
            Action::RequestAuthorizationSuccess { .. } => ActionType::RequestAuthorizationSuccess,
            Action::RequestAuthorizationFail { .. } => ActionType::RequestAuthorizationFail,
            Action::ClearAuthorization => ActionType::ClearAuthorization,
        }
    }
}
