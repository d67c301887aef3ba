use serde_json::json;

use crate::{
    action::{Action, ActionType},
    domain::{Authorization, Credentials},
    error::{RpcError, INTERNAL_ERROR},
    protocol::{RpcOutcome, RpcRequestEnvelope, RpcResponseEnvelope},
};

#[test]
fn success_action_serializes_with_type_tag_and_authorization() {
    let action = Action::RequestAuthorizationSuccess {
        authorization: Authorization(json!("token-123")),
    };
    assert_eq!(
        serde_json::to_value(&action).expect("serialize"),
        json!({"type": "REQUEST_AUTHORIZATION_SUCCESS", "authorization": "token-123"})
    );
}

#[test]
fn fail_action_carries_rpc_error_payload() {
    let action = Action::RequestAuthorizationFail {
        error: RpcError::new(401, "Invalid username/password"),
    };
    assert_eq!(
        serde_json::to_value(&action).expect("serialize"),
        json!({
            "type": "REQUEST_AUTHORIZATION_FAIL",
            "error": {"code": 401, "message": "Invalid username/password"}
        })
    );
}

#[test]
fn clear_action_has_no_payload_fields() {
    let value = serde_json::to_value(Action::ClearAuthorization).expect("serialize");
    assert_eq!(value, json!({"type": "CLEAR_AUTHORIZATION"}));
}

#[test]
fn action_type_names_match_serialized_tags() {
    for action_type in ActionType::ALL {
        let value = serde_json::to_value(action_type).expect("serialize");
        assert_eq!(value, json!(action_type.as_str()));
    }
    assert_eq!(
        Action::ClearAuthorization.action_type(),
        ActionType::ClearAuthorization
    );
}

#[test]
fn credentials_debug_output_redacts_password() {
    let credentials = Credentials::new("admin", "hunter2");
    let rendered = format!("{credentials:?}");
    assert!(rendered.contains("admin"));
    assert!(!rendered.contains("hunter2"));
}

#[test]
fn request_envelope_uses_jsonrpc_2_and_omits_missing_authorization() {
    let envelope = RpcRequestEnvelope::new("getAuthorization", json!({"username": "a"}));
    let value = serde_json::to_value(&envelope).expect("serialize");
    assert_eq!(value["jsonrpc"], "2.0");
    assert_eq!(value["method"], "getAuthorization");
    assert!(value.get("authorization").is_none());
    assert!(!envelope.id.is_empty());
}

#[test]
fn response_with_error_wins_over_result() {
    let response: RpcResponseEnvelope = serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": "1",
        "result": "ignored",
        "error": {"code": INTERNAL_ERROR, "message": "boom", "data": {"trace": "x"}}
    }))
    .expect("deserialize");

    assert_eq!(
        response.into_outcome(),
        RpcOutcome::Error(RpcError::new(INTERNAL_ERROR, "boom").with_data(json!({"trace": "x"})))
    );
}

#[test]
fn response_without_result_or_error_is_malformed() {
    let response: RpcResponseEnvelope =
        serde_json::from_value(json!({"jsonrpc": "2.0", "id": "1"})).expect("deserialize");
    assert_eq!(response.into_outcome(), RpcOutcome::Malformed);
}

#[test]
fn response_id_matching_accepts_null_ids() {
    let response = RpcResponseEnvelope::success("abc", json!(1));
    assert!(response.answers("abc"));
    assert!(!response.answers("def"));

    let null_id: RpcResponseEnvelope =
        serde_json::from_value(json!({"id": null, "error": {"code": -32700, "message": "parse"}}))
            .expect("deserialize");
    assert!(null_id.answers("anything"));
}

#[test]
fn null_result_is_a_valid_answer() {
    let response: RpcResponseEnvelope =
        serde_json::from_value(json!({"jsonrpc": "2.0", "id": "1", "result": null}))
            .expect("deserialize");
    assert_eq!(response.into_outcome(), RpcOutcome::Result(serde_json::Value::Null));
}
