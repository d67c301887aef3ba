use std::sync::Arc;

use axum::{routing::post, Json, Router};
use client_core::{
    endpoint_url, AuthorizationStore, BroadcastDispatcher, HttpRpcTransport,
    PlatformManagerActions,
};
use serde_json::{json, Value};
use shared::{action::Action, domain::Authorization, error::RpcError};
use tokio::net::TcpListener;

async fn handle_rpc(Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let params = &request["params"];
    let reply = match request["method"].as_str() {
        Some("getAuthorization")
            if params["username"] == "admin" && params["password"] == "correct-horse" =>
        {
            json!({"jsonrpc": "2.0", "id": id, "result": "admin-session"})
        }
        Some("getAuthorization") => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": 401, "message": "Invalid username/password specified."}
        }),
        _ => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32601, "message": "Method not found"}
        }),
    };
    Json(reply)
}

async fn spawn_platform() -> anyhow::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().route("/jsonrpc", post(handle_rpc));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn login_failure_then_success_then_clear_flows_through_store() {
    let server_url = spawn_platform().await.expect("spawn platform");
    let transport = Arc::new(
        HttpRpcTransport::new(endpoint_url(&server_url, "/jsonrpc").expect("url"), None)
            .expect("transport"),
    );
    let dispatcher = Arc::new(BroadcastDispatcher::new());
    let mut observed = dispatcher.subscribe();
    let store = AuthorizationStore::new();
    let store_task = store.spawn(dispatcher.subscribe());
    let actions = PlatformManagerActions::new(transport, dispatcher.clone());

    actions
        .request_authorization("admin", "wrong")
        .await
        .expect("rejected logins are dispatched");
    actions
        .spawn_request_authorization("admin", "correct-horse")
        .wait()
        .await
        .expect("login");

    assert_eq!(
        observed.recv().await.expect("fail action"),
        Action::RequestAuthorizationFail {
            error: RpcError::new(401, "Invalid username/password specified."),
        }
    );
    assert_eq!(
        observed.recv().await.expect("success action"),
        Action::RequestAuthorizationSuccess {
            authorization: Authorization(json!("admin-session")),
        }
    );

    actions.clear_authorization();
    assert_eq!(
        observed.recv().await.expect("clear action"),
        Action::ClearAuthorization
    );

    drop(actions);
    drop(dispatcher);
    store_task.await.expect("store task");
    let state = store.snapshot().await;
    assert!(!state.is_authorized());
    assert_eq!(state.last_error, None);
}
