use std::sync::Arc;

use axum::{Json, Router, extract::State, http::HeaderMap, http::StatusCode, routing::post};
use diy_assistant::services::completion::{
    CompletionClient, CompletionConfig, CompletionError, OpenRouterClient, SYSTEM_INSTRUCTION,
};
use serde_json::{Value, json};
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

/// Serves one canned status and body on an ephemeral port.
async fn stub(status: StatusCode, reply: Value) -> (String, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route(
            "/chat/completions",
            post(
                move |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| {
                    let reply = reply.clone();
                    async move {
                        captured.requests.lock().await.push((headers, body));
                        (status, Json(reply))
                    }
                },
            ),
        )
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/chat/completions"), captured)
}

fn client(endpoint: String, api_key: Option<&str>) -> OpenRouterClient {
    OpenRouterClient::new(CompletionConfig {
        endpoint,
        api_key: api_key.map(str::to_string),
        site_origin: "http://diy.test".to_string(),
        ..CompletionConfig::default()
    })
}

#[tokio::test]
async fn sends_contract_and_reads_first_choice() {
    let (endpoint, captured) = stub(
        StatusCode::OK,
        json!({ "choices": [{ "message": { "role": "assistant", "content": "Turn off the water." } }] }),
    )
    .await;

    let reply = client(endpoint, Some("sk-test"))
        .complete("fix a dripping tap")
        .await
        .unwrap();
    assert_eq!(reply.as_deref(), Some("Turn off the water."));

    let requests = captured.requests.lock().await;
    assert_eq!(requests.len(), 1);
    let (headers, body) = &requests[0];
    assert_eq!(headers["authorization"], "Bearer sk-test");
    assert_eq!(headers["http-referer"], "http://diy.test");
    assert_eq!(headers["x-title"], "DIY Assistant");
    assert_eq!(body["messages"][0]["content"], SYSTEM_INSTRUCTION);
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "fix a dripping tap");
    assert_eq!(body["max_tokens"], 1000);
}

#[tokio::test]
async fn missing_key_sends_no_authorization() {
    let (endpoint, captured) = stub(StatusCode::OK, json!({ "choices": [] })).await;

    let reply = client(endpoint, None).complete("build a shed").await.unwrap();
    assert_eq!(reply, None);
    let requests = captured.requests.lock().await;
    assert!(requests[0].0.get("authorization").is_none());
}

#[tokio::test]
async fn remote_error_payload_is_reported() {
    let (endpoint, _) = stub(
        StatusCode::UNAUTHORIZED,
        json!({ "error": { "message": "User not found.", "code": 401 } }),
    )
    .await;

    let err = client(endpoint, Some("bad")).complete("make a stool").await.unwrap_err();
    assert!(matches!(err, CompletionError::Remote(ref m) if m == "User not found."));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{addr}/chat/completions"), None)
        .complete("make a stool")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "transport");
}
