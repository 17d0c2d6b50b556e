// tests/completion_http.rs
//
// Anthropic provider against a local fixture standing in for /v1/messages.

mod common;

use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};

use common::spawn_fixture;
use transfer_reliability::analyze::{ClaudeProvider, CompletionClient, CompletionRequest};
use transfer_reliability::config::CompletionConfig;
use transfer_reliability::error::CompletionError;

async fn messages(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let key_ok = headers.get("x-api-key").and_then(|v| v.to_str().ok()) == Some("sk-test");
    let version_ok = headers.get("anthropic-version").is_some();
    if !key_ok || !version_ok {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "message": "bad auth" } })),
        );
    }
    // Echo the request knobs back so the test can check them.
    let text = format!(
        "model={} max_tokens={} temperature={} role={}",
        body["model"].as_str().unwrap_or_default(),
        body["max_tokens"],
        body["temperature"],
        body["messages"][0]["role"].as_str().unwrap_or_default()
    );
    (
        StatusCode::OK,
        Json(json!({ "content": [{ "type": "text", "text": text }] })),
    )
}

fn cfg(host: &str, key: &str) -> CompletionConfig {
    CompletionConfig {
        api_key: key.to_string(),
        base_url: format!("http://{host}"),
        timeout_secs: 5,
        ..CompletionConfig::default()
    }
}

fn request(cfg: &CompletionConfig) -> CompletionRequest {
    CompletionRequest::from_config(cfg, "Analyze this".to_string())
}

#[tokio::test]
async fn returns_first_text_block() {
    let host = spawn_fixture(Router::new().route("/v1/messages", post(messages))).await;
    let c = cfg(&host, "sk-test");
    let provider = ClaudeProvider::new(reqwest::Client::new(), &c);

    let out = provider.complete(&request(&c)).await.expect("completion ok");
    assert!(out.contains("model=claude-3-5-sonnet-20241022"), "{out}");
    assert!(out.contains("max_tokens=1500"), "{out}");
    assert!(out.contains("role=user"), "{out}");
    assert_eq!(provider.provider_name(), "anthropic");
}

#[tokio::test]
async fn non_2xx_is_status_error() {
    let host = spawn_fixture(Router::new().route("/v1/messages", post(messages))).await;
    let c = cfg(&host, "sk-wrong");
    let provider = ClaudeProvider::new(reqwest::Client::new(), &c);

    let err = provider.complete(&request(&c)).await.unwrap_err();
    match err {
        CompletionError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("bad auth"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn reply_without_text_block_is_error() {
    let host = spawn_fixture(Router::new().route(
        "/v1/messages",
        post(|| async { Json(json!({ "content": [{ "type": "tool_use", "id": "x" }] })) }),
    ))
    .await;
    let c = cfg(&host, "sk-test");
    let provider = ClaudeProvider::new(reqwest::Client::new(), &c);

    let err = provider.complete(&request(&c)).await.unwrap_err();
    assert!(matches!(err, CompletionError::NoText));
}
