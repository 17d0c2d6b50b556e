// tests/app_env.rs
//
// `app()` built from the process environment. Env mutation → serial.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serial_test::serial;
use std::env;
use tower::ServiceExt; // for `oneshot`

use transfer_reliability::app;

#[tokio::test]
#[serial]
async fn app_requires_api_key() {
    env::remove_var("ANTHROPIC_API_KEY");
    env::remove_var("ANALYZER_CONFIG_PATH");
    let err = app().await.expect_err("missing key must fail");
    assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
}

#[tokio::test]
#[serial]
async fn app_with_mock_mode_rejects_bad_url() {
    env::set_var("ANTHROPIC_API_KEY", "sk-test");
    env::remove_var("ANALYZER_CONFIG_PATH");
    env::set_var("AI_TEST_MODE", "mock");

    let app = app().await.expect("app builds");

    let req = Request::builder()
        .method("POST")
        .uri("/api/analyze-tweet")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"tweetUrl": "https://twitter.com/user"}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let s = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(s.contains("\"error\""), "body: {s}");

    env::remove_var("AI_TEST_MODE");
    env::remove_var("ANTHROPIC_API_KEY");
}
