// tests/common/mod.rs
//
// Shared helpers: a throwaway local HTTP server for upstream fixtures, and a
// router wired with a mock completion client.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use transfer_reliability::analyze::MockCompletion;
use transfer_reliability::api::{create_router, AppState};
use transfer_reliability::config::CompletionConfig;
use transfer_reliability::{Analyzer, ContentExtractor};

/// An address nothing listens on; connects fail fast.
pub const DEAD_HOST: &str = "127.0.0.1:1";

pub const BODY_LIMIT: usize = 1024 * 1024;

/// Serve `router` on an ephemeral port; returns `host:port`.
pub async fn spawn_fixture(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture listener");
    let addr = listener.local_addr().expect("fixture addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fixture server");
    });
    addr.to_string()
}

/// Router whose extractor has no network strategies (always synthetic fallback)
/// and whose completion client is the given mock.
pub fn router_with(client: MockCompletion) -> Router {
    let analyzer = Analyzer::with_parts(
        ContentExtractor::with_strategies(Vec::new()),
        Arc::new(client),
        CompletionConfig::default(),
    );
    create_router(AppState::new(analyzer))
}
