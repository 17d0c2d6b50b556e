use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::error::AnalyzeError;
use crate::pipeline::{AnalysisReport, Analyzer};

#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<Analyzer>,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/analyze-tweet", post(analyze_tweet))
        .fallback(not_found)
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Same as [`create_router`].
pub fn router(state: AppState) -> Router {
    create_router(state)
}

#[derive(serde::Deserialize)]
struct AnalyzeTweetReq {
    #[serde(default, rename = "tweetUrl")]
    tweet_url: Option<String>,
}

async fn analyze_tweet(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeTweetReq>, JsonRejection>,
) -> Result<Json<AnalysisReport>, AnalyzeError> {
    // An unreadable body is treated like a missing URL.
    let url = body
        .ok()
        .and_then(|Json(b)| b.tweet_url)
        .unwrap_or_default();

    let report = state.analyzer.analyze(&url).await?;
    Ok(Json(report))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}
