// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod analyze;
pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod metrics;
pub mod pipeline;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::AnalyzerConfig;
pub use crate::error::AnalyzeError;
pub use crate::extract::{ContentExtractor, SourcePost};
pub use crate::pipeline::{validate_post_url, AnalysisReport, Analyzer};

use axum::Router;

/// Build the HTTP app from the environment (`ANTHROPIC_API_KEY` required).
pub async fn app() -> anyhow::Result<Router> {
    let cfg = AnalyzerConfig::from_env()?;
    app_with_config(&cfg)
}

/// Build the HTTP app from an explicit config.
pub fn app_with_config(cfg: &AnalyzerConfig) -> anyhow::Result<Router> {
    let analyzer = Analyzer::new(cfg)?;
    Ok(api::create_router(api::AppState::new(analyzer)))
}
