//! Transfer Reliability Service: binary entrypoint.
//! Boots the Axum HTTP server, wiring config, the analysis pipeline, and metrics.

use shuttle_axum::ShuttleAxum;
use tracing::{info, warn};

use transfer_reliability::{app_with_config, logging, metrics::Metrics, AnalyzerConfig};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    logging::init_tracing();

    // Missing ANTHROPIC_API_KEY is fatal here.
    let cfg = AnalyzerConfig::from_env()?;
    let mut router = app_with_config(&cfg)?;

    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => warn!(error = ?e, "metrics recorder not installed"),
    }

    info!(port = cfg.port, "transfer reliability service starting");
    Ok(router.into())
}
