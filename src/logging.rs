// src/logging.rs
//! Tracing setup and the anonymised dev logger.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_DEV_LOG: &str = "ANALYZER_DEV_LOG";

/// Dev logging gate: ANALYZER_DEV_LOG=1 AND dev env (debug build or SHUTTLE_ENV in {local,development,dev})
pub fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Short, stable id for a piece of text so logs never carry raw post content.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Compact logs in dev, JSON lines otherwise. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("transfer_reliability=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);
    let res = if dev_logging_enabled() {
        registry.with(fmt::layer().compact()).try_init()
    } else {
        registry.with(fmt::layer().json()).try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
