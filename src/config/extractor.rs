// src/config/extractor.rs
use serde::{Deserialize, Serialize};

fn default_embed_endpoint() -> String {
    "https://publish.twitter.com/oembed".to_string()
}
fn default_mirror_hosts() -> Vec<String> {
    vec![
        "nitter.net".to_string(),
        "nitter.it".to_string(),
        "nitter.pussthecat.org".to_string(),
    ]
}
fn default_mirror_scheme() -> String {
    "https".to_string()
}
fn default_fetch_timeout_secs() -> u64 {
    10
}
fn default_page_timeout_secs() -> u64 {
    15
}

/// Endpoints and per-call timeouts for the extraction chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default = "default_embed_endpoint")]
    pub embed_endpoint: String,
    /// Tried in order; first host yielding text wins.
    #[serde(default = "default_mirror_hosts")]
    pub mirror_hosts: Vec<String>,
    #[serde(default = "default_mirror_scheme")]
    pub mirror_scheme: String,
    /// When set, the page strategy fetches `{page_base}/{user}/status/{id}`
    /// instead of the canonical URL.
    #[serde(default)]
    pub page_base: Option<String>,
    #[serde(default = "default_fetch_timeout_secs")]
    pub embed_timeout_secs: u64,
    #[serde(default = "default_fetch_timeout_secs")]
    pub mirror_timeout_secs: u64,
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            embed_endpoint: default_embed_endpoint(),
            mirror_hosts: default_mirror_hosts(),
            mirror_scheme: default_mirror_scheme(),
            page_base: None,
            embed_timeout_secs: default_fetch_timeout_secs(),
            mirror_timeout_secs: default_fetch_timeout_secs(),
            page_timeout_secs: default_page_timeout_secs(),
        }
    }
}

impl ExtractorConfig {
    pub(crate) fn sanitize(&mut self) {
        self.mirror_hosts = self
            .mirror_hosts
            .iter()
            .map(|h| h.trim().trim_end_matches('/').to_string())
            .filter(|h| !h.is_empty())
            .collect();
        if self.mirror_scheme.trim().is_empty() {
            self.mirror_scheme = default_mirror_scheme();
        }
        if self.embed_timeout_secs == 0 {
            self.embed_timeout_secs = default_fetch_timeout_secs();
        }
        if self.mirror_timeout_secs == 0 {
            self.mirror_timeout_secs = default_fetch_timeout_secs();
        }
        if self.page_timeout_secs == 0 {
            self.page_timeout_secs = default_page_timeout_secs();
        }
        if let Some(base) = &self.page_base {
            let b = base.trim().trim_end_matches('/').to_string();
            self.page_base = if b.is_empty() { None } else { Some(b) };
        }
    }
}
