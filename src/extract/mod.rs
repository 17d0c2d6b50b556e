// src/extract/mod.rs
//! Post content extraction: an ordered chain of best-effort strategies, first
//! success wins, with a synthetic fallback that never fails.
//!
//! Order:
//! 1) oEmbed endpoint (`embed`)
//! 2) mirror front-ends (`mirror`)
//! 3) direct page scrape (`page`)
//! 4) synthetic sample data (`fallback`)

pub mod embed;
pub mod fallback;
pub mod html;
pub mod mirror;
pub mod page;

use async_trait::async_trait;
use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::logging::{anon_hash, dev_logging_enabled};

pub use embed::EmbedStrategy;
pub use fallback::SyntheticFallback;
pub use mirror::MirrorStrategy;
pub use page::PageStrategy;

/// Short UA used for the oEmbed and mirror fetches.
pub(crate) const BROWSER_UA_SHORT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
/// Full desktop UA used for the direct page scrape.
pub(crate) const BROWSER_UA_FULL: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Normalized post as handed to the analysis stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePost {
    pub text: String,
    pub author: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One way of getting at the post content.
#[async_trait]
pub trait ExtractStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    async fn attempt(&self, url: &str) -> Result<SourcePost, ExtractError>;
}

/// `{username, status_id}` parsed out of a `/<user>/status/<id>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPath {
    pub username: String,
    pub status_id: String,
}

static RE_STATUS_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:twitter\.com|x\.com)/([^/?#]+)/status/(\d+)").expect("status path regex")
});
static RE_USERNAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:twitter\.com|x\.com)/([^/?#]+)").expect("username regex"));
static RE_ALT_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(https?://)(www\.)?x\.com(/|$)").expect("alt host regex"));

/// Rewrite the `x.com` host to `twitter.com`; everything else is left as is.
pub fn canonicalize_url(url: &str) -> String {
    RE_ALT_HOST.replace(url, "${1}${2}twitter.com${3}").into_owned()
}

pub fn parse_status_path(url: &str) -> Option<StatusPath> {
    let caps = RE_STATUS_PATH.captures(url)?;
    Some(StatusPath {
        username: caps.get(1)?.as_str().to_string(),
        status_id: caps.get(2)?.as_str().to_string(),
    })
}

pub fn username_from_url(url: &str) -> Option<String> {
    RE_USERNAME
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Runs the strategy chain. Request-scoped state lives in the strategies' inputs only.
pub struct ContentExtractor {
    strategies: Vec<Box<dyn ExtractStrategy>>,
    fallback: SyntheticFallback,
}

impl ContentExtractor {
    /// Standard chain: embed → mirror → page, then synthetic fallback.
    pub fn new(cfg: &ExtractorConfig, http: reqwest::Client) -> Self {
        let strategies: Vec<Box<dyn ExtractStrategy>> = vec![
            Box::new(EmbedStrategy::new(
                http.clone(),
                cfg.embed_endpoint.clone(),
                Duration::from_secs(cfg.embed_timeout_secs),
            )),
            Box::new(MirrorStrategy::new(
                http.clone(),
                cfg.mirror_scheme.clone(),
                cfg.mirror_hosts.clone(),
                Duration::from_secs(cfg.mirror_timeout_secs),
            )),
            Box::new(PageStrategy::new(
                http,
                cfg.page_base.clone(),
                Duration::from_secs(cfg.page_timeout_secs),
            )),
        ];
        Self::with_strategies(strategies)
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ExtractStrategy>>) -> Self {
        Self {
            strategies,
            fallback: SyntheticFallback,
        }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Never fails: degrades to synthetic data when every strategy gives up.
    pub async fn extract(&self, url: &str) -> SourcePost {
        for strategy in &self.strategies {
            match strategy.attempt(url).await {
                Ok(post) if !post.text.trim().is_empty() => {
                    counter!("extract_strategy_success_total", "strategy" => strategy.name())
                        .increment(1);
                    info!(strategy = strategy.name(), "post extracted");
                    if dev_logging_enabled() {
                        info!(
                            target: "extract",
                            id = %anon_hash(&post.text),
                            author = %post.author,
                            "extracted post"
                        );
                    }
                    return post;
                }
                Ok(_) => {
                    counter!("extract_strategy_failure_total", "strategy" => strategy.name())
                        .increment(1);
                    warn!(strategy = strategy.name(), "strategy returned empty text");
                }
                Err(e) => {
                    counter!("extract_strategy_failure_total", "strategy" => strategy.name())
                        .increment(1);
                    warn!(strategy = strategy.name(), error = %e, "extraction strategy failed");
                }
            }
        }

        warn!("all extraction methods failed, using synthetic fallback");
        counter!("extract_strategy_success_total", "strategy" => self.fallback.name())
            .increment(1);
        self.fallback.build(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        name: &'static str,
        out: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ExtractStrategy for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }
        async fn attempt(&self, url: &str) -> Result<SourcePost, ExtractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.out {
                Some(t) => Ok(SourcePost {
                    text: t.to_string(),
                    author: self.name.to_string(),
                    url: url.to_string(),
                    note: None,
                }),
                None => Err(ExtractError::EmptyContent),
            }
        }
    }

    fn fixed(name: &'static str, out: Option<&'static str>) -> (Box<dyn ExtractStrategy>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(Fixed {
                name,
                out,
                calls: calls.clone(),
            }),
            calls,
        )
    }

    #[test]
    fn canonicalize_rewrites_alt_host_only() {
        assert_eq!(
            canonicalize_url("https://x.com/user/status/1"),
            "https://twitter.com/user/status/1"
        );
        assert_eq!(
            canonicalize_url("HTTPS://www.X.com/user/status/1"),
            "HTTPS://www.twitter.com/user/status/1"
        );
        assert_eq!(
            canonicalize_url("https://twitter.com/box.com/status/1"),
            "https://twitter.com/box.com/status/1"
        );
    }

    #[test]
    fn status_path_parsing() {
        let p = parse_status_path("https://x.com/FabrizioRomano/status/12345?s=20").unwrap();
        assert_eq!(p.username, "FabrizioRomano");
        assert_eq!(p.status_id, "12345");
        assert!(parse_status_path("https://twitter.com/user").is_none());
        assert_eq!(
            username_from_url("https://twitter.com/user").as_deref(),
            Some("user")
        );
    }

    #[tokio::test]
    async fn first_success_wins_and_later_strategies_are_skipped() {
        let (a, a_calls) = fixed("a", None);
        let (b, b_calls) = fixed("b", Some("from b"));
        let (c, c_calls) = fixed("c", Some("from c"));
        let ex = ContentExtractor::with_strategies(vec![a, b, c]);

        let post = ex.extract("https://twitter.com/u/status/1").await;
        assert_eq!(post.text, "from b");
        assert_eq!(post.author, "b");
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
        assert_eq!(c_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_text_counts_as_failure() {
        let (a, _) = fixed("a", Some("   "));
        let ex = ContentExtractor::with_strategies(vec![a]);
        let post = ex.extract("https://twitter.com/someone/status/1").await;
        assert!(post.note.is_some());
        assert_eq!(post.author, "someone");
    }

    #[tokio::test]
    async fn all_failures_fall_back_to_synthetic() {
        let (a, _) = fixed("a", None);
        let (b, _) = fixed("b", None);
        let ex = ContentExtractor::with_strategies(vec![a, b]);
        let post = ex
            .extract("https://x.com/FabrizioRomano/status/99")
            .await;
        assert_eq!(post.author, "Fabrizio Romano");
        assert!(!post.text.is_empty());
        assert_eq!(post.url, "https://x.com/FabrizioRomano/status/99");
        assert!(post.note.is_some());
    }

    #[test]
    fn default_chain_order() {
        let ex = ContentExtractor::new(&ExtractorConfig::default(), reqwest::Client::new());
        assert_eq!(ex.strategy_names(), vec!["embed", "mirror", "page"]);
    }
}
