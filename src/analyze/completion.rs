//! Completion adapter: provider abstraction over a black-box text-completion service.
//!
//! The orchestrator only ever sees `CompletionClient::complete` returning the reply
//! text or an error. Retries, if ever wanted, belong here, not in the pipeline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::histogram;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CompletionConfig;
use crate::error::CompletionError;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// One single-turn completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub prompt: String,
}

impl CompletionRequest {
    pub fn from_config(cfg: &CompletionConfig, prompt: String) -> Self {
        Self {
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
            prompt,
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, req: &CompletionRequest) -> Result<String, CompletionError>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynCompletionClient = Arc<dyn CompletionClient>;

/// Factory: build a client according to config and environment variables.
///
/// * `AI_TEST_MODE=mock` → deterministic mock reply.
/// * `AI_TEST_MODE=error` → mock that always fails.
/// * otherwise the Anthropic Messages API.
pub fn build_client_from_config(cfg: &CompletionConfig, http: reqwest::Client) -> DynCompletionClient {
    match std::env::var("AI_TEST_MODE").ok().as_deref() {
        Some("mock") => Arc::new(MockCompletion::reply(MockCompletion::SAMPLE_REPLY)),
        Some("error") => Arc::new(MockCompletion::failing("simulated provider error")),
        _ => Arc::new(ClaudeProvider::new(http, cfg)),
    }
}

// ------------------------------------------------------------
// Anthropic Messages API
// ------------------------------------------------------------

pub struct ClaudeProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Msg<'a>>,
}

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ClaudeProvider {
    pub fn new(http: reqwest::Client, cfg: &CompletionConfig) -> Self {
        Self {
            http,
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }
}

#[async_trait]
impl CompletionClient for ClaudeProvider {
    async fn complete(&self, req: &CompletionRequest) -> Result<String, CompletionError> {
        if self.api_key.is_empty() {
            return Err(CompletionError::MissingApiKey);
        }

        let body = Req {
            model: &req.model,
            max_tokens: req.max_tokens,
            temperature: req.temperature,
            messages: vec![Msg {
                role: "user",
                content: &req.prompt,
            }],
        };

        debug!(model = %req.model, "completion request");
        let t0 = Instant::now();
        let resp = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: Resp = resp.json().await?;
        histogram!("completion_latency_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        parsed
            .content
            .into_iter()
            .find(|b| b.kind == "text")
            .and_then(|b| b.text)
            .ok_or(CompletionError::NoText)
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}

// ------------------------------------------------------------
// Mock
// ------------------------------------------------------------

/// Fixed reply or fixed failure, for tests and offline runs.
#[derive(Debug, Clone)]
pub struct MockCompletion {
    outcome: Result<String, String>,
}

impl MockCompletion {
    pub const SAMPLE_REPLY: &'static str = r#"{"journalist_tier": "Tier 1", "language_confidence": "High", "source_quality": "Excellent", "reliability_score": 92, "citation_bonus": 0, "citations_found": [], "reasoning": "Mock analysis: tier 1 author with definitive language."}"#;

    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
        }
    }

    pub fn failing(msg: impl Into<String>) -> Self {
        Self {
            outcome: Err(msg.into()),
        }
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, _req: &CompletionRequest) -> Result<String, CompletionError> {
        self.outcome.clone().map_err(CompletionError::Other)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req() -> CompletionRequest {
        CompletionRequest::from_config(&CompletionConfig::default(), "prompt".into())
    }

    #[test]
    fn request_uses_config_defaults() {
        let r = req();
        assert_eq!(r.max_tokens, 1500);
        assert!((r.temperature - 0.1).abs() < 1e-6);
        assert_eq!(r.model, "claude-3-5-sonnet-20241022");
    }

    #[tokio::test]
    async fn mock_reply_and_failure() {
        let ok = MockCompletion::reply("hello");
        assert_eq!(ok.complete(&req()).await.unwrap(), "hello");

        let bad = MockCompletion::failing("boom");
        let err = bad.complete(&req()).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        let p = ClaudeProvider::new(reqwest::Client::new(), &CompletionConfig::default());
        let err = p.complete(&req()).await.unwrap_err();
        assert!(matches!(err, CompletionError::MissingApiKey));
    }
}
