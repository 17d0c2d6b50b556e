// src/pipeline.rs
//! Request pipeline: validate URL → extract post → completion → normalize → label.
//!
//! Only the completion call may fail the request; every other stage degrades.

use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::analyze::{
    build_client_from_config, build_prompt, label_for, normalize, AnalysisResult,
    CompletionRequest, DynCompletionClient, ReliabilityLabel,
};
use crate::config::{AnalyzerConfig, CompletionConfig};
use crate::error::AnalyzeError;
use crate::extract::{ContentExtractor, SourcePost};

static RE_POST_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://(www\.)?(twitter\.com|x\.com)/(?-u:\w)+/status/\d+")
        .expect("post url regex")
});

/// Response body for one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub tweet: SourcePost,
    pub reliability_score: u8,
    pub reliability_label: ReliabilityLabel,
    pub reasoning: String,
    /// Full normalized breakdown.
    pub analysis: AnalysisResult,
}

/// Reject anything that is not a `/<handle>/status/<digits>` URL on an allowed host.
pub fn validate_post_url(url: &str) -> Result<(), AnalyzeError> {
    if url.trim().is_empty() {
        return Err(AnalyzeError::Validation("Tweet URL is required".to_string()));
    }
    if !RE_POST_URL.is_match(url.trim()) {
        return Err(AnalyzeError::Validation(
            "Invalid Twitter/X URL format".to_string(),
        ));
    }
    Ok(())
}

/// Shared outbound client; per-call timeouts are set on each request.
pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(4))
        .build()
}

pub struct Analyzer {
    extractor: ContentExtractor,
    client: DynCompletionClient,
    completion: CompletionConfig,
}

impl Analyzer {
    pub fn new(cfg: &AnalyzerConfig) -> anyhow::Result<Self> {
        let http = build_http_client()?;
        let extractor = ContentExtractor::new(&cfg.extractor, http.clone());
        let client = build_client_from_config(&cfg.completion, http);
        info!(
            provider = client.provider_name(),
            model = %cfg.completion.model,
            "analyzer ready"
        );
        Ok(Self::with_parts(extractor, client, cfg.completion.clone()))
    }

    pub fn with_parts(
        extractor: ContentExtractor,
        client: DynCompletionClient,
        completion: CompletionConfig,
    ) -> Self {
        Self {
            extractor,
            client,
            completion,
        }
    }

    pub async fn analyze(&self, url: &str) -> Result<AnalysisReport, AnalyzeError> {
        if let Err(e) = validate_post_url(url) {
            counter!("analyze_requests_total", "outcome" => "invalid").increment(1);
            return Err(e);
        }
        let url = url.trim();
        info!(%url, "analyzing post");

        let post = self.extractor.extract(url).await;
        let prompt = build_prompt(&post);
        let req = CompletionRequest::from_config(&self.completion, prompt);

        let raw = match self.client.complete(&req).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, provider = self.client.provider_name(), "completion failed");
                counter!("analyze_requests_total", "outcome" => "service_error").increment(1);
                return Err(AnalyzeError::Service(format!(
                    "Failed to analyze tweet with AI: {e}"
                )));
            }
        };
        debug!(raw = %raw, "completion reply");

        let analysis = normalize(&raw);
        let label = label_for(analysis.reliability_score);
        info!(
            score = analysis.reliability_score,
            label = %label,
            "analysis complete"
        );
        counter!("analyze_requests_total", "outcome" => "ok").increment(1);

        Ok(AnalysisReport {
            tweet: post,
            reliability_score: analysis.reliability_score,
            reliability_label: label,
            reasoning: analysis.reasoning.clone(),
            analysis,
        })
    }
}
