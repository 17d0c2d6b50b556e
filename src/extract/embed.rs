// src/extract/embed.rs
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use scraper::Html;
use serde::Deserialize;
use std::time::Duration;

use super::html::all_text;
use super::{canonicalize_url, ExtractStrategy, SourcePost, BROWSER_UA_SHORT};
use crate::error::ExtractError;

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    author_name: Option<String>,
}

/// oEmbed lookup: the endpoint returns a blockquote fragment plus the author name.
pub struct EmbedStrategy {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl EmbedStrategy {
    pub fn new(http: reqwest::Client, endpoint: String, timeout: Duration) -> Self {
        Self {
            http,
            endpoint,
            timeout,
        }
    }
}

/// Text of the fragment's paragraphs, else of the whole blockquote.
pub(crate) fn parse_embed_html(fragment: &str) -> Option<String> {
    let doc = Html::parse_fragment(fragment);
    all_text(&doc, "p").or_else(|| all_text(&doc, "blockquote"))
}

#[async_trait]
impl ExtractStrategy for EmbedStrategy {
    fn name(&self) -> &'static str {
        "embed"
    }

    async fn attempt(&self, url: &str) -> Result<SourcePost, ExtractError> {
        let canonical = canonicalize_url(url);
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[("url", canonical.as_str())])
            .header(USER_AGENT, BROWSER_UA_SHORT)
            .timeout(self.timeout)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ExtractError::Status(resp.status().as_u16()));
        }

        let body: EmbedResponse = resp.json().await?;
        let fragment = body
            .html
            .filter(|h| !h.trim().is_empty())
            .ok_or(ExtractError::EmptyContent)?;
        let text = parse_embed_html(&fragment).ok_or(ExtractError::EmptyContent)?;

        let author = body
            .author_name
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(SourcePost {
            text,
            author,
            url: url.to_string(),
            note: None,
        })
    }
}
