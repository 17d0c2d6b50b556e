// src/extract/page.rs
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use scraper::Html;
use std::time::Duration;

use super::html::first_match;
use super::{
    canonicalize_url, parse_status_path, username_from_url, ExtractStrategy, SourcePost,
    BROWSER_UA_FULL,
};
use crate::error::ExtractError;

/// Content selectors, most specific first.
pub const CONTENT_SELECTORS: &[&str] = &[
    r#"[data-testid="tweetText"]"#,
    ".tweet-text",
    ".TweetTextSize",
    ".tweet-content",
    r#"[role="article"] [lang]"#,
];

pub const AUTHOR_SELECTORS: &[&str] = &[r#"[data-testid="User-Names"] span"#, ".username", ".fullname"];

/// Direct fetch of the canonical page with desktop browser headers.
pub struct PageStrategy {
    http: reqwest::Client,
    page_base: Option<String>,
    timeout: Duration,
}

impl PageStrategy {
    pub fn new(http: reqwest::Client, page_base: Option<String>, timeout: Duration) -> Self {
        Self {
            http,
            page_base,
            timeout,
        }
    }

    fn target_for(&self, url: &str) -> Result<String, ExtractError> {
        match &self.page_base {
            Some(base) => {
                let p = parse_status_path(url).ok_or(ExtractError::UnparseableUrl)?;
                Ok(format!("{}/{}/status/{}", base, p.username, p.status_id))
            }
            None => Ok(canonicalize_url(url)),
        }
    }
}

/// `(text, author)` from a rendered page; each field independently optional.
pub(crate) fn parse_page_html(body: &str) -> (Option<String>, Option<String>) {
    let doc = Html::parse_document(body);
    (
        first_match(&doc, CONTENT_SELECTORS),
        first_match(&doc, AUTHOR_SELECTORS),
    )
}

#[async_trait]
impl ExtractStrategy for PageStrategy {
    fn name(&self) -> &'static str {
        "page"
    }

    async fn attempt(&self, url: &str) -> Result<SourcePost, ExtractError> {
        let target = self.target_for(url)?;
        let resp = self
            .http
            .get(&target)
            .header(USER_AGENT, BROWSER_UA_FULL)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .timeout(self.timeout)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ExtractError::Status(resp.status().as_u16()));
        }
        let body = resp.text().await?;

        let (text, author) = parse_page_html(&body);
        let text = text.ok_or(ExtractError::EmptyContent)?;
        let author = author
            .or_else(|| username_from_url(url))
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(SourcePost {
            text,
            author,
            url: url.to_string(),
            note: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_content_selector_with_text_wins() {
        let body = r#"
            <div class="tweet-text"></div>
            <div class="TweetTextSize">Loan with option to buy</div>
            <div class="tweet-content">ignored</div>
            <div data-testid="User-Names"><span>Ben Jacobs</span><span>@JacobsBen</span></div>
        "#;
        let (text, author) = parse_page_html(body);
        assert_eq!(text.as_deref(), Some("Loan with option to buy"));
        assert_eq!(author.as_deref(), Some("Ben Jacobs"));
    }

    #[test]
    fn article_lang_selector() {
        let body = r#"<div role="article"><div lang="en">Contract until 2029</div></div>"#;
        let (text, author) = parse_page_html(body);
        assert_eq!(text.as_deref(), Some("Contract until 2029"));
        assert_eq!(author, None);
    }

    #[test]
    fn page_base_rewrites_target() {
        let s = PageStrategy::new(
            reqwest::Client::new(),
            Some("http://127.0.0.1:9999".into()),
            Duration::from_secs(1),
        );
        assert_eq!(
            s.target_for("https://x.com/user/status/42").unwrap(),
            "http://127.0.0.1:9999/user/status/42"
        );
        let s = PageStrategy::new(reqwest::Client::new(), None, Duration::from_secs(1));
        assert_eq!(
            s.target_for("https://x.com/user/status/42").unwrap(),
            "https://twitter.com/user/status/42"
        );
    }
}
