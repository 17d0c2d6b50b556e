// src/extract/mirror.rs
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, warn};

use super::html::first_text;
use super::{parse_status_path, ExtractStrategy, SourcePost, StatusPath, BROWSER_UA_SHORT};
use crate::error::ExtractError;

/// Mirror front-ends serving the same `/<user>/status/<id>` path.
pub struct MirrorStrategy {
    http: reqwest::Client,
    scheme: String,
    hosts: Vec<String>,
    timeout: Duration,
}

impl MirrorStrategy {
    pub fn new(http: reqwest::Client, scheme: String, hosts: Vec<String>, timeout: Duration) -> Self {
        Self {
            http,
            scheme,
            hosts,
            timeout,
        }
    }

    async fn fetch_host(&self, host: &str, path: &StatusPath) -> Result<String, ExtractError> {
        let target = format!(
            "{}://{}/{}/status/{}",
            self.scheme, host, path.username, path.status_id
        );
        debug!(%target, "fetching mirror");
        let resp = self
            .http
            .get(&target)
            .header(USER_AGENT, BROWSER_UA_SHORT)
            .timeout(self.timeout)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ExtractError::Status(resp.status().as_u16()));
        }
        Ok(resp.text().await?)
    }
}

/// `(text, author)` from a mirror page; author falls back to the handle.
/// Only the first match of each selector is read, so replies below the post are ignored.
pub(crate) fn parse_mirror_html(body: &str, username: &str) -> Option<(String, String)> {
    let doc = Html::parse_document(body);
    let text = first_text(&doc, ".tweet-content")?;
    let author = first_text(&doc, ".fullname").unwrap_or_else(|| username.to_string());
    Some((text, author))
}

#[async_trait]
impl ExtractStrategy for MirrorStrategy {
    fn name(&self) -> &'static str {
        "mirror"
    }

    async fn attempt(&self, url: &str) -> Result<SourcePost, ExtractError> {
        let path = parse_status_path(url).ok_or(ExtractError::UnparseableUrl)?;

        for host in &self.hosts {
            match self.fetch_host(host, &path).await {
                Ok(body) => match parse_mirror_html(&body, &path.username) {
                    Some((text, author)) => {
                        return Ok(SourcePost {
                            text,
                            author,
                            url: url.to_string(),
                            note: None,
                        });
                    }
                    None => warn!(%host, "mirror page had no post content"),
                },
                Err(e) => warn!(%host, error = %e, "mirror host failed"),
            }
        }

        Err(ExtractError::AllMirrorsFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_page_selectors() {
        let body = r#"<html><body>
            <a class="fullname">Fabrizio Romano</a>
            <div class="tweet-content media-body">Here we go!  Done deal.</div>
        </body></html>"#;
        let (text, author) = parse_mirror_html(body, "FabrizioRomano").unwrap();
        assert_eq!(text, "Here we go! Done deal.");
        assert_eq!(author, "Fabrizio Romano");
    }

    #[test]
    fn only_the_main_post_is_read() {
        let body = r#"
            <div class="main-tweet"><a class="fullname">Fabrizio Romano</a>
              <div class="tweet-content">Here we go!</div></div>
            <div class="replies"><a class="fullname">Random Fan</a>
              <div class="tweet-content">source?</div></div>
        "#;
        let (text, author) = parse_mirror_html(body, "FabrizioRomano").unwrap();
        assert_eq!(text, "Here we go!");
        assert_eq!(author, "Fabrizio Romano");
    }

    #[test]
    fn author_falls_back_to_handle() {
        let body = r#"<div class="tweet-content">Medical booked</div>"#;
        let (_, author) = parse_mirror_html(body, "someone").unwrap();
        assert_eq!(author, "someone");
    }

    #[tokio::test]
    async fn unparseable_url_fails_without_network() {
        let s = MirrorStrategy::new(
            reqwest::Client::new(),
            "http".into(),
            vec!["127.0.0.1:1".into()],
            Duration::from_millis(50),
        );
        let err = s.attempt("https://twitter.com/user").await.unwrap_err();
        assert!(matches!(err, ExtractError::UnparseableUrl));
    }
}
