// src/error.rs
//! Error taxonomy. Only `AnalyzeError` ever reaches the HTTP layer; extraction and
//! completion errors are either recovered locally or wrapped into it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Request-level failure.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Bad input URL; user-fixable.
    #[error("{0}")]
    Validation(String),
    /// Upstream completion-service failure; message passed through.
    #[error("{0}")]
    Service(String),
}

impl AnalyzeError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalyzeError::Validation(_) => StatusCode::BAD_REQUEST,
            AnalyzeError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.to_string();
        let msg = if msg.trim().is_empty() {
            "Failed to analyze tweet".to_string()
        } else {
            msg
        };
        (status, Json(json!({ "error": msg }))).into_response()
    }
}

/// Why a single extraction strategy gave up. Recorded, never surfaced.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("no post content found")]
    EmptyContent,
    #[error("could not extract post id or username")]
    UnparseableUrl,
    #[error("all mirror hosts failed")]
    AllMirrorsFailed,
}

/// Text-completion transport failure.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("missing API key")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion API error ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("no text block in completion response")]
    NoText,
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(
            AnalyzeError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AnalyzeError::Service("down".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
