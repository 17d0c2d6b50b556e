// src/analyze/mod.rs
//! Analysis stage: prompt building, the completion client, and normalization of
//! the model's free-text reply into a bounded, structured result.

pub mod citations;
pub mod completion;
pub mod normalize;
pub mod prompt;
pub mod scoring;

use serde::{Deserialize, Serialize};

// Re-export convenient types.
pub use crate::analyze::citations::{scan_citations, CitationRule, CitationScan, CITATION_RULES};
pub use crate::analyze::completion::{
    build_client_from_config, ClaudeProvider, CompletionClient, CompletionRequest,
    DynCompletionClient, MockCompletion,
};
pub use crate::analyze::normalize::{
    normalize, parse_heuristic, parse_strict, Normalized, HEURISTIC_REASONING,
};
pub use crate::analyze::prompt::build_prompt;
pub use crate::analyze::scoring::{clamp_score, label_for, quality_for, ReliabilityLabel};

pub const DEFAULT_SCORE: u8 = 50;
pub const DEFAULT_REASONING: &str = "Analysis completed but limited reasoning provided.";
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LanguageConfidence {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl LanguageConfidence {
    /// Lenient: case-insensitive, trimmed; anything else is `Unknown`.
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SourceQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    #[default]
    Unknown,
}

impl SourceQuality {
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "excellent" => Self::Excellent,
            "good" => Self::Good,
            "fair" => Self::Fair,
            "poor" => Self::Poor,
            _ => Self::Unknown,
        }
    }
}

/// Normalized model verdict. `reliability_score` is always within [0,100].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub journalist_tier: String,
    pub language_confidence: LanguageConfidence,
    pub source_quality: SourceQuality,
    pub reliability_score: u8,
    pub citation_bonus: u32,
    pub citations_found: Vec<String>,
    pub reasoning: String,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self {
            journalist_tier: UNKNOWN.to_string(),
            language_confidence: LanguageConfidence::Unknown,
            source_quality: SourceQuality::Unknown,
            reliability_score: DEFAULT_SCORE,
            citation_bonus: 0,
            citations_found: Vec::new(),
            reasoning: DEFAULT_REASONING.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_enum_labels() {
        assert_eq!(LanguageConfidence::from_label(" HIGH "), LanguageConfidence::High);
        assert_eq!(
            LanguageConfidence::from_label("High/Medium"),
            LanguageConfidence::Unknown
        );
        assert_eq!(SourceQuality::from_label("good"), SourceQuality::Good);
        assert_eq!(SourceQuality::from_label(""), SourceQuality::Unknown);
    }

    #[test]
    fn defaults_match_contract() {
        let d = AnalysisResult::default();
        assert_eq!(d.reliability_score, 50);
        assert_eq!(d.journalist_tier, "Unknown");
        assert!(d.citations_found.is_empty());
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["language_confidence"], "Unknown");
        assert_eq!(v["source_quality"], "Unknown");
    }
}
