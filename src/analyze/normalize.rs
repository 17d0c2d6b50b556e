//! Normalization of the completion reply.
//!
//! The model is asked for strict JSON but does not always comply, so there are two
//! pure passes over the text:
//! - `parse_strict`: fence stripping + first-`{`-to-last-`}` JSON parse
//! - `parse_heuristic`: regular-pattern extraction plus the citation table
//!
//! `normalize` runs the first and degrades to the second; it never fails.

use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::citations::scan_citations;
use super::scoring::{clamp_score, clamp_score_value, leading_int, quality_for};
use super::{
    AnalysisResult, LanguageConfidence, SourceQuality, DEFAULT_REASONING, DEFAULT_SCORE, UNKNOWN,
};

/// Outcome of the strict pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Parsed(AnalysisResult),
    /// Reason the strict pass gave up; the heuristic pass takes over.
    NeedsHeuristic(String),
}

/// Every field optional and loosely typed; the model is not trusted to follow the schema.
#[derive(Debug, Default)]
struct WireAnalysis {
    journalist_tier: Option<Value>,
    language_confidence: Option<Value>,
    source_quality: Option<Value>,
    reliability_score: Option<Value>,
    citation_bonus: Option<Value>,
    citations_found: Option<Value>,
    reasoning: Option<Value>,
}

impl WireAnalysis {
    /// Read from a generic object so a repeated key keeps its last value.
    fn from_map(mut m: Map<String, Value>) -> Self {
        Self {
            journalist_tier: m.remove("journalist_tier"),
            language_confidence: m.remove("language_confidence"),
            source_quality: m.remove("source_quality"),
            reliability_score: m.remove("reliability_score"),
            citation_bonus: m.remove("citation_bonus"),
            citations_found: m.remove("citations_found"),
            reasoning: m.remove("reasoning"),
        }
    }
}

static RE_FENCE_JSON: Lazy<Regex> = Lazy::new(|| Regex::new(r"```json\s*").expect("fence regex"));
static RE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\s*").expect("fence regex"));

/// Filler reasoning when the heuristic pass gets an empty reply.
pub const HEURISTIC_REASONING: &str = "Manual analysis completed with extracted information.";

/// Ordered score patterns; first match wins.
static SCORE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)reliability_score['":\s]*(\d+)"#,
        r#"(?i)score['":\s]*(\d+)"#,
        r"(\d+)/100",
        r"(?i)(\d+)\s*points?",
        r"(?i)rate.*?(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("score pattern"))
    .collect()
});

static RE_TIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)tier\s*(\d+|one|two|three|four|five)").expect("tier regex")
});

/// Trim and drop Markdown code fences.
pub(crate) fn strip_fences(raw: &str) -> String {
    let s = RE_FENCE_JSON.replace_all(raw.trim(), "");
    RE_FENCE.replace_all(&s, "").into_owned()
}

/// Greedy first `{` to last `}`.
pub(crate) fn json_candidate(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let end = s.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&s[start..=end])
}

pub fn parse_strict(raw: &str) -> Normalized {
    let clean = strip_fences(raw);
    let Some(candidate) = json_candidate(&clean) else {
        return Normalized::NeedsHeuristic("no json object found".to_string());
    };

    let wire = match serde_json::from_str::<Map<String, Value>>(candidate) {
        Ok(m) => WireAnalysis::from_map(m),
        Err(e) => return Normalized::NeedsHeuristic(format!("invalid json: {e}")),
    };

    Normalized::Parsed(from_wire(wire))
}

fn from_wire(w: WireAnalysis) -> AnalysisResult {
    let journalist_tier = match w.journalist_tier {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => UNKNOWN.to_string(),
    };

    let language_confidence = match &w.language_confidence {
        Some(Value::String(s)) => LanguageConfidence::from_label(s),
        _ => LanguageConfidence::Unknown,
    };

    let source_quality = match &w.source_quality {
        Some(Value::String(s)) => SourceQuality::from_label(s),
        _ => SourceQuality::Unknown,
    };

    let reliability_score = match &w.reliability_score {
        None | Some(Value::Null) => DEFAULT_SCORE,
        Some(v) => clamp_score_value(v),
    };

    let citation_bonus = match &w.citation_bonus {
        Some(Value::Number(n)) => n.as_f64().map(non_negative).unwrap_or(0),
        Some(Value::String(s)) => leading_int(s).map(non_negative).unwrap_or(0),
        _ => 0,
    };

    let citations_found = match w.citations_found {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    };

    let reasoning = match w.reasoning {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        _ => DEFAULT_REASONING.to_string(),
    };

    AnalysisResult {
        journalist_tier,
        language_confidence,
        source_quality,
        reliability_score,
        citation_bonus,
        citations_found,
        reasoning,
    }
}

fn non_negative(x: f64) -> u32 {
    if x.is_nan() || x < 0.0 {
        0
    } else if x > u32::MAX as f64 {
        u32::MAX
    } else {
        x.trunc() as u32
    }
}

/// Pattern-based extraction for replies that are not valid JSON.
pub fn parse_heuristic(raw: &str) -> AnalysisResult {
    let base = SCORE_PATTERNS
        .iter()
        .find_map(|re| {
            re.captures(raw)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
        })
        .unwrap_or(DEFAULT_SCORE as f64);

    let journalist_tier = RE_TIER
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| format!("Tier {}", m.as_str()))
        .unwrap_or_else(|| UNKNOWN.to_string());

    let scan = scan_citations(raw);
    let boosted = if scan.total_boost > 0 {
        (base + scan.total_boost as f64).min(100.0)
    } else {
        base
    };
    let reliability_score = clamp_score(boosted);

    let reasoning = if raw.is_empty() {
        HEURISTIC_REASONING.to_string()
    } else {
        raw.to_string()
    };

    AnalysisResult {
        journalist_tier,
        language_confidence: LanguageConfidence::Unknown,
        source_quality: quality_for(reliability_score),
        reliability_score,
        citation_bonus: scan.total_boost,
        citations_found: scan.labels,
        reasoning,
    }
}

/// Strict parse first, heuristic extraction otherwise.
pub fn normalize(raw: &str) -> AnalysisResult {
    match parse_strict(raw) {
        Normalized::Parsed(result) => {
            counter!("normalize_path_total", "path" => "strict").increment(1);
            info!(score = result.reliability_score, "parsed structured reply");
            result
        }
        Normalized::NeedsHeuristic(reason) => {
            counter!("normalize_path_total", "path" => "heuristic").increment(1);
            info!(%reason, "falling back to heuristic parsing");
            let result = parse_heuristic(raw);
            debug!(
                score = result.reliability_score,
                citations = ?result.citations_found,
                "heuristic parse result"
            );
            result
        }
    }
}
