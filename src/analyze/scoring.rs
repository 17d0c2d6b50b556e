//! Scoring policy: score clamping and the score → label / quality thresholds.
//!
//! Thresholds are inclusive on the lower bound and evaluated highest-first:
//! - 90 → Highly Reliable / Excellent
//! - 70 → Reliable / Good
//! - 50 → Partially Reliable / Fair
//! - 30 → Not Reliable (quality stays Poor below 50)
//! - else Garbage

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::SourceQuality;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReliabilityLabel {
    #[serde(rename = "Highly Reliable")]
    HighlyReliable,
    #[serde(rename = "Reliable")]
    Reliable,
    #[serde(rename = "Partially Reliable")]
    PartiallyReliable,
    #[serde(rename = "Not Reliable")]
    NotReliable,
    #[serde(rename = "Garbage")]
    Garbage,
}

impl ReliabilityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReliabilityLabel::HighlyReliable => "Highly Reliable",
            ReliabilityLabel::Reliable => "Reliable",
            ReliabilityLabel::PartiallyReliable => "Partially Reliable",
            ReliabilityLabel::NotReliable => "Not Reliable",
            ReliabilityLabel::Garbage => "Garbage",
        }
    }
}

impl fmt::Display for ReliabilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// NaN or negative → 0, above 100 → 100, otherwise truncated.
pub fn clamp_score(x: f64) -> u8 {
    if x.is_nan() || x < 0.0 {
        return 0;
    }
    if x > 100.0 {
        return 100;
    }
    x.trunc() as u8
}

static RE_INT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("int prefix regex"));

/// Leading integer of a string ("85/100" → 85), like a lenient integer parse.
pub(crate) fn leading_int(s: &str) -> Option<f64> {
    RE_INT_PREFIX
        .captures(s)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Clamp a loosely-typed JSON value. Non-numeric values score 0.
pub fn clamp_score_value(v: &Value) -> u8 {
    match v {
        Value::Number(n) => n.as_f64().map(clamp_score).unwrap_or(0),
        Value::String(s) => leading_int(s).map(clamp_score).unwrap_or(0),
        _ => 0,
    }
}

pub fn label_for(score: u8) -> ReliabilityLabel {
    match score {
        90.. => ReliabilityLabel::HighlyReliable,
        70..=89 => ReliabilityLabel::Reliable,
        50..=69 => ReliabilityLabel::PartiallyReliable,
        30..=49 => ReliabilityLabel::NotReliable,
        _ => ReliabilityLabel::Garbage,
    }
}

pub fn quality_for(score: u8) -> SourceQuality {
    match score {
        90.. => SourceQuality::Excellent,
        70..=89 => SourceQuality::Good,
        50..=69 => SourceQuality::Fair,
        _ => SourceQuality::Poor,
    }
}
