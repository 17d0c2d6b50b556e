//! Citation rules: textual cues that a post cites a credible source.
//!
//! Evaluated in declaration order; every matching rule adds its boost, with no
//! de-duplication between overlapping rules (an "official" cue and a tier-1
//! journalist cue can both fire on the same text).

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct CitationRule {
    pub pattern: Regex,
    pub boost: u32,
    pub label: &'static str,
}

/// (pattern, boost, label). Patterns are compiled case-insensitive.
const RULE_TABLE: &[(&str, u32, &str)] = &[
    // Official sources
    (r"@(?-u:\w)+\s*(official|confirms?|announces?)", 25, "Official Source"),
    (r"official[ly]?\s+(announcement|confirmation)", 25, "Official Announcement"),
    // Tier 1 journalists
    (r"(according to|reports?|via|per)\s*@?fabrizio\s*romano", 20, "Fabrizio Romano"),
    (r"(according to|reports?|via|per)\s*@?david[\s_]ornstein", 20, "David Ornstein"),
    (r"(according to|reports?|via|per)\s*@?di\s*marzio", 20, "Di Marzio"),
    // News outlets
    (r"(sky sports?|bbc sport|the athletic)\s*(reports?|says?|confirms?)", 15, "Major Outlet"),
    (r"(espn|goal\.com|transfer guru)\s*(reports?|says?)", 10, "Sports Outlet"),
    // Direct quotes / sources
    (r"sources?\s+(confirm|tell|say)", 10, "Source Citation"),
    (r"(breaking|exclusive):", 5, "Breaking News"),
];

pub static CITATION_RULES: Lazy<Vec<CitationRule>> = Lazy::new(|| {
    RULE_TABLE
        .iter()
        .map(|(pat, boost, label)| CitationRule {
            pattern: Regex::new(&format!("(?i){pat}")).expect("citation rule regex"),
            boost: *boost,
            label: *label,
        })
        .collect()
});

/// Summed boost plus matched labels in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationScan {
    pub total_boost: u32,
    pub labels: Vec<String>,
}

pub fn scan_citations(text: &str) -> CitationScan {
    scan_with(&CITATION_RULES, text)
}

pub fn scan_with(rules: &[CitationRule], text: &str) -> CitationScan {
    let mut out = CitationScan::default();
    for rule in rules {
        if rule.pattern.is_match(text) {
            out.total_boost = out.total_boost.saturating_add(rule.boost);
            out.labels.push(rule.label.to_string());
            tracing::debug!(label = rule.label, boost = rule.boost, "citation matched");
        }
    }
    out
}
