// src/extract/html.rs
//! Selector helpers over parsed HTML. `scraper::Html` is not `Send`, so these stay
//! synchronous and are called after the response body has been read.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Decode leftover entities, collapse whitespace, trim.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    RE_WS.replace_all(&decoded, " ").trim().to_string()
}

/// Concatenated text of every element matching `selector`; `None` when empty.
pub fn all_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let joined: String = doc.select(&sel).flat_map(|el| el.text()).collect();
    non_empty(normalize_text(&joined))
}

/// Text of the first element matching `selector`; `None` when empty.
pub fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let el = doc.select(&sel).next()?;
    let text: String = el.text().collect();
    non_empty(normalize_text(&text))
}

/// First selector (in order) that yields non-empty text.
pub fn first_match(doc: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|s| first_text(doc, s))
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
