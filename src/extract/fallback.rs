// src/extract/fallback.rs
use super::{username_from_url, SourcePost};

pub const FALLBACK_NOTE: &str = "Using fallback extraction for testing purposes";
pub const GENERIC_TEXT: &str = "Transfer rumor detected - analyzing reliability...";

/// A known source: handle, display name, sample post.
struct KnownSource {
    handle: &'static str,
    name: &'static str,
    sample: &'static str,
}

static KNOWN_SOURCES: &[KnownSource] = &[
    KnownSource {
        handle: "FabrizioRomano",
        name: "Fabrizio Romano",
        sample: "🚨🔵 EXCLUSIVE: Major transfer update - deal agreed and confirmed! Here we go! Full details soon... 🔴⚪",
    },
    KnownSource {
        handle: "David_Ornstein",
        name: "David Ornstein",
        sample: "BREAKING: Sources confirm significant transfer development. Details emerging...",
    },
    KnownSource {
        handle: "DiMarzio",
        name: "Gianluca Di Marzio",
        sample: "Transfer market update: Important negotiations underway...",
    },
];

/// Last link in the chain. Always produces a post tagged with [`FALLBACK_NOTE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticFallback;

impl SyntheticFallback {
    pub fn name(&self) -> &'static str {
        "fallback"
    }

    pub fn build(&self, url: &str) -> SourcePost {
        let username = username_from_url(url);
        let known = username
            .as_deref()
            .and_then(|u| KNOWN_SOURCES.iter().find(|k| k.handle.eq_ignore_ascii_case(u)));

        let (text, author) = match known {
            Some(k) => (k.sample.to_string(), k.name.to_string()),
            None => (
                GENERIC_TEXT.to_string(),
                username.unwrap_or_else(|| "Unknown".to_string()),
            ),
        };

        SourcePost {
            text,
            author,
            url: url.to_string(),
            note: Some(FALLBACK_NOTE.to_string()),
        }
    }
}
