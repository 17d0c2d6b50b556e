// src/config/mod.rs
//! Process-wide configuration, passed explicitly into component constructors.
//!
//! Resolution order:
//! 1) `.env` (loaded by the binary via `dotenvy`)
//! 2) optional TOML overrides at `$ANALYZER_CONFIG_PATH`, else `config/analyzer.toml`
//! 3) built-in defaults
//!
//! The completion API key always comes from the environment.

pub mod completion;
pub mod extractor;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub use completion::CompletionConfig;
pub use extractor::ExtractorConfig;

pub const ENV_CONFIG_PATH: &str = "ANALYZER_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/analyzer.toml";
pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_PORT: &str = "PORT";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub completion: CompletionConfig,
    pub extractor: ExtractorConfig,
    pub port: u16,
}

/// On-disk shape. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    completion: CompletionConfig,
    extractor: ExtractorConfig,
    port: Option<u16>,
}

impl AnalyzerConfig {
    /// Config with defaults and the given API key. Handy for tests.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            completion: CompletionConfig {
                api_key: api_key.into(),
                ..CompletionConfig::default()
            },
            extractor: ExtractorConfig::default(),
            port: DEFAULT_PORT,
        }
    }

    /// Load overrides file (if any) and resolve secrets from the environment.
    /// A missing `ANTHROPIC_API_KEY` is fatal.
    pub fn from_env() -> Result<Self> {
        let file = match env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!(
                        "{ENV_CONFIG_PATH} points to non-existent path {}",
                        pb.display()
                    ));
                }
                load_file(&pb)?
            }
            Err(_) => {
                let pb = PathBuf::from(DEFAULT_CONFIG_PATH);
                if pb.exists() {
                    load_file(&pb)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Self::resolve(file)
    }

    /// Load from an explicit TOML path, then resolve secrets from the environment.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = load_file(path.as_ref())?;
        Self::resolve(file)
    }

    fn resolve(file: FileConfig) -> Result<Self> {
        let mut completion = file.completion;
        let key = completion.api_key.trim();
        if key.is_empty() || key.eq_ignore_ascii_case("env") {
            completion.api_key = env::var(ENV_API_KEY)
                .ok()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| anyhow!("{ENV_API_KEY} environment variable is required"))?;
        }
        completion.sanitize();

        let mut extractor = file.extractor;
        extractor.sanitize();

        let port = env::var(ENV_PORT)
            .ok()
            .and_then(|p| p.trim().parse::<u16>().ok())
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            completion,
            extractor,
            port,
        })
    }
}

fn load_file(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading analyzer config from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
