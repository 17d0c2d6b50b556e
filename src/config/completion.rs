// src/config/completion.rs
use serde::{Deserialize, Serialize};

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}
fn default_max_tokens() -> u32 {
    1500
}
fn default_temperature() -> f32 {
    0.1
}
fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// "ENV" (or empty) means: read from ANTHROPIC_API_KEY
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Low randomness keeps the JSON reply shape stable.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CompletionConfig {
    pub(crate) fn sanitize(&mut self) {
        if !self.temperature.is_finite() {
            self.temperature = default_temperature();
        }
        self.temperature = self.temperature.clamp(0.0, 1.0);
        if self.max_tokens == 0 {
            self.max_tokens = default_max_tokens();
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = default_timeout_secs();
        }
        if self.model.trim().is_empty() {
            self.model = default_model();
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            self.base_url = default_base_url();
        }
    }
}
