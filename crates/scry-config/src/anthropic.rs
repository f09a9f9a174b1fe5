//! Anthropic Messages API configuration.

use serde::{Deserialize, Serialize};

fn default_model() -> String {
    "claude-sonnet-4-5".to_string()
}

const fn default_max_tokens() -> u32 {
    800
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnthropicConfig {
    /// API key. Required for the digest pipeline; fatal when missing.
    #[serde(default)]
    pub api_key: String,

    /// Model used for cluster labeling and digest composition.
    #[serde(default = "default_model")]
    pub model: String,

    /// Completion token cap per request.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl AnthropicConfig {
    /// Check whether LLM calls can be made.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}
