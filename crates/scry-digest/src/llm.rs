//! Anthropic Messages API client (HTTP direct, no SDK).

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use scry_config::{AnthropicConfig, ConfigError};

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Sampling temperature for editorial output.
const TEMPERATURE: f64 = 0.4;

/// Errors from language model calls.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The response carried no text content.
    #[error("empty completion")]
    EmptyResponse,
}

/// Seam for text completion, so pipeline tests run without network.
pub trait Composer {
    /// Complete `prompt` under `system`, returning the text of the first
    /// content block.
    fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic Messages API client.
pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when the API key is missing —
    /// fatal at first use, not retried.
    pub fn new(config: &AnthropicConfig) -> Result<Self, ConfigError> {
        if !config.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "anthropic".to_string(),
            });
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let mut key = reqwest::header::HeaderValue::from_str(&config.api_key).map_err(|_| {
            ConfigError::InvalidValue {
                field: "anthropic.api_key".to_string(),
                reason: "not a valid header value".to_string(),
            }
        })?;
        key.set_sensitive(true);
        headers.insert("x-api-key", key);
        headers.insert(
            "anthropic-version",
            reqwest::header::HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent("scry/0.1")
                .default_headers(headers)
                .build()
                .expect("reqwest client should build"),
            base_url: ANTHROPIC_API_BASE.to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

impl Composer for AnthropicClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let resp = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .json(&json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "temperature": TEMPERATURE,
                "system": system,
                "messages": [{"role": "user", "content": prompt}],
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(LlmError::Api {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let body: MessagesResponse = resp.json().await?;
        body.content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or(LlmError::EmptyResponse)
    }
}
