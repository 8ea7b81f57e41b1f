use serde::{Deserialize, Serialize};

/// Configuration for the text backend client.
///
/// Any provider exposing the OpenAI chat-completions API works by pointing
/// `api_base_url` at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier sent with each request.
    pub model_id: String,
    /// Bearer token for the API.
    pub api_key: String,
    /// Base URL override; defaults to the OpenAI endpoint.
    pub api_base_url: Option<String>,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Completion token cap per request.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Upper bound on each backend call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl ModelConfig {
    /// The effective API base URL.
    pub fn base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or("https://api.openai.com")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config: ModelConfig =
            serde_json::from_str(r#"{"model_id": "gpt-4o-mini", "api_key": "sk-test"}"#).unwrap();
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.base_url(), "https://api.openai.com");
    }

    #[test]
    fn test_base_url_override() {
        let config: ModelConfig = serde_json::from_str(
            r#"{"model_id": "m", "api_key": "k", "api_base_url": "http://localhost:9999"}"#,
        )
        .unwrap();
        assert_eq!(config.base_url(), "http://localhost:9999");
    }
}
