use crate::config::ModelConfig;
use async_trait::async_trait;
use mindloop_core::{MindloopError, MindloopResult};

/// External text-generation service.
///
/// Asynchronous, fallible, unbounded latency unless externally timed out —
/// callers go through [`crate::GatedBackend`], never this trait directly.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Generates a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> MindloopResult<String>;
}

/// OpenAI-compatible chat-completions backend.
///
/// Works with OpenAI and any provider implementing the same API surface
/// (configure the base URL in [`ModelConfig`]).
pub struct OpenAiBackend {
    config: ModelConfig,
    http: reqwest::Client,
}

impl OpenAiBackend {
    /// Creates a client for the given configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TextBackend for OpenAiBackend {
    async fn generate(&self, prompt: &str) -> MindloopResult<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());

        let body = serde_json::json!({
            "model": self.config.model_id,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [{"role": "user", "content": prompt}],
        });

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| MindloopError::Backend(e.to_string()))?;

        let status = resp.status();
        let resp_body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| MindloopError::Backend(e.to_string()))?;

        if !status.is_success() {
            return Err(MindloopError::Backend(format!(
                "API error {status}: {resp_body}"
            )));
        }

        resp_body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                MindloopError::Backend(format!("Response missing content: {resp_body}"))
            })
    }
}
