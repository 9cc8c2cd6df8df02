use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::LlmClient;
use super::types::SamplingConfig;
use crate::core::config::LlmSettings;
use crate::core::errors::RagError;

/// Chat-completions client for OpenRouter (or any OpenAI-compatible host).
pub struct OpenRouterClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenRouterClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, RagError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| RagError::Transport(err.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            client,
        })
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String, RagError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": sampling.temperature,
            "max_tokens": sampling.max_tokens,
            "top_p": sampling.top_p,
            "frequency_penalty": 0,
            "presence_penalty": 0,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| RagError::Transport(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(RagError::Upstream(format!("{status}: {detail}")));
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|err| RagError::Upstream(err.to_string()))?;

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RagError::Upstream("unexpected response format".to_string()))
    }
}
