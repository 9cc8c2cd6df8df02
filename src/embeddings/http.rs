use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::EmbeddingProvider;
use crate::core::config::EmbeddingSettings;
use crate::core::errors::RagError;

/// Embedding client for OpenAI-compatible `/v1/embeddings` servers
/// (LM Studio, Ollama's OpenAI shim, hosted endpoints).
pub struct HttpEmbeddingProvider {
    base_url: String,
    model: String,
    dimension: usize,
    client: Client,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

impl HttpEmbeddingProvider {
    pub fn new(settings: &EmbeddingSettings) -> Result<Self, RagError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| RagError::Transport(err.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            dimension: settings.dimension,
            client,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/embeddings", self.base_url);
        let body = json!({
            "model": self.model,
            "input": texts,
        });

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| RagError::Transport(err.to_string()))?;

        if !res.status().is_success() {
            return Err(RagError::Embedding(format!(
                "embedding endpoint returned {}",
                res.status()
            )));
        }

        let payload: EmbeddingsResponse = res
            .json()
            .await
            .map_err(|err| RagError::Embedding(err.to_string()))?;

        let mut rows = payload.data;
        rows.sort_by_key(|row| row.index);

        if rows.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "asked for {} embeddings, got {}",
                texts.len(),
                rows.len()
            )));
        }
        for row in &rows {
            if row.embedding.len() != self.dimension {
                return Err(RagError::Embedding(format!(
                    "expected {}-dimensional embedding, got {}",
                    self.dimension,
                    row.embedding.len()
                )));
            }
        }

        Ok(rows.into_iter().map(|row| row.embedding).collect())
    }
}
