//! Embedding provider abstraction.
//!
//! The vector store only ever sees this trait; the production implementation
//! talks to an OpenAI-compatible `/v1/embeddings` endpoint.

mod http;

pub use http::HttpEmbeddingProvider;

use async_trait::async_trait;

use crate::core::errors::RagError;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Fixed output dimension for this provider configuration.
    fn dimension(&self) -> usize;

    /// Encode a batch of texts into vectors, one per input, in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError>;
}
