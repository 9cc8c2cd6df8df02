use async_trait::async_trait;

use super::types::SamplingConfig;
use crate::core::errors::RagError;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single-turn completion for a fully rendered prompt.
    ///
    /// Fails with `Transport` for network problems and `Upstream` for
    /// non-2xx or unusable responses. Content validation beyond that is
    /// the caller's job.
    async fn complete(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String, RagError>;
}
