//! LLM client abstraction and the OpenRouter production implementation.

mod openrouter;
mod provider;
mod types;

pub use openrouter::OpenRouterClient;
pub use provider::LlmClient;
pub use types::SamplingConfig;
