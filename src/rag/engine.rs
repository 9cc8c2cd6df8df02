//! Retrieval-augmented answer generation.
//!
//! The engine turns a query plus retrieved context into a grounding prompt,
//! asks the LLM for a structured JSON answer and validates it. The chat
//! contract is answer-shaped strings all the way down: every failure past
//! the HTTP boundary becomes a user-visible message, never an error.

use std::sync::Arc;

use serde::Deserialize;

use super::prompt::build_prompt;
use crate::core::errors::RagError;
use crate::llm::{LlmClient, SamplingConfig};

pub const NO_CONTEXT_MESSAGE: &str =
    "No relevant legal documents found. Please refine your query.";
pub const INVALID_CONTEXT_MESSAGE: &str = "Error: Retrieved context is empty or invalid.";
pub const NOT_JSON_MESSAGE: &str = "Error: model response is not valid JSON.";
pub const MISSING_KEYS_MESSAGE: &str = "Error: model response is missing required keys.";

/// Structured answer contract the model is instructed to follow. `basis`
/// is validated for presence but not forwarded to the caller.
#[derive(Debug, Deserialize)]
struct GroundedAnswer {
    answer: String,
    #[allow(dead_code)]
    basis: Vec<String>,
}

pub struct RagEngine {
    llm: Arc<dyn LlmClient>,
    sampling: SamplingConfig,
}

impl RagEngine {
    pub fn new(llm: Arc<dyn LlmClient>, sampling: SamplingConfig) -> Self {
        Self { llm, sampling }
    }

    /// Produce an answer grounded in `context_docs`.
    ///
    /// Empty or all-blank context short-circuits without calling the LLM.
    /// Transport and validation failures come back as fixed strings that
    /// name the failure, so callers can tell "no answer produced" apart
    /// from a successful answer.
    pub async fn generate_response(&self, query: &str, context_docs: &[String]) -> String {
        if context_docs.is_empty() {
            return NO_CONTEXT_MESSAGE.to_string();
        }
        if !context_docs.iter().any(|doc| !doc.trim().is_empty()) {
            return INVALID_CONTEXT_MESSAGE.to_string();
        }

        let prompt = build_prompt(query, context_docs);
        let raw = match self.llm.complete(&prompt, &self.sampling).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("llm request failed: {}", err);
                return format!("Error: LLM request failed: {err}");
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                let err = RagError::MalformedAnswer(format!("not valid JSON: {err}"));
                tracing::warn!("{}", err);
                return NOT_JSON_MESSAGE.to_string();
            }
        };

        match serde_json::from_value::<GroundedAnswer>(value) {
            Ok(grounded) => grounded.answer,
            Err(err) => {
                let err = RagError::MalformedAnswer(format!("missing required keys: {err}"));
                tracing::warn!("{}", err);
                MISSING_KEYS_MESSAGE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;

    struct MockLlm {
        response: Result<String, RagError>,
        calls: AtomicUsize,
    }

    impl MockLlm {
        fn returning(response: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(response.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(err: RagError) -> Arc<Self> {
            Arc::new(Self {
                response: Err(err),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for MockLlm {
        async fn complete(
            &self,
            _prompt: &str,
            _sampling: &SamplingConfig,
        ) -> Result<String, RagError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(RagError::Transport(msg)) => Err(RagError::Transport(msg.clone())),
                Err(RagError::Upstream(msg)) => Err(RagError::Upstream(msg.clone())),
                Err(other) => Err(RagError::Upstream(other.to_string())),
            }
        }
    }

    fn engine(llm: Arc<MockLlm>) -> RagEngine {
        RagEngine::new(llm, SamplingConfig::default())
    }

    #[tokio::test]
    async fn empty_context_short_circuits_without_llm_call() {
        let llm = MockLlm::returning("{}");
        let response = engine(llm.clone())
            .generate_response("query", &[])
            .await;
        assert_eq!(response, NO_CONTEXT_MESSAGE);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_context_short_circuits_without_llm_call() {
        let llm = MockLlm::returning("{}");
        let docs = vec!["   ".to_string(), "\n\t".to_string()];
        let response = engine(llm.clone()).generate_response("query", &docs).await;
        assert_eq!(response, INVALID_CONTEXT_MESSAGE);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn valid_answer_returns_only_the_answer_field() {
        let llm = MockLlm::returning(
            r#"{"answer": "Murder carries life imprisonment.", "basis": ["Section 302"]}"#,
        );
        let docs = vec!["Section 302 of IPC".to_string()];
        let response = engine(llm.clone()).generate_response("query", &docs).await;
        assert_eq!(response, "Murder carries life imprisonment.");
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn non_json_response_yields_fixed_message() {
        let llm = MockLlm::returning("I am afraid I can only answer in prose.");
        let docs = vec!["context".to_string()];
        let response = engine(llm).generate_response("query", &docs).await;
        assert_eq!(response, NOT_JSON_MESSAGE);
    }

    #[tokio::test]
    async fn json_missing_basis_yields_fixed_message() {
        let llm = MockLlm::returning(r#"{"answer": "advice without grounding"}"#);
        let docs = vec!["context".to_string()];
        let response = engine(llm).generate_response("query", &docs).await;
        assert_eq!(response, MISSING_KEYS_MESSAGE);
    }

    #[tokio::test]
    async fn transport_failure_becomes_error_string() {
        let llm = MockLlm::failing(RagError::Transport("connection refused".to_string()));
        let docs = vec!["context".to_string()];
        let response = engine(llm).generate_response("query", &docs).await;
        assert!(response.starts_with("Error: LLM request failed:"));
        assert!(response.contains("connection refused"));
    }
}
