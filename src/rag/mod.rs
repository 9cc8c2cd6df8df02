//! RAG orchestration: grounding-prompt assembly and answer validation.

mod engine;
mod prompt;

pub use engine::{
    RagEngine, INVALID_CONTEXT_MESSAGE, MISSING_KEYS_MESSAGE, NOT_JSON_MESSAGE, NO_CONTEXT_MESSAGE,
};
pub use prompt::{build_prompt, combine_context, MAX_CONTEXT_CHARS};
