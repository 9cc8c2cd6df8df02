//! Grounding-prompt assembly.

/// Character budget for the combined context block.
pub const MAX_CONTEXT_CHARS: usize = 1500;

/// Join retrieved passages with single spaces and cap the result at
/// [`MAX_CONTEXT_CHARS`] characters, marking any truncation with an
/// ellipsis.
pub fn combine_context(context_docs: &[String]) -> String {
    let joined = context_docs.join(" ");
    if joined.chars().count() <= MAX_CONTEXT_CHARS {
        return joined;
    }
    let truncated: String = joined.chars().take(MAX_CONTEXT_CHARS).collect();
    format!("{truncated}...")
}

/// Render the grounding prompt: the model must answer strictly from the
/// supplied context and reply as JSON with `answer` and `basis` (exact
/// quotes) fields.
pub fn build_prompt(query: &str, context_docs: &[String]) -> String {
    let combined_context = combine_context(context_docs);

    format!(
        r#"You are an AI-based Indian Law Advisor that provides accurate legal information strictly based on the provided context.
Your responses must be in JSON format containing:
1. 'answer' - Clear legal advice based on context.
2. 'basis' - Array of EXACT QUOTES from provided context that form the foundation of the answer.

Context: {combined_context}

User Query: {query}

Expected Response Format:
{{
  "answer": "Your legal advice...",
  "basis": [
    "Exact quote 1 from context...",
    "Exact quote 2 from context..."
  ]
}}
-Important
 1. you must provide response in the valid JSON format.
 2. give exact quotes of laws as the basis of the answer."#
    )
}
