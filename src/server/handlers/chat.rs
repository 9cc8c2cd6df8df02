use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    /// Optional inline context; persisted into the user namespace so this
    /// and later queries retrieve it through the normal search path.
    #[serde(default)]
    pub context: Option<String>,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    if let Some(context) = request
        .context
        .as_deref()
        .map(str::trim)
        .filter(|context| !context.is_empty())
    {
        state
            .store
            .add_user_documents(&[context.to_string()])
            .await?;
        tracing::debug!("added inline context to user namespace");
    }

    let retrieved = state
        .store
        .search(&request.query, state.settings.retrieval.top_k)
        .await;
    let response = state
        .engine
        .generate_response(&request.query, &retrieved)
        .await;

    Ok(Json(json!({ "response": response })))
}
