use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::extract::DocumentFormat;
use crate::state::AppState;

/// Upload a batch of documents into the system namespace.
///
/// Every file is extracted before anything is stored, so an unsupported
/// or unreadable file rejects the whole batch with 400 and the store is
/// untouched. Extraction succeeding, the texts go in as one batched add.
pub async fn upload_knowledge_base(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut texts = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(err.to_string()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::BadRequest(err.to_string()))?;

        let format = DocumentFormat::from_filename(&filename)?;
        let text = state.extractor.extract(&bytes, format)?;
        texts.push(text);
    }

    if texts.is_empty() {
        return Err(ApiError::BadRequest("no files in upload".to_string()));
    }

    let processed = state.store.add_documents(&texts).await?;
    tracing::info!("ingested {} documents into knowledge base", processed);

    Ok(Json(json!({
        "status": "Knowledge base updated",
        "documents_processed": processed,
    })))
}

pub async fn clear_knowledge_base(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.clear().await?;
    tracing::info!("knowledge base cleared");
    Ok(Json(json!({ "status": "Knowledge base cleared" })))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (document_count, user_document_count) = tokio::join!(
        state.store.get_document_count(),
        state.store.get_user_document_count(),
    );

    Json(json!({
        "document_count": document_count,
        "user_document_count": user_document_count,
    }))
}
