use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Domain failures across ingestion, retrieval and generation.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
    #[error("document extraction failed: {0}")]
    Extraction(String),
    #[error("embedding failed: {0}")]
    Embedding(String),
    #[error("index corrupted: {0}")]
    IndexCorruption(String),
    #[error("llm transport failure: {0}")]
    Transport(String),
    #[error("llm upstream error: {0}")]
    Upstream(String),
    #[error("malformed answer: {0}")]
    MalformedAnswer(String),
    #[error("persistence error: {0}")]
    Persistence(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::UnsupportedFormat(_) | RagError::Extraction(_) => {
                ApiError::BadRequest(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
