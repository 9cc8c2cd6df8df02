use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{chat, health, knowledge};
use crate::state::AppState;

/// Main application router: health, knowledge-base ingestion, chat and
/// stats, with permissive CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/knowledge-base",
            post(knowledge::upload_knowledge_base).delete(knowledge::clear_knowledge_base),
        )
        .route("/api/chat", post(chat::chat))
        .route("/api/stats", get(knowledge::stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}
