use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::config::{AppPaths, Settings};
use crate::embeddings::{EmbeddingProvider, HttpEmbeddingProvider};
use crate::extract::{DocumentExtractor, PlainTextExtractor};
use crate::llm::{LlmClient, OpenRouterClient, SamplingConfig};
use crate::rag::RagEngine;
use crate::seed;
use crate::store::VectorStoreManager;

#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Settings,
    pub store: Arc<VectorStoreManager>,
    pub engine: Arc<RagEngine>,
    pub extractor: Arc<dyn DocumentExtractor>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn initialize() -> anyhow::Result<Arc<Self>> {
        let paths = Arc::new(AppPaths::new());
        let settings = Settings::load(&paths)?;

        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(HttpEmbeddingProvider::new(&settings.embedding)?);
        let store = Arc::new(VectorStoreManager::open(&paths.store_dir, embedder)?);

        let llm: Arc<dyn LlmClient> = Arc::new(OpenRouterClient::new(&settings.llm)?);
        let engine = Arc::new(RagEngine::new(llm, SamplingConfig::from(&settings.llm)));

        let started_at = Utc::now();

        Ok(Arc::new(AppState {
            paths,
            settings,
            store,
            engine,
            extractor: Arc::new(PlainTextExtractor),
            started_at,
        }))
    }

    /// Seed the system namespace with the bundled sample corpus when it is
    /// empty. Failures only log; an unreachable embedding endpoint at boot
    /// must not stop the server from coming up.
    pub async fn seed_if_empty(&self) {
        if self.store.get_document_count().await > 0 {
            return;
        }
        match self.store.add_documents(&seed::seed_documents()).await {
            Ok(count) => tracing::info!("seeded knowledge base with {} sample documents", count),
            Err(err) => tracing::warn!("failed to seed knowledge base: {}", err),
        }
    }
}
