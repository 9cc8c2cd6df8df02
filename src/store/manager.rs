//! Dual-namespace vector store facade.
//!
//! Owns the "system" corpus (the shared knowledge base) and the "user"
//! corpus (per-deployment context supplied at chat time). One namespace
//! failing never takes the other down.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::core::errors::RagError;
use crate::embeddings::EmbeddingProvider;
use crate::store::corpus::CorpusStore;

pub struct VectorStoreManager {
    system: CorpusStore,
    user: CorpusStore,
}

impl VectorStoreManager {
    pub fn open(dir: &Path, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self, RagError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            system: CorpusStore::open(dir, "system", embedder.clone()),
            user: CorpusStore::open(dir, "user", embedder),
        })
    }

    #[cfg(test)]
    pub(crate) fn from_parts(system: CorpusStore, user: CorpusStore) -> Self {
        Self { system, user }
    }

    pub async fn add_documents(&self, texts: &[String]) -> Result<usize, RagError> {
        self.system.add(texts).await
    }

    pub async fn add_user_documents(&self, texts: &[String]) -> Result<usize, RagError> {
        self.user.add(texts).await
    }

    /// Search both namespaces independently and concatenate: system hits
    /// first (ranked), then user hits (ranked). There is deliberately no
    /// re-ranking across namespaces. A failing namespace contributes
    /// nothing; the other one still answers.
    pub async fn search(&self, query: &str, k: usize) -> Vec<String> {
        let (system, user) = tokio::join!(self.system.search(query, k), self.user.search(query, k));

        let mut merged = hits_or_empty(system, self.system.namespace());
        merged.extend(hits_or_empty(user, self.user.namespace()));
        merged
    }

    pub async fn get_document_count(&self) -> usize {
        self.system.count().await
    }

    pub async fn get_user_document_count(&self) -> usize {
        self.user.count().await
    }

    /// Clear both namespaces. Both are attempted even when the first fails;
    /// the first error is reported.
    pub async fn clear(&self) -> Result<(), RagError> {
        let system = self.system.clear().await;
        let user = self.user.clear().await;
        system.and(user)
    }
}

fn hits_or_empty(result: Result<Vec<String>, RagError>, namespace: &str) -> Vec<String> {
    match result {
        Ok(hits) => hits,
        Err(err) => {
            tracing::warn!("search failed for namespace '{}': {}", namespace, err);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::store::testutil::MockEmbedder;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn manager_in(dir: &Path) -> VectorStoreManager {
        VectorStoreManager::open(dir, Arc::new(MockEmbedder::new(2))).expect("open")
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let dir = tempdir().expect("tempdir");
        let manager = manager_in(dir.path());

        manager
            .add_user_documents(&texts(&["user context"]))
            .await
            .expect("add user");

        assert_eq!(manager.get_document_count().await, 0);
        assert_eq!(manager.get_user_document_count().await, 1);

        manager
            .add_documents(&texts(&["statute text"]))
            .await
            .expect("add system");
        assert_eq!(manager.get_document_count().await, 1);
        assert_eq!(manager.get_user_document_count().await, 1);
    }

    #[tokio::test]
    async fn merge_keeps_system_hits_before_user_hits() {
        let dir = tempdir().expect("tempdir");
        let manager = manager_in(dir.path());

        // Length-based mock embeddings. Query "xx" (len 2): s1 at distance 1,
        // s2 at distance 16, u1 at distance 4. u1 is closer than s2 and must
        // still come last.
        manager
            .add_documents(&texts(&["abc", "abcdef"]))
            .await
            .expect("add system");
        manager
            .add_user_documents(&texts(&["abcd"]))
            .await
            .expect("add user");

        let hits = manager.search("xx", 3).await;
        assert_eq!(hits, texts(&["abc", "abcdef", "abcd"]));
    }

    #[tokio::test]
    async fn one_failing_namespace_does_not_break_the_other() {
        let dir = tempdir().expect("tempdir");
        let system_embedder = Arc::new(MockEmbedder::new(2));
        let user_embedder = Arc::new(MockEmbedder::new(2));

        let system = CorpusStore::open(dir.path(), "system", system_embedder.clone());
        let user = CorpusStore::open(dir.path(), "user", user_embedder);
        let manager = VectorStoreManager::from_parts(system, user);

        manager
            .add_documents(&texts(&["system doc"]))
            .await
            .expect("add system");
        manager
            .add_user_documents(&texts(&["user doc"]))
            .await
            .expect("add user");

        // The system namespace now fails at query-embedding time.
        system_embedder.fail_next();
        let hits = manager.search("probe", 3).await;
        assert_eq!(hits, texts(&["user doc"]));
    }

    #[tokio::test]
    async fn clear_empties_both_namespaces() {
        let dir = tempdir().expect("tempdir");
        let manager = manager_in(dir.path());

        manager
            .add_documents(&texts(&["a", "b"]))
            .await
            .expect("add system");
        manager
            .add_user_documents(&texts(&["c"]))
            .await
            .expect("add user");

        manager.clear().await.expect("clear");
        assert_eq!(manager.get_document_count().await, 0);
        assert_eq!(manager.get_user_document_count().await, 0);
        assert!(!dir.path().join("system_index.bin").exists());
        assert!(!dir.path().join("user_index.bin").exists());
    }
}
