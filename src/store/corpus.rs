//! One namespace of the knowledge base: a flat vector index paired with its
//! source texts, persisted as two artifacts on disk.
//!
//! Invariant: the number of stored texts always equals the number of indexed
//! vectors. Both are mutated together under the namespace write lock, so
//! readers never observe a torn state.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io};

use tokio::sync::RwLock;

use crate::core::errors::RagError;
use crate::embeddings::EmbeddingProvider;
use crate::index::FlatIndex;

pub struct CorpusStore {
    namespace: String,
    index_path: PathBuf,
    texts_path: PathBuf,
    embedder: Arc<dyn EmbeddingProvider>,
    state: RwLock<CorpusState>,
}

struct CorpusState {
    index: FlatIndex,
    texts: Vec<String>,
}

impl CorpusState {
    fn empty(dimension: usize) -> Self {
        Self {
            index: FlatIndex::new(dimension),
            texts: Vec::new(),
        }
    }
}

impl CorpusStore {
    /// Open the namespace under `dir`, loading persisted state when both
    /// artifacts are present. Any load failure is logged and the store
    /// starts empty instead (fail-open; the corpus can be re-ingested).
    pub fn open(dir: &Path, namespace: &str, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        let index_path = dir.join(format!("{namespace}_index.bin"));
        let texts_path = dir.join(format!("{namespace}_texts.json"));
        let dimension = embedder.dimension();

        let state = match load_state(&index_path, &texts_path, dimension) {
            Ok(Some(state)) => {
                tracing::info!(
                    "loaded {} documents for namespace '{}'",
                    state.texts.len(),
                    namespace
                );
                state
            }
            Ok(None) => {
                tracing::info!("initialized empty namespace '{}'", namespace);
                CorpusState::empty(dimension)
            }
            Err(err) => {
                tracing::warn!(
                    "failed to load namespace '{}', starting empty: {}",
                    namespace,
                    err
                );
                CorpusState::empty(dimension)
            }
        };

        Self {
            namespace: namespace.to_string(),
            index_path,
            texts_path,
            embedder,
            state: RwLock::new(state),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Add a batch of texts: embed, append vectors, append texts, persist.
    ///
    /// The whole sequence runs under the write lock so concurrent adds to
    /// the same namespace cannot interleave. An embedding or append failure
    /// commits nothing. A persist failure keeps the in-memory commit and is
    /// only logged; the caller still gets the batch count back.
    pub async fn add(&self, texts: &[String]) -> Result<usize, RagError> {
        if texts.is_empty() {
            return Ok(0);
        }

        let mut state = self.state.write().await;

        let embeddings = self.embedder.embed(texts).await?;
        if embeddings.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "asked for {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        state.index.append(&embeddings)?;
        state.texts.extend(texts.iter().cloned());

        if let Err(err) = persist(&self.index_path, &self.texts_path, &state) {
            tracing::error!(
                "failed to persist namespace '{}': {}",
                self.namespace,
                err
            );
        }

        Ok(texts.len())
    }

    /// Retrieve up to `k` texts ranked by ascending distance to the query.
    /// Positions that fall outside the text sequence are dropped.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, RagError> {
        if self.count().await == 0 {
            return Ok(Vec::new());
        }

        let mut vectors = self.embedder.embed(&[query.to_string()]).await?;
        let query_vec = vectors
            .pop()
            .ok_or_else(|| RagError::Embedding("provider returned no query vector".to_string()))?;

        let state = self.state.read().await;
        let hits = state.index.search(&query_vec, k);
        Ok(hits
            .into_iter()
            .filter_map(|(position, _)| state.texts.get(position).cloned())
            .collect())
    }

    /// Write both artifacts to disk. Serialized against adds by the write
    /// lock so two saves for one namespace never race on the same files.
    pub async fn save(&self) -> Result<(), RagError> {
        let state = self.state.write().await;
        persist(&self.index_path, &self.texts_path, &state)
    }

    /// Reset to empty and delete both artifacts. Missing files are fine.
    pub async fn clear(&self) -> Result<(), RagError> {
        let mut state = self.state.write().await;
        *state = CorpusState::empty(self.embedder.dimension());

        for path in [&self.index_path, &self.texts_path] {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    pub async fn count(&self) -> usize {
        self.state.read().await.texts.len()
    }
}

fn load_state(
    index_path: &Path,
    texts_path: &Path,
    dimension: usize,
) -> Result<Option<CorpusState>, RagError> {
    let have_index = index_path.exists();
    let have_texts = texts_path.exists();

    if !have_index && !have_texts {
        return Ok(None);
    }
    if have_index != have_texts {
        return Err(RagError::IndexCorruption(
            "artifact pair is incomplete".to_string(),
        ));
    }

    let index = FlatIndex::from_bytes(&fs::read(index_path)?)?;
    let texts: Vec<String> = serde_json::from_slice(&fs::read(texts_path)?)
        .map_err(|err| RagError::IndexCorruption(format!("text artifact unreadable: {err}")))?;

    if index.len() != texts.len() {
        return Err(RagError::IndexCorruption(format!(
            "vector count {} does not match text count {}",
            index.len(),
            texts.len()
        )));
    }
    if index.dimension() != dimension {
        return Err(RagError::IndexCorruption(format!(
            "persisted dimension {} does not match configured dimension {}",
            index.dimension(),
            dimension
        )));
    }

    Ok(Some(CorpusState { index, texts }))
}

fn persist(index_path: &Path, texts_path: &Path, state: &CorpusState) -> Result<(), RagError> {
    let texts_json = serde_json::to_vec(&state.texts)
        .map_err(|err| RagError::Persistence(io::Error::new(ErrorKind::InvalidData, err)))?;

    write_atomic(index_path, &state.index.to_bytes())?;
    write_atomic(texts_path, &texts_json)?;
    Ok(())
}

/// Write via temp file + rename. Rename is atomic on one filesystem, so a
/// crash never leaves a half-written artifact; the index/texts pair is
/// still written one file at a time.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::tempdir;

    use super::*;
    use crate::store::testutil::MockEmbedder;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn add_grows_count_by_batch_length() {
        let dir = tempdir().expect("tempdir");
        let store = CorpusStore::open(dir.path(), "system", Arc::new(MockEmbedder::new(2)));

        assert_eq!(store.count().await, 0);
        store.add(&texts(&["a", "bb", "ccc"])).await.expect("add");
        assert_eq!(store.count().await, 3);
        store.add(&[]).await.expect("empty add");
        assert_eq!(store.count().await, 3);
    }

    #[tokio::test]
    async fn embedding_failure_commits_nothing() {
        let dir = tempdir().expect("tempdir");
        let embedder = Arc::new(MockEmbedder::new(2));
        let store = CorpusStore::open(dir.path(), "system", embedder.clone());

        store.add(&texts(&["kept"])).await.expect("add");
        embedder.fail_next();
        let err = store.add(&texts(&["lost"])).await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn save_then_reopen_preserves_order_and_ranking() {
        let dir = tempdir().expect("tempdir");
        let embedder = Arc::new(MockEmbedder::new(2));

        let store = CorpusStore::open(dir.path(), "system", embedder.clone());
        // Length-based mock embeddings: distances to "xx" are 1, 4 and 36.
        store
            .add(&texts(&["abc", "honest law", "a much longer document"]))
            .await
            .expect("add");
        let before = store.search("xx", 3).await.expect("search");

        let reopened = CorpusStore::open(dir.path(), "system", embedder);
        assert_eq!(reopened.count().await, 3);
        let after = reopened.search("xx", 3).await.expect("search");
        assert_eq!(before, after);
        assert_eq!(after[0], "abc");
    }

    #[tokio::test]
    async fn search_on_empty_store_is_empty() {
        let dir = tempdir().expect("tempdir");
        let store = CorpusStore::open(dir.path(), "system", Arc::new(MockEmbedder::new(2)));
        assert!(store.search("anything", 5).await.expect("search").is_empty());
    }

    #[tokio::test]
    async fn search_with_large_k_returns_everything_ranked() {
        let dir = tempdir().expect("tempdir");
        let store = CorpusStore::open(dir.path(), "system", Arc::new(MockEmbedder::new(2)));

        store.add(&texts(&["aaaa", "a", "aa"])).await.expect("add");
        let hits = store.search("a", 100).await.expect("search");
        assert_eq!(hits, texts(&["a", "aa", "aaaa"]));
    }

    #[tokio::test]
    async fn clear_deletes_artifacts_and_restart_loads_empty() {
        let dir = tempdir().expect("tempdir");
        let embedder = Arc::new(MockEmbedder::new(2));

        let store = CorpusStore::open(dir.path(), "system", embedder.clone());
        store.add(&texts(&["doc"])).await.expect("add");
        assert!(dir.path().join("system_index.bin").exists());
        assert!(dir.path().join("system_texts.json").exists());

        store.clear().await.expect("clear");
        assert_eq!(store.count().await, 0);
        assert!(!dir.path().join("system_index.bin").exists());
        assert!(!dir.path().join("system_texts.json").exists());

        let reopened = CorpusStore::open(dir.path(), "system", embedder);
        assert_eq!(reopened.count().await, 0);
    }

    #[tokio::test]
    async fn corrupt_artifact_falls_back_to_empty() {
        let dir = tempdir().expect("tempdir");
        let embedder = Arc::new(MockEmbedder::new(2));

        let store = CorpusStore::open(dir.path(), "system", embedder.clone());
        store.add(&texts(&["doc one", "doc two"])).await.expect("add");
        fs::write(dir.path().join("system_texts.json"), b"{ not json").expect("corrupt");

        let reopened = CorpusStore::open(dir.path(), "system", embedder);
        assert_eq!(reopened.count().await, 0);
        assert!(reopened
            .search("probe", 3)
            .await
            .expect("search")
            .is_empty());
    }

    #[tokio::test]
    async fn missing_half_of_artifact_pair_falls_back_to_empty() {
        let dir = tempdir().expect("tempdir");
        let embedder = Arc::new(MockEmbedder::new(2));

        let store = CorpusStore::open(dir.path(), "system", embedder.clone());
        store.add(&texts(&["doc"])).await.expect("add");
        fs::remove_file(dir.path().join("system_texts.json")).expect("remove");

        let reopened = CorpusStore::open(dir.path(), "system", embedder);
        assert_eq!(reopened.count().await, 0);
    }

    #[tokio::test]
    async fn concurrent_adds_never_skew_counts() {
        let dir = tempdir().expect("tempdir");
        let store = Arc::new(CorpusStore::open(
            dir.path(),
            "system",
            Arc::new(MockEmbedder::new(2)),
        ));

        let mut handles = Vec::new();
        for task in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for batch in 0..5 {
                    let docs = vec![
                        format!("task {task} batch {batch} first"),
                        format!("task {task} batch {batch} second"),
                    ];
                    store.add(&docs).await.expect("add");
                }
            }));
        }
        for handle in handles {
            handle.await.expect("task");
        }

        assert_eq!(store.count().await, 8 * 5 * 2);

        // Persisted state must agree with memory after the storm.
        let reopened = CorpusStore::open(dir.path(), "system", Arc::new(MockEmbedder::new(2)));
        assert_eq!(reopened.count().await, 8 * 5 * 2);
    }
}
