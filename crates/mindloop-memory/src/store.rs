use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mindloop_core::{MindloopError, MindloopResult};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A single record held by a vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Content-derived identifier (SHA-256 hex of the record text).
    pub id: String,
    /// The record text.
    pub content: String,
    /// Embedding of the record text.
    pub embedding: Vec<f32>,
    /// When the record was stored.
    pub created_at: DateTime<Utc>,
}

/// A store entry paired with its similarity score for a query.
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    /// The matched entry.
    pub entry: MemoryEntry,
    /// Cosine similarity to the query embedding.
    pub score: f32,
}

/// Trait for vector storage backends.
///
/// The orchestration core depends only on this add/query contract; index
/// structure and persistence are backend concerns.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Inserts an entry. Inserting an id that already exists is a no-op,
    /// since ids are content hashes and equal ids mean equal content.
    async fn insert(&self, entry: MemoryEntry) -> MindloopResult<()>;

    /// Returns the `top_k` entries most similar to the query embedding,
    /// highest score first.
    async fn search(&self, query_embedding: &[f32], top_k: usize)
        -> MindloopResult<Vec<ScoredEntry>>;

    /// Number of stored entries.
    async fn count(&self) -> MindloopResult<usize>;
}

/// Brute-force cosine-similarity store held entirely in memory.
pub struct InMemoryVectorStore {
    entries: RwLock<Vec<MemoryEntry>>,
}

impl InMemoryVectorStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn insert(&self, entry: MemoryEntry) -> MindloopResult<()> {
        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.id == entry.id) {
            return Ok(());
        }
        entries.push(entry);
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> MindloopResult<Vec<ScoredEntry>> {
        if query_embedding.is_empty() {
            return Err(MindloopError::Storage("Empty query embedding".to_string()));
        }

        let entries = self.entries.read().await;
        let mut scored: Vec<ScoredEntry> = entries
            .iter()
            .map(|e| ScoredEntry {
                score: cosine_similarity(query_embedding, &e.embedding),
                entry: e.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn count(&self) -> MindloopResult<usize> {
        Ok(self.entries.read().await.len())
    }
}

/// Vector store that persists entries as JSONL on disk.
///
/// Loads every entry into memory on creation and appends on insert.
pub struct FileVectorStore {
    path: std::path::PathBuf,
    inner: InMemoryVectorStore,
}

impl FileVectorStore {
    /// Opens (or creates) the store at the given path, loading any
    /// existing entries.
    pub async fn open(path: std::path::PathBuf) -> MindloopResult<Self> {
        let inner = InMemoryVectorStore::new();

        if path.exists() {
            let data = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| MindloopError::Storage(format!("Failed to read store: {e}")))?;
            for line in data.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                let entry: MemoryEntry = serde_json::from_str(line)
                    .map_err(|e| MindloopError::Storage(format!("Invalid JSONL entry: {e}")))?;
                inner.insert(entry).await?;
            }
        } else if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MindloopError::Storage(format!("Failed to create dir: {e}")))?;
        }

        Ok(Self { path, inner })
    }

    async fn append_line(&self, entry: &MemoryEntry) -> MindloopResult<()> {
        use tokio::io::AsyncWriteExt;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| MindloopError::Storage(format!("Failed to open store: {e}")))?;
        let mut line = serde_json::to_string(entry)
            .map_err(|e| MindloopError::Storage(format!("Failed to serialize entry: {e}")))?;
        line.push('\n');
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| MindloopError::Storage(format!("Failed to write entry: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for FileVectorStore {
    async fn insert(&self, entry: MemoryEntry) -> MindloopResult<()> {
        if self
            .inner
            .entries
            .read()
            .await
            .iter()
            .any(|e| e.id == entry.id)
        {
            return Ok(());
        }
        self.append_line(&entry).await?;
        self.inner.insert(entry).await
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> MindloopResult<Vec<ScoredEntry>> {
        self.inner.search(query_embedding, top_k).await
    }

    async fn count(&self) -> MindloopResult<usize> {
        self.inner.count().await
    }
}

/// Cosine similarity between two vectors of equal length.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, content: &str, embedding: Vec<f32>) -> MemoryEntry {
        MemoryEntry {
            id: id.to_string(),
            content: content.to_string(),
            embedding,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_count() {
        let store = InMemoryVectorStore::new();
        assert_eq!(store.count().await.unwrap(), 0);
        store
            .insert(entry("a", "hello", vec![1.0, 0.0]))
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_noop() {
        let store = InMemoryVectorStore::new();
        store
            .insert(entry("same", "hello", vec![1.0, 0.0]))
            .await
            .unwrap();
        store
            .insert(entry("same", "hello", vec![1.0, 0.0]))
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let store = InMemoryVectorStore::new();
        store
            .insert(entry("a", "near", vec![0.9, 0.1, 0.0]))
            .await
            .unwrap();
        store
            .insert(entry("b", "far", vec![0.0, 0.0, 1.0]))
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].entry.content, "near");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_search_truncates_to_top_k() {
        let store = InMemoryVectorStore::new();
        for i in 0..8 {
            let mut emb = vec![0.0f32; 3];
            emb[i % 3] = 1.0;
            store
                .insert(entry(&format!("id_{i}"), &format!("entry {i}"), emb))
                .await
                .unwrap();
        }
        let results = store.search(&[1.0, 0.0, 0.0], 3).await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_search_empty_query_rejected() {
        let store = InMemoryVectorStore::new();
        assert!(store.search(&[], 5).await.is_err());
    }

    #[test]
    fn test_cosine_similarity_bounds() {
        let v = vec![1.0, 0.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 0.001);
        assert!(cosine_similarity(&v, &[0.0, 1.0]).abs() < 0.001);
        assert!((cosine_similarity(&v, &[-1.0, 0.0]) + 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("memories.jsonl");

        {
            let store = FileVectorStore::open(path.clone()).await.unwrap();
            store
                .insert(entry("a", "hello", vec![1.0, 0.0]))
                .await
                .unwrap();
            store
                .insert(entry("b", "world", vec![0.0, 1.0]))
                .await
                .unwrap();
        }

        let reopened = FileVectorStore::open(path).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 2);
        let results = reopened.search(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(results[0].entry.content, "hello");
    }

    #[tokio::test]
    async fn test_file_store_skips_duplicate_append() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("memories.jsonl");

        {
            let store = FileVectorStore::open(path.clone()).await.unwrap();
            store
                .insert(entry("dup", "once", vec![1.0]))
                .await
                .unwrap();
            store
                .insert(entry("dup", "once", vec![1.0]))
                .await
                .unwrap();
        }

        let reopened = FileVectorStore::open(path).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
    }
}
