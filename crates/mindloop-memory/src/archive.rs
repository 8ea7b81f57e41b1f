use crate::embedding::EmbeddingProvider;
use crate::store::{MemoryEntry, VectorStore};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Outcome of a [`MemoryStore::retrieve`] call.
///
/// An empty store is a normal condition, not an error, and maps to
/// [`Recall::Empty`]. A failing vector backend maps to
/// [`Recall::Unavailable`] — retrieval never propagates storage errors to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recall {
    /// The store holds no records yet.
    Empty,
    /// The lookup failed; the error was logged and swallowed.
    Unavailable,
    /// Ranked record texts, most similar first.
    Memories(Vec<String>),
}

impl fmt::Display for Recall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recall::Empty => write!(f, "No memories recorded yet."),
            Recall::Unavailable => write!(f, "Memory lookup unavailable."),
            Recall::Memories(records) => {
                writeln!(f, "Relevant past learnings:")?;
                for record in records {
                    writeln!(f, "- {record}")?;
                }
                Ok(())
            }
        }
    }
}

/// Async-safe archive of task learnings.
///
/// Writes serialize behind an exclusive lock — at most one `add` critical
/// section runs at any instant. Reads take no lock and may race a
/// concurrent `add`; a retrieve may or may not observe a just-completed
/// write, and no stronger guarantee is given.
pub struct MemoryStore {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    write_lock: Mutex<()>,
}

impl MemoryStore {
    /// Creates an archive over the given vector store and embedder.
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            embedder,
            write_lock: Mutex::new(()),
        }
    }

    /// Records a learning derived from a completed task.
    ///
    /// Failures inside the critical section are logged and swallowed;
    /// memory writes never abort the calling job.
    pub async fn add(&self, task_description: &str, learning: &str) {
        let content = format!("From the task '{task_description}', learned: {learning}");
        let id = content_id(&content);

        let _guard = self.write_lock.lock().await;
        let result = async {
            let embedding = self.embedder.embed(&content).await?;
            self.store
                .insert(MemoryEntry {
                    id: id.clone(),
                    content: content.clone(),
                    embedding,
                    created_at: Utc::now(),
                })
                .await
        }
        .await;

        match result {
            Ok(()) => debug!(id = %id, "Recorded learning"),
            Err(e) => warn!(error = %e, "Failed to record learning; continuing"),
        }
    }

    /// Retrieves up to `limit` records ranked by similarity to `query`.
    pub async fn retrieve(&self, query: &str, limit: usize) -> Recall {
        let stored = match self.store.count().await {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "Memory count failed");
                return Recall::Unavailable;
            }
        };
        if stored == 0 {
            return Recall::Empty;
        }

        let lookup = async {
            let query_embedding = self.embedder.embed(query).await?;
            self.store
                .search(&query_embedding, limit.min(stored))
                .await
        }
        .await;

        match lookup {
            Ok(results) if results.is_empty() => Recall::Empty,
            Ok(results) => {
                debug!(count = results.len(), "Retrieved memories");
                Recall::Memories(results.into_iter().map(|r| r.entry.content).collect())
            }
            Err(e) => {
                warn!(error = %e, "Memory retrieval failed");
                Recall::Unavailable
            }
        }
    }
}

/// SHA-256 hex digest of the record text, used as the record identifier.
fn content_id(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
