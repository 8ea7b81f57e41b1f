//! Similarity-searchable memory for the Mindloop agent loop.
//!
//! Provides local embedding generation, a vector store abstraction with
//! in-memory and file-backed implementations, and the [`MemoryStore`]
//! learning archive with single-writer / concurrent-reader discipline.
//!
//! # Main types
//!
//! - [`EmbeddingProvider`] — Trait for turning text into vectors.
//! - [`LocalEmbedding`] — Hashed bag-of-words embedding, no external API.
//! - [`VectorStore`] — Trait for storing and querying embedding vectors.
//! - [`FileVectorStore`] — JSONL-persisted vector store.
//! - [`MemoryStore`] — The learning archive the orchestration loop reads
//!   and writes.
//! - [`Recall`] — Retrieval outcome, including the defined empty sentinel.

/// Learning archive with write-serialized adds and lock-free retrieval.
pub mod archive;
/// Embedding provider trait and local implementation.
pub mod embedding;
/// Vector store trait and implementations.
pub mod store;

pub use archive::{MemoryStore, Recall};
pub use embedding::{EmbeddingProvider, LocalEmbedding};
pub use store::{FileVectorStore, InMemoryVectorStore, MemoryEntry, ScoredEntry, VectorStore};
