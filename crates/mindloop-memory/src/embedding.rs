use async_trait::async_trait;
use mindloop_core::{MindloopError, MindloopResult};
use std::collections::HashMap;

/// Trait for computing text embeddings.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Compute the embedding vector for a single text.
    async fn embed(&self, text: &str) -> MindloopResult<Vec<f32>>;

    /// Dimension of the vectors this provider produces.
    fn dimension(&self) -> usize;
}

/// Local hashed bag-of-words embedding.
///
/// Tokenizes on non-alphanumeric boundaries, spreads each term's frequency
/// weight over three hashed positions, and L2-normalizes the result. Needs
/// no external service; swap in a hosted embedding provider for production
/// recall quality.
pub struct LocalEmbedding {
    dimension: usize,
}

impl LocalEmbedding {
    /// Creates a provider emitting vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 1)
            .map(str::to_string)
            .collect()
    }
}

impl Default for LocalEmbedding {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbedding {
    async fn embed(&self, text: &str) -> MindloopResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(MindloopError::Storage("Cannot embed empty text".to_string()));
        }

        let terms = Self::tokenize(text);
        let mut vector = vec![0.0f32; self.dimension];
        if terms.is_empty() {
            return Ok(vector);
        }

        let mut freq: HashMap<&str, f32> = HashMap::new();
        for term in &terms {
            *freq.entry(term.as_str()).or_insert(0.0) += 1.0;
        }

        let total = terms.len() as f32;
        for (term, count) in &freq {
            let tf = count / total;
            // Three salted positions per term reduce hash collisions.
            for (salt, weight) in [(0u8, 1.0f32), (1, 0.7), (2, 0.5)] {
                let slot = fnv1a(term.as_bytes(), salt) as usize % self.dimension;
                vector[slot] += tf * weight;
            }
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// FNV-1a with a trailing salt byte.
fn fnv1a(data: &[u8], salt: u8) -> u32 {
    let mut hash: u32 = 2166136261;
    for &byte in data.iter().chain(std::iter::once(&salt)) {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(16777619);
    }
    hash
}
