// Embeddings module
// Ollama-backed embedding generation for corpus rows and queries

pub mod ollama;

pub use ollama::{DEFAULT_EMBEDDING_DIMENSION, OllamaClient};

use crate::Result;

/// Embedding provider seam
///
/// Retrieval only needs "text in, vector out", so tests substitute a
/// deterministic embedder without a running Ollama instance.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
