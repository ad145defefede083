// Index module
// LanceDB-backed vector index over corpus documents

pub mod vector_store;

pub use vector_store::{SearchResult, VectorStore};

/// Embedding record stored in the index
#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    /// Unique identifier for this embedding
    pub id: String,
    /// The vector embedding (768 dimensions for nomic-embed-text)
    pub vector: Vec<f32>,
    /// Document fields persisted alongside the vector
    pub document: StoredDocument,
}

/// Document fields persisted alongside each vector
///
/// The index is the only store, so the full document text lives here; there
/// is no separate metadata database to join against.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Path of the corpus file the row came from
    pub source: String,
    /// Zero-based row position within the corpus
    pub row_index: u32,
    /// Value of the `name` column, when the corpus has one
    pub name: Option<String>,
    /// The serialized row text
    pub content: String,
    /// Timestamp when this embedding was created
    pub created_at: String,
}
