// Retriever module
// Named seam between the chat controller and the vector index

#[cfg(test)]
mod tests;

use std::sync::Arc;
use tracing::debug;

use crate::Result;
use crate::corpus::Document;
use crate::embeddings::Embedder;
use crate::index::VectorStore;

/// Embeds a query and returns the most similar corpus documents
///
/// Holds no logic of its own beyond the embed-then-search composition; the
/// injected store and embedder decide the actual retrieval behavior.
pub struct Retriever {
    store: Arc<VectorStore>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    #[inline]
    pub fn new(store: Arc<VectorStore>, embedder: Arc<dyn Embedder>, top_k: usize) -> Self {
        Self {
            store,
            embedder,
            top_k,
        }
    }

    /// Fetch the top-k documents for a free-text query, most similar first
    #[inline]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<Document>> {
        debug!("Retrieving top {} documents for query", self.top_k);

        let query_vector = self.embedder.embed(query)?;
        let results = self.store.search(&query_vector, self.top_k).await?;

        Ok(results.into_iter().map(|r| r.document).collect())
    }

    #[inline]
    pub fn top_k(&self) -> usize {
        self.top_k
    }
}
