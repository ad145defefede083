// Indexer module
// Builds the vector index from the corpus, or loads an existing one


use std::fs;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::corpus;
use crate::embeddings::ollama::OllamaClient;
use crate::index::{EmbeddingRecord, StoredDocument, VectorStore};
use crate::{GuideError, Result};

/// Orchestrates the one-time index construction from the corpus
pub struct Indexer {
    config: Config,
    client: OllamaClient,
}

/// Statistics about an index build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexingStats {
    pub documents_indexed: usize,
    pub embeddings_generated: usize,
    pub duration: Duration,
}

/// How the index was obtained at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    /// An up-to-date index existed on disk and was opened without re-embedding
    Loaded,
    /// The index was (re)built from the corpus
    Built(IndexingStats),
}

impl Indexer {
    #[inline]
    pub fn new(config: Config) -> Result<Self> {
        let client = OllamaClient::new(config.ollama.clone())?;
        Ok(Self { config, client })
    }

    /// Load the index when present and current, otherwise build it
    ///
    /// Presence is checked once here, at process start. The stored corpus
    /// fingerprint decides between load and rebuild; a corpus that has
    /// changed since the last build never serves stale results.
    #[inline]
    pub async fn ensure_index(&self) -> Result<(VectorStore, IndexOutcome)> {
        let corpus_path = &self.config.corpus.path;

        if VectorStore::exists(&self.config) {
            match (self.stored_fingerprint(), corpus::fingerprint(corpus_path)) {
                (Some(stored), Ok(current)) if stored == current => {
                    info!("Index is current, loading without re-embedding");
                    let store = VectorStore::open(&self.config).await?;
                    return Ok((store, IndexOutcome::Loaded));
                }
                (Some(_), Ok(_)) => {
                    info!("Corpus changed since last build, rebuilding index");
                }
                (None, Ok(_)) => {
                    warn!("Existing index has no fingerprint, rebuilding");
                }
                (_, Err(e)) => {
                    // The index is still usable; a rebuild would fail anyway
                    warn!("Corpus unavailable ({}), serving existing index", e);
                    let store = VectorStore::open(&self.config).await?;
                    return Ok((store, IndexOutcome::Loaded));
                }
            }
        }

        let (store, stats) = self.build_index().await?;
        Ok((store, IndexOutcome::Built(stats)))
    }

    /// Build a fresh index from the corpus, replacing any existing one
    #[inline]
    pub async fn build_index(&self) -> Result<(VectorStore, IndexingStats)> {
        let start = Instant::now();
        let corpus_path = &self.config.corpus.path;

        let documents = corpus::load_documents(corpus_path)?;
        info!("Building index from {} documents", documents.len());

        let store = VectorStore::create(&self.config).await?;

        let bar = if console::user_attended_stderr() {
            ProgressBar::new(documents.len() as u64).with_style(
                ProgressStyle::with_template("{bar:30} [{pos}/{len}] Embedding documents")
                    .expect("style template is valid"),
            )
        } else {
            ProgressBar::hidden()
        };

        let batch_size = self.config.ollama.batch_size as usize;
        let mut embeddings_generated = 0;

        for chunk in documents.chunks(batch_size) {
            let texts: Vec<String> = chunk.iter().map(|d| d.text.clone()).collect();
            let vectors = self.client.generate_embeddings_batch(&texts)?;

            let records: Vec<EmbeddingRecord> = chunk
                .iter()
                .zip(vectors)
                .map(|(document, vector)| EmbeddingRecord {
                    id: Uuid::new_v4().to_string(),
                    vector,
                    document: StoredDocument::from_document(document),
                })
                .collect();

            embeddings_generated += records.len();
            store.add_documents(records).await?;
            bar.inc(chunk.len() as u64);
        }

        bar.finish_and_clear();

        let fingerprint = corpus::fingerprint(corpus_path)?;
        fs::write(self.config.fingerprint_path(), &fingerprint).map_err(|e| {
            GuideError::Storage(format!("Failed to write corpus fingerprint: {}", e))
        })?;

        let stats = IndexingStats {
            documents_indexed: documents.len(),
            embeddings_generated,
            duration: start.elapsed(),
        };

        info!(
            "Indexed {} documents in {:?}",
            stats.documents_indexed, stats.duration
        );

        Ok((store, stats))
    }

    fn stored_fingerprint(&self) -> Option<String> {
        fs::read_to_string(self.config.fingerprint_path())
            .ok()
            .map(|s| s.trim().to_string())
    }
}
