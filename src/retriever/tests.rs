use super::*;
use crate::GuideError;
use crate::config::{Config, OllamaConfig};
use crate::index::{EmbeddingRecord, StoredDocument};
use tempfile::TempDir;

/// Deterministic keyword embedder so tests run without Ollama
struct StubEmbedder;

impl Embedder for StubEmbedder {
    fn embed(&self, text: &str) -> crate::Result<Vec<f32>> {
        let text = text.to_lowercase();
        let feature = |keyword: &str| if text.contains(keyword) { 1.0 } else { 0.0 };
        Ok(vec![
            feature("winter"),
            feature("beach"),
            feature("hill"),
            feature("family"),
            1.0,
        ])
    }
}

struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed(&self, _text: &str) -> crate::Result<Vec<f32>> {
        Err(GuideError::Embedding("embedding service is down".to_string()))
    }
}

async fn seeded_store() -> (Arc<VectorStore>, TempDir) {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let mut config = Config::load(temp_dir.path()).expect("should load default config");
    config.ollama = OllamaConfig {
        embedding_dimension: 5,
        ..OllamaConfig::default()
    };

    let store = VectorStore::create(&config)
        .await
        .expect("should create vector store");

    let embedder = StubEmbedder;
    let rows = [
        ("Munnar", "name: Munnar\ndescription: hill station\ngroup: family\nseason: winter"),
        ("Varkala", "name: Varkala\ndescription: beach cliffs\ngroup: girls\nseason: summer"),
        ("Thekkady", "name: Thekkady\ndescription: wildlife\ngroup: boys\nseason: monsoon"),
    ];

    let records: Vec<EmbeddingRecord> = rows
        .iter()
        .enumerate()
        .map(|(row_index, (name, text))| EmbeddingRecord {
            id: format!("doc_{}", row_index),
            vector: embedder.embed(text).expect("stub embed should succeed"),
            document: StoredDocument {
                source: "data/spots.csv".to_string(),
                row_index: row_index as u32,
                name: Some((*name).to_string()),
                content: (*text).to_string(),
                created_at: "2024-01-01T00:00:00Z".to_string(),
            },
        })
        .collect();

    store
        .add_documents(records)
        .await
        .expect("should store embeddings");

    (Arc::new(store), temp_dir)
}

#[tokio::test]
async fn retrieves_most_similar_document_first() {
    let (store, _temp_dir) = seeded_store().await;
    let retriever = Retriever::new(store, Arc::new(StubEmbedder), 2);

    let documents = retriever
        .retrieve("family trip winter hill")
        .await
        .expect("should retrieve documents");

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].metadata.name.as_deref(), Some("Munnar"));
}

#[tokio::test]
async fn returns_at_most_top_k() {
    let (store, _temp_dir) = seeded_store().await;
    let retriever = Retriever::new(store, Arc::new(StubEmbedder), 4);

    let documents = retriever
        .retrieve("anything at all")
        .await
        .expect("should retrieve documents");

    // Only three documents exist, so fewer than top_k come back
    assert_eq!(retriever.top_k(), 4);
    assert_eq!(documents.len(), 3);
}

#[tokio::test]
async fn embedder_failure_propagates() {
    let (store, _temp_dir) = seeded_store().await;
    let retriever = Retriever::new(store, Arc::new(FailingEmbedder), 2);

    let result = retriever.retrieve("family trip winter").await;
    assert!(matches!(result, Err(GuideError::Embedding(_))));
}
