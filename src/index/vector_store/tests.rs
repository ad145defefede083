use super::*;
use crate::config::{Config, OllamaConfig};
use tempfile::TempDir;

fn create_test_config() -> (Config, TempDir) {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let mut config =
        Config::load(temp_dir.path()).expect("should load default config from temp dir");
    config.ollama = OllamaConfig {
        embedding_dimension: 5,
        ..OllamaConfig::default()
    };
    (config, temp_dir)
}

fn create_test_record(id: u32, vector: Vec<f32>, name: &str) -> EmbeddingRecord {
    EmbeddingRecord {
        id: format!("doc_{}", id),
        vector,
        document: StoredDocument {
            source: "data/spots.csv".to_string(),
            row_index: id,
            name: Some(name.to_string()),
            content: format!("name: {}\ndescription: test spot {}", name, id),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        },
    }
}

#[tokio::test]
async fn store_initialization() {
    let (config, _temp_dir) = create_test_config();

    assert!(!VectorStore::exists(&config));
    let store = VectorStore::create(&config)
        .await
        .expect("should create vector store");
    assert!(VectorStore::exists(&config));

    let count = store.count().await.expect("should count rows");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn open_without_build_fails() {
    let (config, _temp_dir) = create_test_config();

    let result = VectorStore::open(&config).await;
    assert!(matches!(result, Err(GuideError::Storage(_))));
}

#[tokio::test]
async fn store_and_search() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::create(&config)
        .await
        .expect("should create vector store");

    store
        .add_documents(vec![
            create_test_record(0, vec![1.0, 0.0, 0.0, 0.0, 0.0], "Munnar"),
            create_test_record(1, vec![0.0, 1.0, 0.0, 0.0, 0.0], "Varkala"),
            create_test_record(2, vec![0.0, 0.0, 1.0, 0.0, 0.0], "Wayanad"),
        ])
        .await
        .expect("should store embeddings");

    let results = store
        .search(&[0.9, 0.1, 0.0, 0.0, 0.0], 2)
        .await
        .expect("should search");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].document.metadata.name.as_deref(), Some("Munnar"));
    assert!(results[0].distance <= results[1].distance);
    assert!(results[0].similarity_score >= results[1].similarity_score);
    assert!(results[0].document.text.contains("name: Munnar"));
}

#[tokio::test]
async fn search_returns_at_most_k() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::create(&config)
        .await
        .expect("should create vector store");

    store
        .add_documents(vec![
            create_test_record(0, vec![1.0, 0.0, 0.0, 0.0, 0.0], "Munnar"),
            create_test_record(1, vec![0.0, 1.0, 0.0, 0.0, 0.0], "Varkala"),
        ])
        .await
        .expect("should store embeddings");

    let results = store
        .search(&[1.0, 0.0, 0.0, 0.0, 0.0], 10)
        .await
        .expect("should search");
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn equal_distances_break_ties_by_row_order() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::create(&config)
        .await
        .expect("should create vector store");

    // Two documents with identical vectors; the earlier corpus row wins
    store
        .add_documents(vec![
            create_test_record(1, vec![0.5, 0.5, 0.0, 0.0, 0.0], "Second"),
            create_test_record(0, vec![0.5, 0.5, 0.0, 0.0, 0.0], "First"),
        ])
        .await
        .expect("should store embeddings");

    let results = store
        .search(&[0.5, 0.5, 0.0, 0.0, 0.0], 2)
        .await
        .expect("should search");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].document.metadata.row_index, 0);
    assert_eq!(results[1].document.metadata.row_index, 1);
}

#[tokio::test]
async fn persistence_round_trip() {
    let (config, _temp_dir) = create_test_config();

    {
        let store = VectorStore::create(&config)
            .await
            .expect("should create vector store");
        store
            .add_documents(vec![
                create_test_record(0, vec![1.0, 0.0, 0.0, 0.0, 0.0], "Munnar"),
                create_test_record(1, vec![0.0, 1.0, 0.0, 0.0, 0.0], "Varkala"),
            ])
            .await
            .expect("should store embeddings");
    }

    let reopened = VectorStore::open(&config)
        .await
        .expect("should open existing store");
    assert_eq!(reopened.count().await.expect("should count rows"), 2);

    let results = reopened
        .search(&[1.0, 0.0, 0.0, 0.0, 0.0], 1)
        .await
        .expect("should search");
    assert_eq!(results[0].document.metadata.name.as_deref(), Some("Munnar"));
}

#[tokio::test]
async fn create_replaces_existing_index() {
    let (config, _temp_dir) = create_test_config();

    let store = VectorStore::create(&config)
        .await
        .expect("should create vector store");
    store
        .add_documents(vec![create_test_record(
            0,
            vec![1.0, 0.0, 0.0, 0.0, 0.0],
            "Munnar",
        )])
        .await
        .expect("should store embeddings");

    let rebuilt = VectorStore::create(&config)
        .await
        .expect("should recreate vector store");
    assert_eq!(rebuilt.count().await.expect("should count rows"), 0);
}

#[tokio::test]
async fn dimension_mismatch_is_rejected() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::create(&config)
        .await
        .expect("should create vector store");

    let result = store
        .add_documents(vec![create_test_record(0, vec![1.0, 0.0], "Munnar")])
        .await;
    assert!(matches!(result, Err(GuideError::Storage(_))));
}

#[tokio::test]
async fn missing_name_column_round_trips_as_none() {
    let (config, _temp_dir) = create_test_config();
    let store = VectorStore::create(&config)
        .await
        .expect("should create vector store");

    let mut record = create_test_record(0, vec![1.0, 0.0, 0.0, 0.0, 0.0], "unused");
    record.document.name = None;
    store
        .add_documents(vec![record])
        .await
        .expect("should store embeddings");

    let results = store
        .search(&[1.0, 0.0, 0.0, 0.0, 0.0], 1)
        .await
        .expect("should search");
    assert_eq!(results[0].document.metadata.name, None);
}
