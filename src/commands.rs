use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::chat;
use crate::config::{Config, get_config_dir};
use crate::corpus;
use crate::embeddings::ollama::OllamaClient;
use crate::generation::GenerationClient;
use crate::index::VectorStore;
use crate::indexer::{IndexOutcome, Indexer, IndexingStats};
use crate::retriever::Retriever;
use crate::server::{AppState, start_server};

fn load_config() -> Result<Config> {
    let config_dir = get_config_dir()?;
    Config::load(&config_dir)
}

fn print_build_stats(stats: &IndexingStats) {
    println!("Index built successfully!");
    println!("  Documents indexed: {}", stats.documents_indexed);
    println!("  Embeddings generated: {}", stats.embeddings_generated);
    println!("  Duration: {:?}", stats.duration);
}

/// Build or rebuild the vector index from the corpus
#[inline]
pub async fn build_index(corpus_path: Option<PathBuf>, force: bool) -> Result<()> {
    let mut config = load_config()?;

    if let Some(path) = corpus_path {
        config.corpus.path = path;
        config
            .save()
            .context("Failed to persist corpus path to config")?;
    }

    info!("Building index from {}", config.corpus.path.display());

    let indexer = Indexer::new(config).context("Failed to initialize indexer")?;

    if force {
        let (_store, stats) = indexer.build_index().await?;
        print_build_stats(&stats);
        return Ok(());
    }

    match indexer.ensure_index().await? {
        (_store, IndexOutcome::Built(stats)) => print_build_stats(&stats),
        (_store, IndexOutcome::Loaded) => {
            println!("Index is already current. Use --force to rebuild.");
        }
    }

    Ok(())
}

/// Retrieve the most similar documents for a query, without generation
#[inline]
pub async fn query(text: &str, limit: Option<usize>) -> Result<()> {
    let config = load_config()?;
    let top_k = limit.unwrap_or(config.retrieval.top_k);
    anyhow::ensure!(top_k > 0, "limit must be a positive integer");

    let indexer = Indexer::new(config.clone()).context("Failed to initialize indexer")?;
    let (store, _outcome) = indexer.ensure_index().await?;

    let client = OllamaClient::new(config.ollama.clone())
        .context("Failed to initialize Ollama client")?;
    let query_vector = client.generate_embedding(text)?;
    let results = store.search(&query_vector, top_k).await?;

    if results.is_empty() {
        println!("No documents in the index.");
        return Ok(());
    }

    println!("Top {} documents:", results.len());
    println!();
    for (rank, result) in results.iter().enumerate() {
        let label = result
            .document
            .metadata
            .name
            .as_deref()
            .unwrap_or("(unnamed)");
        println!(
            "{}. {} (similarity {:.3}, row {})",
            rank + 1,
            style(label).bold(),
            result.similarity_score,
            result.document.metadata.row_index
        );
        for line in result.document.text.lines() {
            println!("   {}", line);
        }
        println!();
    }

    Ok(())
}

/// Answer a one-shot question without starting the web UI
#[inline]
pub async fn ask(question: &str) -> Result<()> {
    let config = load_config()?;

    let indexer = Indexer::new(config.clone()).context("Failed to initialize indexer")?;
    let (store, _outcome) = indexer.ensure_index().await?;

    let embedder = Arc::new(
        OllamaClient::new(config.ollama.clone()).context("Failed to initialize Ollama client")?,
    );
    let generator = GenerationClient::new(config.ollama.clone())
        .context("Failed to initialize generation client")?;
    let retriever = Retriever::new(Arc::new(store), embedder, config.retrieval.top_k);

    let reply = chat::answer(&retriever, &generator, question).await?;
    println!("{}", reply);

    Ok(())
}

/// Start the long-lived web chat server
#[inline]
pub async fn serve(port: Option<u16>) -> Result<()> {
    let mut config = load_config()?;
    if let Some(port) = port {
        config.server.port = port;
    }

    // Index presence is checked exactly once, here at startup
    let indexer = Indexer::new(config.clone()).context("Failed to initialize indexer")?;
    let (store, outcome) = indexer.ensure_index().await?;
    match outcome {
        IndexOutcome::Loaded => println!("Loaded existing index."),
        IndexOutcome::Built(stats) => print_build_stats(&stats),
    }

    let store = Arc::new(store);
    let document_count = store.count().await?;

    let embedder = Arc::new(
        OllamaClient::new(config.ollama.clone()).context("Failed to initialize Ollama client")?,
    );
    let generator = Arc::new(
        GenerationClient::new(config.ollama.clone())
            .context("Failed to initialize generation client")?,
    );
    let retriever = Arc::new(Retriever::new(store, embedder, config.retrieval.top_k));

    let state = AppState::new(retriever, generator, document_count);

    println!(
        "Serving chat UI at {}",
        style(format!("http://{}:{}", config.server.host, config.server.port)).cyan()
    );

    start_server(&config, state).await?;

    Ok(())
}

/// Show detailed status of the corpus, index, and Ollama connection
#[inline]
pub async fn show_status() -> Result<()> {
    let config = load_config()?;

    println!("{}", style("Trip Guide Status").bold().cyan());
    println!();

    println!("Config file: {}", config.config_file_path().display());
    println!();

    let corpus_exists = config.corpus.path.exists();
    println!("📄 Corpus: {}", config.corpus.path.display());
    if corpus_exists {
        match corpus::load_documents(&config.corpus.path) {
            Ok(documents) => println!("   Rows: {}", documents.len()),
            Err(e) => println!("   {} {}", style("Unreadable:").red(), e),
        }
    } else {
        println!("   {}", style("Not found").red());
    }
    println!();

    println!("🗂  Index: {}", config.index_dir().display());
    if VectorStore::exists(&config) {
        match VectorStore::open(&config).await {
            Ok(store) => {
                let count = store.count().await?;
                println!("   Documents: {}", count);

                if corpus_exists {
                    let current = corpus::fingerprint(&config.corpus.path)?;
                    let stored = std::fs::read_to_string(config.fingerprint_path())
                        .map(|s| s.trim().to_string())
                        .ok();
                    if stored.as_deref() == Some(current.as_str()) {
                        println!("   Freshness: {}", style("current").green());
                    } else {
                        println!(
                            "   Freshness: {} (run `trip-guide build` to rebuild)",
                            style("stale").yellow()
                        );
                    }
                }
            }
            Err(e) => println!("   {} {}", style("Unreadable:").red(), e),
        }
    } else {
        println!("   {}", style("Not built yet").yellow());
    }
    println!();

    println!(
        "🦙 Ollama: {}",
        config
            .ollama_url()
            .map(|u| u.to_string())
            .unwrap_or_else(|_| "invalid URL".to_string())
    );
    let client = OllamaClient::new(config.ollama.clone())
        .context("Failed to initialize Ollama client")?;
    match client.ping() {
        Ok(()) => {
            println!("   Connection: {}", style("ok").green());
            match client.validate_model() {
                Ok(()) => println!(
                    "   Embedding model: {} ({})",
                    config.ollama.embedding_model,
                    style("available").green()
                ),
                Err(_) => println!(
                    "   Embedding model: {} ({})",
                    config.ollama.embedding_model,
                    style("missing").red()
                ),
            }
        }
        Err(e) => println!("   Connection: {} ({})", style("failed").red(), e),
    }

    Ok(())
}
