#[cfg(test)]
mod tests;

use super::{EmbeddingRecord, StoredDocument};
use crate::config::Config;
use crate::corpus::{Document, DocumentMetadata};
use crate::{GuideError, Result};
use arrow::array::{
    Array, FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray, UInt32Array,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use futures::TryStreamExt;
use lancedb::{
    Connection,
    query::{ExecutableQuery, QueryBase},
};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const TABLE_NAME: &str = "documents";

/// Vector index over corpus documents using LanceDB for similarity search
pub struct VectorStore {
    connection: Connection,
    vector_dimension: usize,
}

/// Search result from vector similarity search
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub document: Document,
    pub similarity_score: f32,
    pub distance: f32,
}

impl VectorStore {
    /// Whether an index has been persisted at the configured location
    #[inline]
    pub fn exists(config: &Config) -> bool {
        config
            .index_dir()
            .join(format!("{}.lance", TABLE_NAME))
            .exists()
    }

    /// Open a previously built index without recomputation
    ///
    /// Fails with a storage error if nothing has been built at the
    /// configured location; the caller must build first.
    #[inline]
    pub async fn open(config: &Config) -> Result<Self> {
        let db_path = config.index_dir();
        let connection = Self::connect(&db_path).await?;

        let table_names = connection
            .table_names()
            .execute()
            .await
            .map_err(|e| GuideError::Storage(format!("Failed to list tables: {}", e)))?;

        if !table_names.contains(&TABLE_NAME.to_string()) {
            return Err(GuideError::Storage(format!(
                "No index found at {}",
                db_path.display()
            )));
        }

        info!("Opened existing vector index at {}", db_path.display());
        Ok(Self {
            connection,
            vector_dimension: config.ollama.embedding_dimension as usize,
        })
    }

    /// Create a fresh, empty index, replacing any existing one
    #[inline]
    pub async fn create(config: &Config) -> Result<Self> {
        let db_path = config.index_dir();
        let connection = Self::connect(&db_path).await?;

        let table_names = connection
            .table_names()
            .execute()
            .await
            .map_err(|e| GuideError::Storage(format!("Failed to list tables: {}", e)))?;

        if table_names.contains(&TABLE_NAME.to_string()) {
            debug!("Dropping existing index table before rebuild");
            connection
                .drop_table(TABLE_NAME)
                .await
                .map_err(|e| GuideError::Storage(format!("Failed to drop table: {}", e)))?;
        }

        let vector_dimension = config.ollama.embedding_dimension as usize;
        let schema = Self::create_schema(vector_dimension);

        connection
            .create_empty_table(TABLE_NAME, schema)
            .execute()
            .await
            .map_err(|e| GuideError::Storage(format!("Failed to create table: {}", e)))?;

        info!(
            "Created vector index at {} with {} dimensions",
            db_path.display(),
            vector_dimension
        );
        Ok(Self {
            connection,
            vector_dimension,
        })
    }

    async fn connect(db_path: &Path) -> Result<Connection> {
        debug!("Connecting to LanceDB at path: {:?}", db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GuideError::Storage(format!("Failed to create index directory: {}", e))
            })?;
        }

        let uri = format!("file://{}", db_path.display());

        lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| GuideError::Storage(format!("Failed to connect to LanceDB: {}", e)))
    }

    /// Create schema with the specified vector dimension
    fn create_schema(vector_dim: usize) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, false)),
                    vector_dim as i32,
                ),
                false,
            ),
            Field::new("source", DataType::Utf8, false),
            Field::new("row_index", DataType::UInt32, false),
            Field::new("name", DataType::Utf8, true),
            Field::new("content", DataType::Utf8, false),
            Field::new("created_at", DataType::Utf8, false),
        ]))
    }

    /// Store a batch of embedding records
    #[inline]
    pub async fn add_documents(&self, records: Vec<EmbeddingRecord>) -> Result<()> {
        if records.is_empty() {
            debug!("No embeddings to store");
            return Ok(());
        }

        debug!("Storing batch of {} embeddings", records.len());

        for record in &records {
            if record.vector.len() != self.vector_dimension {
                return Err(GuideError::Storage(format!(
                    "Vector dimension mismatch: expected {}, got {}",
                    self.vector_dimension,
                    record.vector.len()
                )));
            }
        }

        let record_batch = self.create_record_batch(&records)?;

        let table = self
            .connection
            .open_table(TABLE_NAME)
            .execute()
            .await
            .map_err(|e| GuideError::Storage(format!("Failed to open table: {}", e)))?;

        let schema = record_batch.schema();
        let reader = RecordBatchIterator::new(std::iter::once(Ok(record_batch)), schema);
        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| GuideError::Storage(format!("Failed to insert embeddings: {}", e)))?;

        info!("Successfully stored {} embeddings", records.len());
        Ok(())
    }

    /// Create a RecordBatch from embedding records
    fn create_record_batch(&self, records: &[EmbeddingRecord]) -> Result<RecordBatch> {
        let len = records.len();
        let vector_dim = self.vector_dimension;

        let mut ids = Vec::with_capacity(len);
        let mut sources = Vec::with_capacity(len);
        let mut row_indices = Vec::with_capacity(len);
        let mut names = Vec::with_capacity(len);
        let mut contents = Vec::with_capacity(len);
        let mut created_ats = Vec::with_capacity(len);

        for record in records {
            ids.push(record.id.as_str());
            sources.push(record.document.source.as_str());
            row_indices.push(record.document.row_index);
            names.push(record.document.name.as_deref());
            contents.push(record.document.content.as_str());
            created_ats.push(record.document.created_at.as_str());
        }

        let schema = Self::create_schema(vector_dim);

        // Create vector array using FixedSizeListArray
        let mut flat_values = Vec::with_capacity(len * vector_dim);
        for record in records {
            flat_values.extend_from_slice(&record.vector);
        }
        let values_array = Float32Array::from(flat_values);
        let field = Arc::new(Field::new("item", DataType::Float32, false));
        let vector_array =
            FixedSizeListArray::try_new(field, vector_dim as i32, Arc::new(values_array), None)
                .map_err(|e| {
                    GuideError::Storage(format!("Failed to create vector array: {}", e))
                })?;

        let arrays: Vec<Arc<dyn arrow::array::Array>> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(vector_array),
            Arc::new(StringArray::from(sources)),
            Arc::new(UInt32Array::from(row_indices)),
            Arc::new(StringArray::from(names)),
            Arc::new(StringArray::from(contents)),
            Arc::new(StringArray::from(created_ats)),
        ];

        RecordBatch::try_new(schema, arrays)
            .map_err(|e| GuideError::Storage(format!("Failed to create record batch: {}", e)))
    }

    /// Search for the k nearest stored documents
    ///
    /// Results come back ordered by ascending distance; equal distances are
    /// broken by corpus row order so retrieval is deterministic.
    #[inline]
    pub async fn search(&self, query_vector: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        debug!("Searching for similar vectors with limit: {}", limit);

        let table = self
            .connection
            .open_table(TABLE_NAME)
            .execute()
            .await
            .map_err(|e| GuideError::Storage(format!("Failed to open table: {}", e)))?;

        let query = table
            .vector_search(query_vector)
            .map_err(|e| GuideError::Storage(format!("Failed to create vector search: {}", e)))?
            .column("vector")
            .limit(limit);

        let results = query
            .execute()
            .await
            .map_err(|e| GuideError::Storage(format!("Failed to execute search: {}", e)))?;

        let mut search_results = self.parse_search_results_stream(results).await?;

        search_results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    a.document
                        .metadata
                        .row_index
                        .cmp(&b.document.metadata.row_index)
                })
        });

        Ok(search_results)
    }

    /// Get the total number of documents stored
    #[inline]
    pub async fn count(&self) -> Result<u64> {
        let table = self
            .connection
            .open_table(TABLE_NAME)
            .execute()
            .await
            .map_err(|e| GuideError::Storage(format!("Failed to open table: {}", e)))?;

        let count = table
            .count_rows(None)
            .await
            .map_err(|e| GuideError::Storage(format!("Failed to count rows: {}", e)))?;

        Ok(count as u64)
    }

    /// Parse search results from LanceDB stream into SearchResult structs
    async fn parse_search_results_stream(
        &self,
        mut results: lancedb::arrow::SendableRecordBatchStream,
    ) -> Result<Vec<SearchResult>> {
        let mut search_results = Vec::new();

        while let Some(batch_result) = results
            .try_next()
            .await
            .map_err(|e| GuideError::Storage(format!("Failed to read result stream: {}", e)))?
        {
            let parsed_batch = Self::parse_search_batch(&batch_result)?;
            search_results.extend(parsed_batch);
        }

        debug!("Parsed {} search results from stream", search_results.len());
        Ok(search_results)
    }

    /// Parse a single record batch from search results
    fn parse_search_batch(batch: &RecordBatch) -> Result<Vec<SearchResult>> {
        let mut search_results = Vec::new();
        let num_rows = batch.num_rows();

        let sources = Self::string_column(batch, "source")?;
        let row_indices = batch
            .column_by_name("row_index")
            .ok_or_else(|| GuideError::Storage("Missing row_index column".to_string()))?
            .as_any()
            .downcast_ref::<UInt32Array>()
            .ok_or_else(|| GuideError::Storage("Invalid row_index column type".to_string()))?;
        let names = Self::string_column(batch, "name")?;
        let contents = Self::string_column(batch, "content")?;

        // Extract distance scores if available
        let distances = batch
            .column_by_name("_distance")
            .map(|col| col.as_any().downcast_ref::<Float32Array>());

        for row in 0..num_rows {
            let document = Document {
                text: contents.value(row).to_string(),
                metadata: DocumentMetadata {
                    source: sources.value(row).to_string(),
                    row_index: row_indices.value(row),
                    name: if names.is_null(row) {
                        None
                    } else {
                        Some(names.value(row).to_string())
                    },
                },
            };

            let distance = distances
                .flatten()
                .map_or(0.0, |d| if d.is_null(row) { 0.0 } else { d.value(row) });

            // Convert distance to similarity score (higher is better)
            let similarity_score = 1.0 - distance;

            search_results.push(SearchResult {
                document,
                similarity_score,
                distance,
            });
        }

        debug!("Parsed {} search results", search_results.len());
        Ok(search_results)
    }

    fn string_column<'a>(batch: &'a RecordBatch, column: &str) -> Result<&'a StringArray> {
        batch
            .column_by_name(column)
            .ok_or_else(|| GuideError::Storage(format!("Missing {} column", column)))?
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| GuideError::Storage(format!("Invalid {} column type", column)))
    }
}

impl StoredDocument {
    /// Build the persisted form of a document
    #[inline]
    pub fn from_document(document: &Document) -> Self {
        Self {
            source: document.metadata.source.clone(),
            row_index: document.metadata.row_index,
            name: document.metadata.name.clone(),
            content: document.text.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
