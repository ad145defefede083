// Corpus module
// Loads the point-of-interest CSV and renders each row as a retrievable document

#[cfg(test)]
mod tests;

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::{GuideError, Result};

/// A point-of-interest row rendered as a single text blob with provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub text: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMetadata {
    /// Path of the corpus file this row came from
    pub source: String,
    /// Zero-based row position within the corpus
    pub row_index: u32,
    /// Value of the `name` column, when the corpus has one
    pub name: Option<String>,
}

/// Load every row of the corpus as a document
///
/// Rows are serialized wholesale as `header: value` lines, so arbitrary
/// column sets are tolerated. Rows whose fields are all blank are skipped.
#[inline]
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    if !path.exists() {
        return Err(GuideError::Corpus(format!(
            "Corpus file not found: {}",
            path.display()
        )));
    }

    debug!("Loading corpus from {}", path.display());

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| GuideError::Corpus(format!("Failed to open corpus: {}", e)))?;

    let headers = reader
        .headers()
        .map_err(|e| GuideError::Corpus(format!("Failed to read corpus headers: {}", e)))?
        .clone();

    let name_column = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("name"));

    let mut documents = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            GuideError::Corpus(format!("Malformed corpus row {}: {}", row_index + 1, e))
        })?;

        if record.iter().all(|field| field.trim().is_empty()) {
            debug!("Skipping blank corpus row {}", row_index + 1);
            continue;
        }

        let text = headers
            .iter()
            .zip(record.iter())
            .map(|(header, field)| format!("{}: {}", header, field))
            .collect::<Vec<_>>()
            .join("\n");

        let name = name_column
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(ToString::to_string);

        documents.push(Document {
            text,
            metadata: DocumentMetadata {
                source: path.display().to_string(),
                row_index: u32::try_from(row_index).map_err(|_| {
                    GuideError::Corpus(format!("Corpus row index overflow at row {}", row_index))
                })?,
                name,
            },
        });
    }

    info!(
        "Loaded {} documents from {}",
        documents.len(),
        path.display()
    );
    Ok(documents)
}

/// SHA-256 fingerprint of the corpus file contents
///
/// Stored beside the index after a build; a mismatch at startup forces a
/// rebuild so the index never silently serves a stale corpus.
#[inline]
pub fn fingerprint(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
