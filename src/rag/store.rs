//! Embedding store persistence.
//!
//! The store is an ordered list of [`EmbeddingRecord`]s backed by a single
//! JSON file. Saving always rewrites the whole file, so a crash mid-indexing
//! loses at most the in-progress document. There is no deduplication:
//! re-indexing the same document appends duplicate records unless the caller
//! starts from an empty store.

use crate::types::{AppError, EmbeddingRecord, Result};
use std::path::Path;
use tracing::{debug, info};

/// In-memory embedding store, persisted as a JSON array.
#[derive(Debug, Default)]
pub struct EmbeddingStore {
    records: Vec<EmbeddingRecord>,
}

impl EmbeddingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, preserving insertion order.
    pub fn push(&mut self, record: EmbeddingRecord) {
        self.records.push(record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[EmbeddingRecord] {
        &self.records
    }

    /// Load a store from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let records: Vec<EmbeddingRecord> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Persistence(format!(
                "failed to parse embedding store {}: {e}",
                path.display()
            ))
        })?;
        debug!(count = records.len(), path = %path.display(), "loaded embedding store");
        Ok(Self { records })
    }

    /// Write the store to a JSON file, replacing any previous contents.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.records).map_err(|e| {
            AppError::Persistence(format!("failed to serialize embedding store: {e}"))
        })?;
        tokio::fs::write(path, json).await?;
        info!(count = self.records.len(), path = %path.display(), "saved embedding store");
        Ok(())
    }
}

impl From<Vec<EmbeddingRecord>> for EmbeddingStore {
    fn from(records: Vec<EmbeddingRecord>) -> Self {
        Self { records }
    }
}
