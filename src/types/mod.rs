//! Core types for the audit RAG pipeline.
//!
//! Everything here is either a record flowing through the pipeline or the
//! crate-wide error taxonomy. The only durable artifact is the list of
//! [`EmbeddingRecord`]s persisted by the store; all other values live for a
//! single invocation.

use serde::{Deserialize, Serialize};

// ============= Pipeline Records =============

/// A bounded-size contiguous slice of a source document.
///
/// Indices are 0-based and contiguous; concatenating a document's chunks in
/// index order reconstructs the document's token/word stream exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Name of the source document (file name, not path).
    pub file: String,
    /// Position of this chunk within the document.
    pub chunk_index: usize,
    /// Chunk text content.
    pub text: String,
}

/// One persisted embedding, tied back to its source chunk.
///
/// Serialized field names (`file`, `chunk_index`, `embedding`, `text`) are
/// the on-disk JSON format of the embedding store; `text` is omitted when
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Name of the source document.
    pub file: String,
    /// Chunk position within the source document.
    pub chunk_index: usize,
    /// Embedding vector; dimensionality is fixed by the embedding model.
    pub embedding: Vec<f32>,
    /// Original chunk text, kept when the index was built with text enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A scored retrieval hit, computed per query and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    /// Name of the source document.
    pub file: String,
    /// Chunk position within the source document.
    pub chunk_index: usize,
    /// Cosine similarity against the query vector, in [-1, 1].
    pub similarity: f32,
    /// Chunk text (empty when the store holds no text for this record).
    pub text: String,
}

/// Verified contract data fetched from the blockchain explorer.
///
/// Fetched fresh per query; not cached across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractRecord {
    /// On-chain address the data was fetched for.
    pub address: String,
    /// Verified source code, verbatim as returned by the explorer.
    pub source_code: String,
    /// Contract ABI as a JSON string.
    pub abi: String,
}

// ============= Error Types =============

/// Errors surfaced by the pipeline.
///
/// All errors propagate to the top-level invocation, which prints a
/// diagnostic and exits; there are no retries and no partial-result recovery.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An external endpoint answered with a non-success HTTP status.
    #[error("remote service returned HTTP {status}: {body}")]
    RemoteService {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// HTTP 200, but the payload itself signals failure
    /// (explorer `status != "1"`, missing `data[0].embedding`, ...).
    #[error("upstream error: {0}")]
    UpstreamLogic(String),

    /// A required credential or setting is absent or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection-level failure before any HTTP status was received.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding store (de)serialization failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// BPE construction or decode failure.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
