//! # auditrag - Retrieval-Augmented Smart Contract Auditing
//!
//! A RAG pipeline over past audit reports:
//!
//! 1. **Offline indexing** - Markdown reports are split into bounded-size
//!    chunks, each chunk is embedded by a remote embedding endpoint, and the
//!    records are persisted to a flat JSON store.
//! 2. **Online auditing** - a contract's verified source code and ABI are
//!    fetched from a blockchain explorer, embedded, and ranked against the
//!    store by cosine similarity; the best chunks plus the contract data are
//!    composed into a prompt for a chat-completion endpoint.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use auditrag::{index_directory, run_audit, AuditOptions, Config, IndexOptions};
//!
//! #[tokio::main]
//! async fn main() -> auditrag::Result<()> {
//!     let config = Config::from_env()?;
//!
//!     let written = index_directory(&config, "reports".as_ref(), &IndexOptions::default()).await?;
//!     println!("indexed {written} chunks");
//!
//!     let outcome = run_audit(&config, "0xfAbA…69BE3", &AuditOptions::default()).await?;
//!     println!("{}", outcome.answer);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`rag`] - chunking, embedding, storage, and similarity search
//! - [`explorer`] - blockchain explorer (Etherscan-style) client
//! - [`llm`] - chat-completion client
//! - [`pipeline`] - orchestration and prompt composition
//! - [`types`] - records and the error taxonomy
//! - [`utils`] - environment-based configuration
//!
//! Execution is sequential and single-shot: no retries, no concurrency, no
//! caching beyond the store file. All credentials come from the environment.

#![warn(missing_docs)]

/// Command-line interface definitions.
pub mod cli;
/// Blockchain explorer client.
pub mod explorer;
/// Generative model clients.
pub mod llm;
/// Pipeline orchestration and prompt composition.
pub mod pipeline;
/// RAG components: chunker, embedder, store, ranker.
pub mod rag;
/// Core records and error taxonomy.
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use explorer::ExplorerClient;
pub use llm::chat::ChatClient;
pub use pipeline::{
    compose_prompt, index_directory, run_audit, AuditOptions, AuditOutcome, ChunkMode,
    IndexOptions, DEFAULT_INSTRUCTION,
};
pub use rag::chunker::{TokenChunker, WordChunker};
pub use rag::embeddings::EmbeddingClient;
pub use rag::search::{cosine_similarity, top_k};
pub use rag::store::EmbeddingStore;
pub use types::{AppError, Chunk, ContractRecord, EmbeddingRecord, Result, SimilarityResult};
pub use utils::config::Config;
