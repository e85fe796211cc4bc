//! Retrieval Augmented Generation (RAG) components.
//!
//! The pipeline flow:
//!
//! 1. **Ingestion** - documents are chunked ([`chunker`]) and embedded
//!    ([`embeddings`])
//! 2. **Storage** - records persisted to a flat JSON file ([`store`])
//! 3. **Retrieval** - query embedded, most similar chunks ranked by cosine
//!    similarity ([`search`])
//!
//! Retrieval is a brute-force linear scan over the store; there is no ANN
//! index, which bounds the system to small corpora (hundreds to low
//! thousands of records).

pub mod chunker;
pub mod embeddings;
pub mod search;
pub mod store;
