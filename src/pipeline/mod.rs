//! Pipeline orchestration.
//!
//! Two entry points mirror the two phases:
//!
//! - [`index_directory`] (offline): chunk every Markdown report in a folder,
//!   embed each chunk, and persist the records. The store file is rewritten
//!   after each document completes, so a crash loses at most the in-progress
//!   document.
//! - [`run_audit`] (online): fetch the contract, embed its source, rank the
//!   stored chunks, compose the prompt, and ask the chat endpoint for an
//!   analysis.
//!
//! Everything runs sequentially on one task: no concurrent requests, no
//! shared mutable state.

use crate::explorer::ExplorerClient;
use crate::llm::chat::ChatClient;
use crate::rag::chunker::{TokenChunker, WordChunker, DEFAULT_MAX_TOKENS, DEFAULT_MAX_WORDS};
use crate::rag::embeddings::EmbeddingClient;
use crate::rag::search::top_k;
use crate::rag::store::EmbeddingStore;
use crate::types::{Chunk, ContractRecord, EmbeddingRecord, Result, SimilarityResult};
use crate::utils::config::Config;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Instruction used when the caller provides none.
pub const DEFAULT_INSTRUCTION: &str = "Analyze the following smart contract. \
    Provide a detailed explanation of the contract's functionality, potential \
    security issues, and its use cases.";

/// Splitting unit for the indexing phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ChunkMode {
    /// Split by `cl100k_base` sub-word tokens.
    #[default]
    Tokens,
    /// Split by whitespace-delimited words.
    Words,
}

impl std::fmt::Display for ChunkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChunkMode::Tokens => write!(f, "tokens"),
            ChunkMode::Words => write!(f, "words"),
        }
    }
}

/// Options for [`index_directory`].
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Splitting unit.
    pub mode: ChunkMode,
    /// Per-chunk token cap (tokens mode).
    pub max_tokens: usize,
    /// Per-chunk word cap (words mode).
    pub max_words: usize,
    /// Where the store file is written.
    pub store_path: PathBuf,
    /// Keep the raw chunk text in each record.
    pub include_text: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            mode: ChunkMode::Tokens,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_words: DEFAULT_MAX_WORDS,
            store_path: PathBuf::from("embeddings.json"),
            include_text: true,
        }
    }
}

/// Options for [`run_audit`].
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Store file to load.
    pub store_path: PathBuf,
    /// How many chunks to retrieve.
    pub top_k: usize,
    /// Instruction text; [`DEFAULT_INSTRUCTION`] when `None`.
    pub instruction: Option<String>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("embeddings.json"),
            top_k: 3,
            instruction: None,
        }
    }
}

/// Result of one audit run.
#[derive(Debug)]
pub struct AuditOutcome {
    /// Generated analysis text.
    pub answer: String,
    /// The retrieved chunks that grounded the prompt, best first.
    pub results: Vec<SimilarityResult>,
    /// The composed prompt that was sent to the chat endpoint.
    pub prompt: String,
}

enum DocumentChunker {
    Tokens(TokenChunker),
    Words(WordChunker),
}

impl DocumentChunker {
    fn from_options(options: &IndexOptions) -> Result<Self> {
        Ok(match options.mode {
            ChunkMode::Tokens => Self::Tokens(TokenChunker::new(options.max_tokens)?),
            ChunkMode::Words => Self::Words(WordChunker::new(options.max_words)?),
        })
    }

    fn chunk_document(&self, file: &str, text: &str) -> Result<Vec<Chunk>> {
        match self {
            Self::Tokens(chunker) => chunker.chunk_document(file, text),
            Self::Words(chunker) => Ok(chunker.chunk_document(file, text)),
        }
    }
}

/// Index every `.md` file under `folder` into the embedding store.
///
/// Files are processed in name order for deterministic store layout. An
/// embedding failure aborts the in-progress document; documents already
/// saved stay in the store file. Returns the total record count.
pub async fn index_directory(
    config: &Config,
    folder: &Path,
    options: &IndexOptions,
) -> Result<usize> {
    let chunker = DocumentChunker::from_options(options)?;
    let embedder = EmbeddingClient::new(&config.embedding);

    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(folder).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "md") {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        warn!(folder = %folder.display(), "no markdown files found");
    }

    let total_files = paths.len();
    let mut store = EmbeddingStore::new();
    for (file_number, path) in paths.iter().enumerate() {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = tokio::fs::read_to_string(path).await?;
        let chunks = chunker.chunk_document(&file_name, &text)?;
        let chunk_count = chunks.len();

        for chunk in chunks {
            let embedding = embedder.embed(&chunk.text).await?;
            info!(
                file = %chunk.file,
                chunk = chunk.chunk_index + 1,
                total = chunk_count,
                "embedded chunk"
            );
            store.push(EmbeddingRecord {
                file: chunk.file,
                chunk_index: chunk.chunk_index,
                embedding,
                text: options.include_text.then_some(chunk.text),
            });
        }

        // Full rewrite after each document: a crash mid-run loses at most
        // the document currently being embedded.
        store.save(&options.store_path).await?;
        info!(
            file = %file_name,
            processed = file_number + 1,
            total = total_files,
            "indexed document"
        );
    }

    Ok(store.len())
}

/// Run the online query phase against a contract address.
pub async fn run_audit(
    config: &Config,
    address: &str,
    options: &AuditOptions,
) -> Result<AuditOutcome> {
    let store = EmbeddingStore::load(&options.store_path).await?;
    if store.is_empty() {
        warn!(
            store = %options.store_path.display(),
            "embedding store is empty; prompt will carry no retrieved context"
        );
    }

    let explorer = ExplorerClient::new(&config.explorer)?;
    let contract = explorer.fetch_contract(address).await?;
    info!(address, source_bytes = contract.source_code.len(), "fetched contract");

    // The query vector comes from source and ABI together; the embedder's
    // input ceiling bounds the request size.
    let embedder = EmbeddingClient::new(&config.embedding);
    let combined = format!("{}{}", contract.source_code, contract.abi);
    let query = embedder.embed(&combined).await?;

    let results = top_k(&query, store.records(), options.top_k);
    info!(retrieved = results.len(), requested = options.top_k, "ranked stored chunks");

    let instruction = options.instruction.as_deref().unwrap_or(DEFAULT_INSTRUCTION);
    let prompt = compose_prompt(instruction, &contract, &results);

    let chat = ChatClient::new(&config.chat);
    let answer = chat.generate(&prompt).await?;

    Ok(AuditOutcome {
        answer,
        results,
        prompt,
    })
}

/// Merge the instruction, the retrieved chunks, and the contract data into
/// one prompt string.
///
/// Pure string concatenation, fully deterministic, no truncation; the
/// embedder's input ceiling is the only size limit in the pipeline.
pub fn compose_prompt(
    instruction: &str,
    contract: &ContractRecord,
    results: &[SimilarityResult],
) -> String {
    let context = results
        .iter()
        .map(|r| format!("File: {} (Chunk {}):\n{}", r.file, r.chunk_index, r.text))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{instruction}\n\n\
         Relevant Information from Audit Reports:\n{context}\n\n\
         Smart Contract ABI:\n{}\n\n\
         Smart Contract Source Code:\n{}",
        contract.abi, contract.source_code
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_contract() -> ContractRecord {
        ContractRecord {
            address: "0xfAbA6f8e4a5E8Ab82F62fe7C39859FA577269BE3".to_string(),
            source_code: "contract Vault { function withdraw() public {} }".to_string(),
            abi: "[{\"name\":\"withdraw\",\"type\":\"function\"}]".to_string(),
        }
    }

    fn sample_results() -> Vec<SimilarityResult> {
        vec![
            SimilarityResult {
                file: "2023-03-beanstalk.md".to_string(),
                chunk_index: 2,
                similarity: 0.91,
                text: "Reentrancy via external call before state update.".to_string(),
            },
            SimilarityResult {
                file: "2023-07-wells.md".to_string(),
                chunk_index: 0,
                similarity: 0.84,
                text: "Unchecked return value of low-level send.".to_string(),
            },
        ]
    }

    #[test]
    fn compose_prompt_contains_all_sections_in_order() {
        let prompt = compose_prompt("Review this contract.", &sample_contract(), &sample_results());

        let instruction_at = prompt.find("Review this contract.").unwrap();
        let context_at = prompt
            .find("File: 2023-03-beanstalk.md (Chunk 2):")
            .unwrap();
        let abi_at = prompt.find("Smart Contract ABI:").unwrap();
        let source_at = prompt.find("Smart Contract Source Code:").unwrap();

        assert!(instruction_at < context_at);
        assert!(context_at < abi_at);
        assert!(abi_at < source_at);

        // Contract data is appended verbatim.
        assert!(prompt.contains(&sample_contract().abi));
        assert!(prompt.contains(&sample_contract().source_code));
        assert!(prompt.contains("Unchecked return value of low-level send."));
    }

    #[test]
    fn compose_prompt_is_deterministic() {
        let a = compose_prompt(DEFAULT_INSTRUCTION, &sample_contract(), &sample_results());
        let b = compose_prompt(DEFAULT_INSTRUCTION, &sample_contract(), &sample_results());
        assert_eq!(a, b);
    }

    #[test]
    fn compose_prompt_with_no_results_still_carries_contract() {
        let prompt = compose_prompt(DEFAULT_INSTRUCTION, &sample_contract(), &[]);
        assert!(prompt.contains("Smart Contract ABI:"));
        assert!(prompt.contains(&sample_contract().source_code));
    }

    #[test]
    fn index_options_default_to_token_mode() {
        let options = IndexOptions::default();
        assert_eq!(options.mode, ChunkMode::Tokens);
        assert_eq!(options.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(options.max_words, DEFAULT_MAX_WORDS);
        assert!(options.include_text);
    }
}
