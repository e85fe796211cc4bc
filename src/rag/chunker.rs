//! Document chunking.
//!
//! Two interchangeable splitting units: sub-word tokens (`cl100k_base` BPE)
//! and whitespace-delimited words. Both cover the whole document in order
//! with no gaps and no overlaps, so concatenating a document's chunks
//! reconstructs its token/word stream exactly.

use crate::types::{AppError, Chunk, Result};
use tiktoken_rs::CoreBPE;

/// Default per-chunk token cap.
pub const DEFAULT_MAX_TOKENS: usize = 800;

/// Default per-chunk word cap.
pub const DEFAULT_MAX_WORDS: usize = 300;

/// Splits documents into windows of at most `max_tokens` BPE tokens.
pub struct TokenChunker {
    bpe: CoreBPE,
    max_tokens: usize,
}

impl TokenChunker {
    /// Create a token chunker with the given per-chunk cap.
    pub fn new(max_tokens: usize) -> Result<Self> {
        if max_tokens == 0 {
            return Err(AppError::Configuration(
                "chunk token cap must be greater than zero".to_string(),
            ));
        }
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| AppError::Tokenizer(e.to_string()))?;
        Ok(Self { bpe, max_tokens })
    }

    /// Number of BPE tokens in `text`.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Split a document into token-bounded chunks.
    ///
    /// An empty document yields zero chunks; a document at or under the cap
    /// yields exactly one. A window boundary can land inside a multi-byte
    /// character; such a window decodes lossily (with U+FFFD replacements)
    /// rather than failing the document.
    pub fn chunk_document(&self, file: &str, text: &str) -> Result<Vec<Chunk>> {
        let tokens = self.bpe.encode_ordinary(text);
        let mut chunks = Vec::with_capacity(tokens.len().div_ceil(self.max_tokens));
        for (chunk_index, window) in tokens.chunks(self.max_tokens).enumerate() {
            // Decode to raw bytes first: `CoreBPE::decode` rejects windows
            // that end mid-character, but they are valid chunks here.
            let bytes = self
                .bpe
                ._decode_native_and_split(window.to_vec())
                .collect::<Vec<_>>()
                .concat();
            chunks.push(Chunk {
                file: file.to_string(),
                chunk_index,
                text: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(chunks)
    }
}

/// Splits documents into windows of at most `max_words` whitespace-delimited
/// words, rejoined with single spaces.
pub struct WordChunker {
    max_words: usize,
}

impl WordChunker {
    /// Create a word chunker with the given per-chunk cap.
    pub fn new(max_words: usize) -> Result<Self> {
        if max_words == 0 {
            return Err(AppError::Configuration(
                "chunk word cap must be greater than zero".to_string(),
            ));
        }
        Ok(Self { max_words })
    }

    /// Split a document into word-bounded chunks.
    pub fn chunk_document(&self, file: &str, text: &str) -> Vec<Chunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        words
            .chunks(self.max_words)
            .enumerate()
            .map(|(chunk_index, window)| Chunk {
                file: file.to_string(),
                chunk_index,
                text: window.join(" "),
            })
            .collect()
    }
}
