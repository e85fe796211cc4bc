//! Command-line interface for the `auditrag` binary.
//!
//! Uses clap derive for parsing; the binary wires the parsed commands into
//! the pipeline entry points.

use crate::pipeline::ChunkMode;
use crate::rag::chunker::{DEFAULT_MAX_TOKENS, DEFAULT_MAX_WORDS};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// auditrag - retrieval-augmented smart contract auditing
#[derive(Parser, Debug)]
#[command(
    name = "auditrag",
    version,
    about = "Retrieval-augmented smart contract auditing",
    long_about = "Index Markdown audit reports into a local embedding store, then audit a\n\
                  deployed contract: its verified source is fetched from a blockchain\n\
                  explorer, the most similar report chunks are retrieved by cosine\n\
                  similarity, and a chat model produces an analysis grounded in them.",
    after_help = "EXAMPLES:\n    \
                  auditrag index ./reports                        # Build embeddings.json\n    \
                  auditrag index ./reports --mode words           # Word-based chunking\n    \
                  auditrag audit 0xfAbA6f8e4a5E8Ab82F62fe7C39859FA577269BE3\n    \
                  auditrag audit 0x... --top-k 5 --show-prompt"
)]
pub struct Cli {
    /// Enable verbose (debug-level) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a folder of Markdown audit reports into the embedding store
    Index {
        /// Folder containing .md reports
        folder: PathBuf,

        /// Path of the embedding store file to write
        #[arg(short, long, default_value = "embeddings.json")]
        store: PathBuf,

        /// Splitting unit for chunking
        #[arg(long, value_enum, default_value_t = ChunkMode::Tokens)]
        mode: ChunkMode,

        /// Per-chunk token cap (tokens mode)
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: usize,

        /// Per-chunk word cap (words mode)
        #[arg(long, default_value_t = DEFAULT_MAX_WORDS)]
        max_words: usize,

        /// Omit the raw chunk text from stored records
        #[arg(long)]
        no_text: bool,
    },

    /// Audit a deployed contract using the indexed reports as context
    Audit {
        /// Contract address on the explorer's network
        address: String,

        /// Path of the embedding store file to load
        #[arg(short, long, default_value = "embeddings.json")]
        store: PathBuf,

        /// Number of report chunks to retrieve
        #[arg(short = 'k', long, default_value_t = 3)]
        top_k: usize,

        /// Instruction for the generative model (defaults to a contract
        /// analysis prompt)
        #[arg(long)]
        instruction: Option<String>,

        /// Read the instruction from a file instead
        #[arg(long, conflicts_with = "instruction")]
        instruction_file: Option<PathBuf>,

        /// Print the composed prompt before the generated answer
        #[arg(long)]
        show_prompt: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_defaults() {
        let cli = Cli::try_parse_from(["auditrag", "index", "./reports"]).unwrap();
        match cli.command {
            Commands::Index {
                folder,
                store,
                mode,
                max_tokens,
                max_words,
                no_text,
            } => {
                assert_eq!(folder, PathBuf::from("./reports"));
                assert_eq!(store, PathBuf::from("embeddings.json"));
                assert_eq!(mode, ChunkMode::Tokens);
                assert_eq!(max_tokens, DEFAULT_MAX_TOKENS);
                assert_eq!(max_words, DEFAULT_MAX_WORDS);
                assert!(!no_text);
            }
            _ => panic!("expected index command"),
        }
    }

    #[test]
    fn audit_flags_parse() {
        let cli = Cli::try_parse_from([
            "auditrag",
            "audit",
            "0xabc",
            "--top-k",
            "5",
            "--show-prompt",
        ])
        .unwrap();
        match cli.command {
            Commands::Audit {
                address,
                top_k,
                show_prompt,
                instruction,
                ..
            } => {
                assert_eq!(address, "0xabc");
                assert_eq!(top_k, 5);
                assert!(show_prompt);
                assert!(instruction.is_none());
            }
            _ => panic!("expected audit command"),
        }
    }

    #[test]
    fn instruction_and_file_conflict() {
        let result = Cli::try_parse_from([
            "auditrag",
            "audit",
            "0xabc",
            "--instruction",
            "x",
            "--instruction-file",
            "y.txt",
        ]);
        assert!(result.is_err());
    }
}
