//! auditrag CLI entry point.

use auditrag::cli::{Cli, Commands};
use auditrag::pipeline::{self, AuditOptions, IndexOptions};
use auditrag::{Config, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "auditrag=debug"
    } else {
        "auditrag=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Index {
            folder,
            store,
            mode,
            max_tokens,
            max_words,
            no_text,
        } => {
            let options = IndexOptions {
                mode,
                max_tokens,
                max_words,
                store_path: store,
                include_text: !no_text,
            };
            let count = pipeline::index_directory(&config, &folder, &options).await?;
            println!(
                "{} {count} records written to {}",
                "indexed:".green().bold(),
                options.store_path.display()
            );
        }
        Commands::Audit {
            address,
            store,
            top_k,
            instruction,
            instruction_file,
            show_prompt,
        } => {
            let instruction = match (instruction, instruction_file) {
                (Some(text), _) => Some(text),
                (None, Some(path)) => Some(tokio::fs::read_to_string(path).await?),
                (None, None) => None,
            };
            let options = AuditOptions {
                store_path: store,
                top_k,
                instruction,
            };
            let outcome = pipeline::run_audit(&config, &address, &options).await?;

            if show_prompt {
                println!("{}\n{}\n", "prompt:".dimmed(), outcome.prompt);
            }
            for result in &outcome.results {
                println!(
                    "{} {} (chunk {}, similarity {:.4})",
                    "context:".cyan(),
                    result.file,
                    result.chunk_index,
                    result.similarity
                );
            }
            println!("\n{}", outcome.answer);
        }
    }

    Ok(())
}
