//! Interactive document search over a folder of `.txt` files.
//!
//! Usage:
//!   local-rag                          # index ./data/documents
//!   local-rag --docs notes --top-k 5   # custom folder and result count
//!   local-rag --model lexical-hash     # no model download
//!   local-rag --prompt                 # print the generation prompt per query

use anyhow::{Context, Result};
use clap::Parser;
use local_rag::corpus::import_document;
use local_rag::prompt::build_prompt;
use local_rag::{
    ChunkingConfig, EmbedderOptions, RagConfig, RetrievalIndex, RetrievalResult, load_embedder,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "local-rag", version, about = "Search a folder of text documents")]
struct Cli {
    /// Directory of .txt documents (created if missing)
    #[arg(long, env = "RAG_DOCS_DIR", default_value = "data/documents")]
    docs: PathBuf,

    /// Embedding model candidates, tried in order
    #[arg(long = "model", env = "RAG_MODELS", value_delimiter = ',')]
    models: Vec<String>,

    /// Where downloaded models are cached
    #[arg(long, env = "RAG_MODEL_CACHE")]
    model_cache: Option<PathBuf>,

    /// Number of snippets returned per query
    #[arg(long, default_value_t = local_rag::DEFAULT_TOP_K)]
    top_k: usize,

    /// Chunk window in words
    #[arg(long, default_value_t = 1000)]
    chunk_size: usize,

    /// Words shared between consecutive chunks
    #[arg(long, default_value_t = 200)]
    overlap: usize,

    /// Print results as JSON lines
    #[arg(long)]
    json: bool,

    /// Print the generation prompt instead of the snippets
    #[arg(long, conflicts_with = "json")]
    prompt: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn to_config(&self) -> RagConfig {
        let mut config = RagConfig {
            docs_dir: self.docs.clone(),
            model_cache_dir: self.model_cache.clone(),
            chunking: ChunkingConfig {
                chunk_size: self.chunk_size,
                overlap: self.overlap,
            },
            top_k: self.top_k,
            ..RagConfig::default()
        };
        if !self.models.is_empty() {
            config.models = self.models.clone();
        }
        config
    }
}

enum Command<'a> {
    Quit,
    Reload,
    Stats,
    Add(&'a str),
    Query(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    match line {
        ":quit" | ":q" | ":exit" => Command::Quit,
        ":reload" => Command::Reload,
        ":stats" => Command::Stats,
        _ => match line.strip_prefix(":add ") {
            Some(path) => Command::Add(path.trim()),
            None => Command::Query(line),
        },
    }
}

async fn reload(index: &Arc<RetrievalIndex>, docs: &Path) -> Result<()> {
    let index = Arc::clone(index);
    let docs = docs.to_path_buf();
    let report = tokio::task::spawn_blocking(move || index.load(&docs)).await??;
    if let Some(reason) = report.embedding_fallback {
        eprintln!("Warning: documents could not be embedded ({reason}); searches will score 0");
    }
    println!(
        "Indexed {} chunks from {} files",
        report.chunks, report.files_loaded
    );
    Ok(())
}

/// Reloads for a REPL command; failures are reported and the session goes on.
async fn reload_or_warn(index: &Arc<RetrievalIndex>, docs: &Path) -> bool {
    match reload(index, docs).await {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Warning: Failed to reload documents: {e}");
            false
        }
    }
}

fn print_results(query: &str, results: &[RetrievalResult], cli: &Cli) -> Result<()> {
    if cli.prompt {
        println!("{}", build_prompt(query, results));
        return Ok(());
    }
    if cli.json {
        for result in results {
            println!("{}", serde_json::to_string(result)?);
        }
        return Ok(());
    }
    if results.is_empty() {
        println!("No relevant documents found.\n");
        return Ok(());
    }
    for (rank, result) in results.iter().enumerate() {
        let preview: String = result.content.chars().take(200).collect();
        println!(
            "{}. [{:.3}] {}\n   {}",
            rank + 1,
            result.score,
            result.source,
            preview
        );
    }
    println!();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "local_rag=debug"
    } else {
        "local_rag=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = cli.to_config();
    config.validate()?;

    let options = EmbedderOptions {
        cache_dir: config.resolved_model_cache_dir(),
        lexical_dimension: config.fallback_dimension,
    };
    let models = config.models.clone();
    tracing::info!("Initializing embedding model (first run may download it)...");
    let embedder = tokio::task::spawn_blocking(move || load_embedder(models.as_slice(), &options))
        .await?
        .context("no embedding model available")?;

    let index = Arc::new(
        RetrievalIndex::new(embedder, config.chunking)
            .with_fallback_dimension(config.fallback_dimension),
    );

    tracing::info!("Loading documents from {}", config.docs_dir.display());
    reload(&index, &config.docs_dir).await?;

    println!("Ask a question, or :add <file>, :reload, :stats, :quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF (Ctrl+D)
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_command(line) {
            Command::Quit => break,
            Command::Reload => {
                reload_or_warn(&index, &config.docs_dir).await;
            }
            Command::Stats => {
                let dimension = index.snapshot().map_or(0, |s| s.dimension());
                println!(
                    "{} chunks, {}d vectors, model {}",
                    index.chunk_count(),
                    dimension,
                    index.embedder().model_name()
                );
            }
            Command::Add(path) => match import_document(&config.docs_dir, path) {
                Ok(target) => {
                    println!("Added {}", target.display());
                    reload_or_warn(&index, &config.docs_dir).await;
                }
                Err(e) => eprintln!("Error: {e}"),
            },
            Command::Query(query) => {
                let searcher = Arc::clone(&index);
                let owned = query.to_string();
                let top_k = config.top_k;
                let results =
                    tokio::task::spawn_blocking(move || searcher.retrieve(&owned, top_k)).await?;
                print_results(query, &results, &cli)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert!(matches!(parse_command(":q"), Command::Quit));
        assert!(matches!(parse_command(":reload"), Command::Reload));
        assert!(matches!(parse_command(":add  notes.txt"), Command::Add("notes.txt")));
        assert!(matches!(parse_command("what is :add"), Command::Query("what is :add")));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_index() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("a.txt"), "apple banana fruit")?;

        let index = Arc::new(RetrievalIndex::new(
            Arc::new(local_rag::LexicalEmbedder::new(64)),
            ChunkingConfig::default(),
        ));
        assert!(reload_or_warn(&index, dir.path()).await);

        // a plain file where the corpus directory should be
        let not_a_dir = dir.path().join("a.txt");
        assert!(!reload_or_warn(&index, &not_a_dir).await);
        assert_eq!(index.chunk_count(), 1);
        assert_eq!(index.retrieve("banana", 1)[0].source, "a.txt");
        Ok(())
    }

    #[test]
    fn test_cli_defaults_to_config() {
        let cli = Cli::parse_from(["local-rag"]);
        let config = cli.to_config();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.chunking, ChunkingConfig::default());
        assert!(!config.models.is_empty());
    }

    #[test]
    fn test_cli_models_override() {
        let cli = Cli::parse_from(["local-rag", "--model", "lexical-hash", "--top-k", "5"]);
        let config = cli.to_config();
        assert_eq!(config.models, vec!["lexical-hash"]);
        assert_eq!(config.top_k, 5);
    }
}
