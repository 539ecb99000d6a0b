//! Retrieval core for answering questions over a local folder of text files.
//!
//! Documents are split into overlapping word windows, embedded with a local
//! sentence-embedding model and ranked against queries by cosine similarity.
//!
//! ```ignore
//! use local_rag::{ChunkingConfig, EmbedderOptions, RetrievalIndex, load_embedder};
//!
//! let embedder = load_embedder(&["all-MiniLM-L6-v2", "bge-small-en-v1.5"], &EmbedderOptions::default())?;
//! let index = RetrievalIndex::new(embedder, ChunkingConfig::default());
//! index.load("data/documents")?;
//!
//! for hit in index.retrieve("How do I reset the device?", 3) {
//!     println!("{:.3} {} {}", hit.score, hit.source, hit.content);
//! }
//! ```

pub mod chunker;
pub mod config;
pub mod corpus;
pub mod embedder;
pub mod error;
pub mod lexical;
pub mod prompt;
pub mod retriever;
pub mod vector_db;

pub use config::{ChunkingConfig, DEFAULT_TOP_K, RagConfig};
pub use embedder::{Embedder, EmbedderOptions, load_embedder};
pub use error::{RagError, Result, RetrieveError};
pub use lexical::LexicalEmbedder;
pub use retriever::{LoadReport, RetrievalIndex};
pub use vector_db::{Chunk, RetrievalResult, Snapshot};
