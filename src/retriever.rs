use crate::chunker::chunk_document;
use crate::config::{ChunkingConfig, DEFAULT_FALLBACK_DIMENSION};
use crate::corpus::prepare_corpus;
use crate::embedder::Embedder;
use crate::error::{RagError, Result, RetrieveError};
use crate::vector_db::{Chunk, RetrievalResult, Snapshot, stack_rows};
use parking_lot::RwLock;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const SENTINEL_SOURCE: &str = "system";
pub const SENTINEL_CONTENT: &str = "No documents were found in the system.";

/// Outcome of a corpus load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub files_loaded: usize,
    pub files_skipped: usize,
    pub chunks: usize,
    pub dimension: usize,
    /// Set when the corpus could not be embedded and a zero matrix was used.
    pub embedding_fallback: Option<String>,
}

/// Searchable corpus of chunks with their embeddings.
///
/// Readers take the current snapshot and search it without holding the lock;
/// [`RetrievalIndex::load`] builds a complete replacement before swapping it
/// in, so chunks and vectors always come from the same load.
pub struct RetrievalIndex {
    embedder: Arc<dyn Embedder>,
    chunking: ChunkingConfig,
    fallback_dimension: usize,
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl RetrievalIndex {
    pub fn new(embedder: Arc<dyn Embedder>, chunking: ChunkingConfig) -> Self {
        Self {
            embedder,
            chunking,
            fallback_dimension: DEFAULT_FALLBACK_DIMENSION,
            current: RwLock::new(None),
        }
    }

    /// Width of the zero matrix used when corpus embedding fails.
    pub fn with_fallback_dimension(mut self, dimension: usize) -> Self {
        self.fallback_dimension = dimension.max(1);
        self
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// The corpus currently served to queries, if any has been loaded.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current.read().clone()
    }

    pub fn chunk_count(&self) -> usize {
        self.snapshot().map_or(0, |s| s.len())
    }

    /// Rebuilds the whole index from the `.txt` files in `dir`.
    ///
    /// Unreadable and blank files are skipped. Only failures to create or
    /// list the directory are returned as errors.
    pub fn load(&self, dir: impl AsRef<Path>) -> Result<LoadReport> {
        let dir = dir.as_ref();
        let files = prepare_corpus(dir)?;

        let mut report = LoadReport::default();
        let mut chunks = Vec::new();

        for path in &files {
            let source = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Error loading {}: {}", path.display(), e);
                    report.files_skipped += 1;
                    continue;
                }
            };
            if content.trim().is_empty() {
                tracing::warn!("Empty document {}", source);
                report.files_skipped += 1;
                continue;
            }

            let pieces = chunk_document(&content, &self.chunking);
            tracing::debug!("{} -> {} chunks", source, pieces.len());
            chunks.extend(pieces.into_iter().map(|content| Chunk {
                content,
                source: source.clone(),
            }));
            report.files_loaded += 1;
        }

        if chunks.is_empty() {
            tracing::warn!("No documents were loaded from {}", dir.display());
            chunks.push(Chunk {
                content: SENTINEL_CONTENT.to_string(),
                source: SENTINEL_SOURCE.to_string(),
            });
        }

        let snapshot = match self.embed_chunks(chunks) {
            Ok(snapshot) => snapshot,
            Err((chunks, e)) => {
                tracing::error!(
                    "Error creating embeddings, using {}d zero vectors: {}",
                    self.fallback_dimension,
                    e
                );
                report.embedding_fallback = Some(e.to_string());
                Snapshot::zeroed(chunks, self.fallback_dimension)
            }
        };

        report.chunks = snapshot.len();
        report.dimension = snapshot.dimension();
        *self.current.write() = Some(Arc::new(snapshot));

        tracing::info!(
            "Loaded {} document chunks from {} files ({} skipped)",
            report.chunks,
            report.files_loaded,
            report.files_skipped
        );
        Ok(report)
    }

    /// Hands the chunks back on failure so the caller can build the fallback.
    fn embed_chunks(
        &self,
        chunks: Vec<Chunk>,
    ) -> std::result::Result<Snapshot, (Vec<Chunk>, RagError)> {
        let rows = {
            let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
            self.embedder.encode(&texts)
        };
        let rows = match rows {
            Ok(rows) => rows,
            Err(e) => return Err((chunks, e)),
        };

        let matrix = match stack_rows(rows) {
            Some(matrix) if matrix.ncols() > 0 => matrix,
            _ => return Err((chunks, RagError::embedding("model returned vectors of unequal width"))),
        };
        tracing::debug!("Created embeddings with shape {:?}", matrix.dim());

        Snapshot::new(chunks, matrix).map_err(|chunks| {
            let err = RagError::embedding(format!(
                "model returned the wrong number of vectors for {} chunks",
                chunks.len()
            ));
            (chunks, err)
        })
    }

    /// Ranks chunks against `query`, treating every failure as "no results".
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<RetrievalResult> {
        match self.try_retrieve(query, top_k) {
            Ok(results) => results,
            Err(RetrieveError::EmptyQuery) => {
                tracing::debug!("Empty query");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Error retrieving documents: {}", e);
                Vec::new()
            }
        }
    }

    /// Like [`RetrievalIndex::retrieve`] but reports why nothing was found.
    pub fn try_retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> std::result::Result<Vec<RetrievalResult>, RetrieveError> {
        if query.trim().is_empty() {
            return Err(RetrieveError::EmptyQuery);
        }
        let snapshot = self.snapshot().ok_or(RetrieveError::NoDocuments)?;

        let query_embedding = self
            .embedder
            .encode(&[query])
            .map_err(|e| RetrieveError::Embedding(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| RetrieveError::Embedding("model returned no vector".to_string()))?;

        let results = snapshot.search(&query_embedding, top_k)?;
        tracing::debug!("Query {:?} matched {} chunks", query, results.len());
        Ok(results)
    }
}
