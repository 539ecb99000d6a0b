//! Error types for local-rag

use thiserror::Error;

/// Errors raised while building the embedder or loading the corpus
#[derive(Debug, Error)]
pub enum RagError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A single embedding model failed to load
    #[error("Model error: {0}")]
    Model(String),

    /// Embedding generation error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Every candidate model failed to load
    #[error("No embedding model could be loaded (tried: {})", format_attempts(.0))]
    NoEmbeddingModel(Vec<(String, String)>),

    /// Rejected document on import
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),
}

fn format_attempts(attempts: &[(String, String)]) -> String {
    if attempts.is_empty() {
        return "none".to_string();
    }
    attempts
        .iter()
        .map(|(name, reason)| format!("{name}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl RagError {
    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create an embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create an invalid document error
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Why a query produced no results.
///
/// [`crate::RetrievalIndex::retrieve`] flattens all of these into an empty
/// result list; [`crate::RetrievalIndex::try_retrieve`] exposes them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RetrieveError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("no documents have been loaded")]
    NoDocuments,

    #[error("query embedding failed: {0}")]
    Embedding(String),

    #[error("query vector has {query} dimensions, index has {index}")]
    DimensionMismatch { query: usize, index: usize },
}

/// Result type for corpus and model operations
pub type Result<T> = std::result::Result<T, RagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_model_lists_attempts() {
        let err = RagError::NoEmbeddingModel(vec![
            ("all-MiniLM-L6-v2".into(), "download failed".into()),
            ("bge-small-en-v1.5".into(), "download failed".into()),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("all-MiniLM-L6-v2: download failed"));
        assert!(msg.contains("bge-small-en-v1.5"));
    }

    #[test]
    fn test_no_model_without_attempts() {
        let err = RagError::NoEmbeddingModel(vec![]);
        assert!(err.to_string().contains("tried: none"));
    }
}
