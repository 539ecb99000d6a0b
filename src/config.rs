use crate::error::{RagError, Result};
use std::path::PathBuf;

/// Number of results returned when the caller does not ask for a specific count.
pub const DEFAULT_TOP_K: usize = 3;

/// Width of the zero matrix used when corpus embedding fails.
pub const DEFAULT_FALLBACK_DIMENSION: usize = 384;

/// Primary model first, smaller fallback second.
pub const DEFAULT_MODELS: &[&str] = &["all-MiniLM-L6-v2", "bge-small-en-v1.5"];

/// Word-window parameters for splitting documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Window length in words. Also the character threshold below which a
    /// document is kept whole.
    pub chunk_size: usize,
    /// Words shared between consecutive windows.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagError::config("chunk_size must be at least 1"));
        }
        if self.overlap >= self.chunk_size {
            tracing::warn!(
                chunk_size = self.chunk_size,
                overlap = self.overlap,
                "overlap >= chunk_size, windows will advance one word at a time"
            );
        }
        Ok(())
    }

    /// Distance between consecutive window starts, never zero.
    pub fn step(&self) -> usize {
        self.chunk_size.saturating_sub(self.overlap).max(1)
    }
}

pub struct RagConfig {
    pub docs_dir: PathBuf,
    /// Embedding model candidates, tried in order.
    pub models: Vec<String>,
    /// Where downloaded model files are cached. `None` uses the platform cache dir.
    pub model_cache_dir: Option<PathBuf>,
    pub chunking: ChunkingConfig,
    pub top_k: usize,
    pub fallback_dimension: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("data/documents"),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            model_cache_dir: None,
            chunking: ChunkingConfig::default(),
            top_k: DEFAULT_TOP_K,
            fallback_dimension: DEFAULT_FALLBACK_DIMENSION,
        }
    }
}

impl RagConfig {
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        if self.models.is_empty() {
            return Err(RagError::config("at least one embedding model is required"));
        }
        if self.top_k == 0 {
            return Err(RagError::config("top_k must be positive"));
        }
        if self.fallback_dimension == 0 {
            return Err(RagError::config("fallback_dimension must be positive"));
        }
        Ok(())
    }

    /// Model cache directory, defaulting to `<cache>/local-rag/models`.
    pub fn resolved_model_cache_dir(&self) -> Option<PathBuf> {
        self.model_cache_dir.clone().or_else(|| {
            dirs::cache_dir().map(|dir| dir.join("local-rag").join("models"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_step() {
        assert_eq!(ChunkingConfig::default().step(), 800);
    }

    #[test]
    fn test_step_clamped_when_overlap_too_large() {
        let config = ChunkingConfig {
            chunk_size: 10,
            overlap: 10,
        };
        assert_eq!(config.step(), 1);
        assert!(config.validate().is_ok());

        let config = ChunkingConfig {
            chunk_size: 10,
            overlap: 50,
        };
        assert_eq!(config.step(), 1);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = ChunkingConfig {
            chunk_size: 0,
            overlap: 0,
        };
        assert!(matches!(config.validate(), Err(RagError::Config(_))));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = RagConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.models[0], "all-MiniLM-L6-v2");
        assert_eq!(config.top_k, 3);
    }

    #[test]
    fn test_explicit_cache_dir_wins() {
        let config = RagConfig {
            model_cache_dir: Some(PathBuf::from("/tmp/models")),
            ..RagConfig::default()
        };
        assert_eq!(
            config.resolved_model_cache_dir(),
            Some(PathBuf::from("/tmp/models"))
        );
    }
}
