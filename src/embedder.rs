//! Text embedding
//!
//! Maps text to fixed-length dense vectors. Sentence-transformer models run
//! locally through fastembed (ONNX runtime); `lexical-hash` is always
//! available as a model-free candidate.

use crate::error::{RagError, Result};
use crate::lexical::{LEXICAL_MODEL_NAME, LexicalEmbedder};
use std::path::PathBuf;
use std::sync::Arc;

/// Text embedding model.
///
/// Implementations hold no mutable state after construction and can be
/// shared between threads.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts; output order matches input order.
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Length of every vector returned by [`Embedder::encode`].
    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

/// Options shared by every model candidate.
#[derive(Debug, Clone)]
pub struct EmbedderOptions {
    pub cache_dir: Option<PathBuf>,
    /// Width used by `lexical-hash`.
    pub lexical_dimension: usize,
}

impl Default for EmbedderOptions {
    fn default() -> Self {
        Self {
            cache_dir: None,
            lexical_dimension: crate::config::DEFAULT_FALLBACK_DIMENSION,
        }
    }
}

/// Loads the first candidate that succeeds.
///
/// Failures are logged and the next candidate is tried. If every candidate
/// fails, the error lists each attempt.
pub fn load_embedder<S: AsRef<str>>(
    candidates: &[S],
    options: &EmbedderOptions,
) -> Result<Arc<dyn Embedder>> {
    let mut attempts = Vec::new();

    for candidate in candidates {
        let name = candidate.as_ref();
        match load_model(name, options) {
            Ok(embedder) => {
                tracing::info!(
                    "Loaded embedding model {} ({}d)",
                    embedder.model_name(),
                    embedder.dimension()
                );
                return Ok(embedder);
            }
            Err(e) => {
                tracing::warn!("Failed to load embedding model {}: {}", name, e);
                attempts.push((name.to_string(), e.to_string()));
            }
        }
    }

    Err(RagError::NoEmbeddingModel(attempts))
}

fn load_model(name: &str, options: &EmbedderOptions) -> Result<Arc<dyn Embedder>> {
    if name == LEXICAL_MODEL_NAME {
        return Ok(Arc::new(LexicalEmbedder::new(options.lexical_dimension)));
    }

    load_onnx(name, options)
}

#[cfg(feature = "fastembed")]
fn load_onnx(name: &str, options: &EmbedderOptions) -> Result<Arc<dyn Embedder>> {
    let model = onnx::FastEmbedder::load(name, options.cache_dir.clone())?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "fastembed"))]
fn load_onnx(name: &str, _options: &EmbedderOptions) -> Result<Arc<dyn Embedder>> {
    Err(RagError::model(format!(
        "{name} requires the `fastembed` feature"
    )))
}

#[cfg(feature = "fastembed")]
pub use onnx::FastEmbedder;

#[cfg(feature = "fastembed")]
mod onnx {
    use super::Embedder;
    use crate::error::{RagError, Result};
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use std::path::PathBuf;

    /// Sentence-transformer model run through fastembed.
    pub struct FastEmbedder {
        model: TextEmbedding,
        name: String,
        dimension: usize,
    }

    fn resolve_model(name: &str) -> Option<EmbeddingModel> {
        let model = match name.to_ascii_lowercase().as_str() {
            "all-minilm-l6-v2" | "sentence-transformers/all-minilm-l6-v2" => {
                EmbeddingModel::AllMiniLML6V2
            }
            "all-minilm-l12-v2" | "sentence-transformers/all-minilm-l12-v2" => {
                EmbeddingModel::AllMiniLML12V2
            }
            "paraphrase-minilm-l12-v2" => EmbeddingModel::ParaphraseMLMiniLML12V2,
            "bge-small-en-v1.5" | "baai/bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
            "bge-base-en-v1.5" | "baai/bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
            _ => return None,
        };
        Some(model)
    }

    impl FastEmbedder {
        pub fn load(name: &str, cache_dir: Option<PathBuf>) -> Result<Self> {
            let model_id = resolve_model(name)
                .ok_or_else(|| RagError::model(format!("unknown model name: {name}")))?;

            let mut options = InitOptions::new(model_id).with_show_download_progress(false);
            if let Some(dir) = cache_dir {
                options = options.with_cache_dir(dir);
            }

            tracing::debug!("Initializing fastembed model {}", name);
            let model = TextEmbedding::try_new(options)
                .map_err(|e| RagError::model(format!("failed to load {name}: {e}")))?;

            // Probe the output width rather than trusting a table
            let probe = model
                .embed(vec!["test"], None)
                .map_err(|e| RagError::model(format!("failed to encode test string: {e}")))?;
            let dimension = probe
                .first()
                .map(|v| v.len())
                .filter(|d| *d > 0)
                .ok_or_else(|| RagError::model(format!("{name} returned an empty embedding")))?;

            Ok(Self {
                model,
                name: name.to_string(),
                dimension,
            })
        }
    }

    impl Embedder for FastEmbedder {
        fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            if texts.is_empty() {
                return Ok(vec![]);
            }
            self.model
                .embed(texts.to_vec(), None)
                .map_err(|e| RagError::embedding(format!("failed to encode texts: {e}")))
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn model_name(&self) -> &str {
            &self.name
        }
    }

}
