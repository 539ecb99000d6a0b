use crate::error::RetrieveError;
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// A contiguous span of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    /// Originating file name, or `"system"` for the sentinel chunk.
    pub source: String,
}

/// A ranked chunk returned for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub content: String,
    pub source: String,
    /// Cosine similarity between the query and the chunk.
    pub score: f32,
}

/// Chunks and their embedding matrix, built together and never mutated.
///
/// Row `i` of `matrix` is the embedding of `chunks[i]`.
#[derive(Debug)]
pub struct Snapshot {
    chunks: Vec<Chunk>,
    matrix: Array2<f32>,
}

impl Snapshot {
    /// Pairs chunks with their matrix. Hands the chunks back unless there is
    /// exactly one row per chunk.
    pub fn new(chunks: Vec<Chunk>, matrix: Array2<f32>) -> Result<Self, Vec<Chunk>> {
        if matrix.nrows() != chunks.len() {
            return Err(chunks);
        }
        Ok(Self { chunks, matrix })
    }

    pub fn from_rows(chunks: Vec<Chunk>, rows: Vec<Vec<f32>>) -> Option<Self> {
        let matrix = stack_rows(rows)?;
        Self::new(chunks, matrix).ok()
    }

    /// All-zero matrix of the given width; every query scores 0 against it.
    pub fn zeroed(chunks: Vec<Chunk>, dimension: usize) -> Self {
        let matrix = Array2::zeros((chunks.len(), dimension));
        Self { chunks, matrix }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn matrix(&self) -> &Array2<f32> {
        &self.matrix
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.matrix.ncols()
    }

    /// Cosine similarity of `query` against every row, in chunk order.
    pub fn similarities(&self, query: &[f32]) -> Result<Vec<f32>, RetrieveError> {
        if query.len() != self.dimension() {
            return Err(RetrieveError::DimensionMismatch {
                query: query.len(),
                index: self.dimension(),
            });
        }
        let query = ArrayView1::from(query);
        Ok(self
            .matrix
            .axis_iter(Axis(0))
            .map(|row| cosine_similarity(row, query))
            .collect())
    }

    /// The `top_k` highest-scoring chunks, best first.
    ///
    /// Equal scores keep corpus order, so the earlier chunk ranks first.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<RetrievalResult>, RetrieveError> {
        if self.is_empty() {
            return Err(RetrieveError::NoDocuments);
        }
        let scores = self.similarities(query)?;

        let k = top_k.min(self.chunks.len());
        let mut ranked: Vec<usize> = (0..scores.len()).collect();
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        Ok(ranked
            .into_iter()
            .take(k)
            .map(|idx| RetrievalResult {
                content: self.chunks[idx].content.clone(),
                source: self.chunks[idx].source.clone(),
                score: scores[idx],
            })
            .collect())
    }
}

/// Stacks equal-length vectors into a matrix, one row each.
pub fn stack_rows(rows: Vec<Vec<f32>>) -> Option<Array2<f32>> {
    let dimension = rows.first().map_or(0, |r| r.len());
    if rows.iter().any(|r| r.len() != dimension) {
        return None;
    }
    let count = rows.len();
    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((count, dimension), flat).ok()
}

/// Cosine similarity; 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    let dot_product = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
