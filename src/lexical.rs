//! Model-free embedder that hashes normalised tokens into a fixed number of
//! buckets. Useful offline and wherever results must not depend on a
//! downloaded model.

use crate::embedder::Embedder;
use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::{FxHashSet, FxHasher};
use std::hash::{Hash, Hasher};
use unicode_normalization::UnicodeNormalization;

pub const LEXICAL_MODEL_NAME: &str = "lexical-hash";

lazy_static! {
    static ref STOP_WORDS: FxHashSet<&'static str> = {
        let words = vec![
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from",
            "has", "he", "in", "is", "it", "its", "of", "on", "that", "the",
            "to", "was", "were", "will", "with"
        ];
        words.into_iter().collect()
    };
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();
}

pub struct LexicalEmbedder {
    dimension: usize,
}

impl LexicalEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn tokenize(text: &str) -> Vec<String> {
        let text = text.nfc().collect::<String>().to_lowercase();
        let text = NON_WORD.replace_all(&text, " ");

        text.split_whitespace()
            .filter(|&token| !STOP_WORDS.contains(token))
            .map(|token| token.to_string())
            .collect()
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hasher = FxHasher::default();
        token.hash(&mut hasher);
        (hasher.finish() % self.dimension as u64) as usize
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in Self::tokenize(text) {
            vector[self.bucket(&token)] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

impl Embedder for LexicalEmbedder {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        LEXICAL_MODEL_NAME
    }
}
