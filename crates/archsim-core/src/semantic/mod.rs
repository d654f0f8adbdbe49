//! Semantic similarity from component naming.
//!
//! Every `name` in a document is normalized (see [`NameNormalizer`]), looked up
//! in an [`Embedder`], and the resolved vectors are averaged into one vector per
//! document. Two documents are then compared by cosine similarity.
//!
//! A document none of whose names resolve has *no* vector, which is distinct
//! from an all-zero vector; either way its similarity to anything is 0.

mod embedder;
mod normalize;

pub use embedder::{CachedEmbedder, Embedder, FastEmbedder, StaticEmbedder};
pub use normalize::{NameNormalizer, DEFAULT_STOP_WORDS, MIN_NAME_LEN};

use std::sync::Arc;
use tracing::debug;

use crate::document::InstanceDocument;

/// Scores documents by the meaning of their component names.
#[derive(Clone)]
pub struct SemanticScorer {
    embedder: Arc<dyn Embedder>,
    normalizer: NameNormalizer,
}

impl SemanticScorer {
    /// Create a scorer with the default stop words.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            normalizer: NameNormalizer::default(),
        }
    }

    /// Replace the name normalizer.
    pub fn with_normalizer(mut self, normalizer: NameNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Raw cosine similarity of two documents' names, in `[-1, 1]`.
    pub fn similarity(&self, doc1: &InstanceDocument, doc2: &InstanceDocument) -> f64 {
        self.names_similarity(&doc1.names(), &doc2.names())
    }

    /// Raw cosine similarity of two name lists.
    pub fn names_similarity<S: AsRef<str>>(&self, names1: &[S], names2: &[S]) -> f64 {
        let v1 = self.names_vector(names1);
        let v2 = self.names_vector(names2);

        if v1.is_none() {
            debug!("first name list has no resolvable vector");
        }
        if v2.is_none() {
            debug!("second name list has no resolvable vector");
        }

        match (v1, v2) {
            (Some(a), Some(b)) => cosine_similarity(&a, &b),
            _ => 0.0,
        }
    }

    /// Averaged vector of a document's names, if any of them resolves.
    pub fn document_vector(&self, document: &InstanceDocument) -> Option<Vec<f64>> {
        self.names_vector(&document.names())
    }

    fn names_vector<S: AsRef<str>>(&self, names: &[S]) -> Option<Vec<f64>> {
        let cleaned = self.normalizer.clean(names);
        average_vector(self.embedder.as_ref(), &cleaned)
    }

    /// Cosine similarity of two single words; 0 when either is unknown.
    pub fn word_similarity(&self, word1: &str, word2: &str) -> f64 {
        match (self.embedder.vector(word1), self.embedder.vector(word2)) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => {
                cosine_similarity(&widen(&a), &widen(&b))
            }
            _ => {
                debug!(word1, word2, "word not found in the embedding model");
                0.0
            }
        }
    }
}

fn widen(v: &[f32]) -> Vec<f64> {
    v.iter().map(|x| f64::from(*x)).collect()
}

/// Element-wise mean of the vectors of every name the embedder resolves.
///
/// Returns `None` when no name resolves. Vectors whose length differs from the
/// embedder's dimension are skipped.
pub fn average_vector<S: AsRef<str>>(embedder: &dyn Embedder, names: &[S]) -> Option<Vec<f64>> {
    let dimension = embedder.dimension();
    let mut sum = vec![0.0f64; dimension];
    let mut resolved = 0usize;

    for name in names {
        let name = name.as_ref();
        match embedder.vector(name) {
            Some(v) if !v.is_empty() && v.len() == dimension => {
                for (acc, x) in sum.iter_mut().zip(&v) {
                    *acc += f64::from(*x);
                }
                resolved += 1;
            }
            Some(v) if !v.is_empty() => {
                debug!(name, len = v.len(), dimension, "vector length mismatch, skipping name");
            }
            _ => debug!(name, "no embedding for name"),
        }
    }

    if resolved == 0 {
        return None;
    }

    for acc in &mut sum {
        *acc /= resolved as f64;
    }
    Some(sum)
}

/// Cosine similarity: dot product over the product of norms; 0 if either norm is 0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let norm_a = norm_a.sqrt();
    let norm_b = norm_b.sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
