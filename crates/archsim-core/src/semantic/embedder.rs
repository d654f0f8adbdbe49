//! Embedding lookup for component names.

use dashmap::DashMap;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SimilarityError;

/// Lookup of embedding vectors for words and short phrases.
///
/// Implementations are loaded once and then shared read-only across worker
/// threads, hence `Send + Sync`.
pub trait Embedder: Send + Sync {
    /// Vector for `text`, or `None` when the model has nothing for it.
    fn vector(&self, text: &str) -> Option<Vec<f32>>;

    /// Dimensionality of every vector this embedder returns.
    fn dimension(&self) -> usize;

    /// Get the model name.
    fn model_name(&self) -> &str;
}

// =============================================================================
// FASTEMBED
// =============================================================================

/// FastEmbed-based embedder.
pub struct FastEmbedder {
    model: TextEmbedding,
    dimension: usize,
    model_name: String,
}

impl FastEmbedder {
    /// Create a new FastEmbed embedder with the default model.
    /// Uses `~/.archsim/cache/` as the model cache directory.
    pub fn new() -> Result<Self, SimilarityError> {
        Self::with_model_and_cache(EmbeddingModel::BGESmallENV15, Self::default_cache_dir())
    }

    /// Create a new FastEmbed embedder with a specific model and cache directory.
    pub fn with_model_and_cache(
        model: EmbeddingModel,
        cache_dir: PathBuf,
    ) -> Result<Self, SimilarityError> {
        let model_name = format!("{:?}", model);

        fs::create_dir_all(&cache_dir).map_err(|e| SimilarityError::io(&cache_dir, e))?;

        let text_embedding = TextEmbedding::try_new(
            InitOptions::new(model)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(true),
        )
        .map_err(|e| SimilarityError::Embedding(e.to_string()))?;

        // Get dimension from a sample embedding
        let sample = text_embedding
            .embed(vec!["word"], None)
            .map_err(|e| SimilarityError::Embedding(e.to_string()))?;
        let dimension = sample.first().map(|v| v.len()).unwrap_or(384);

        Ok(Self {
            model: text_embedding,
            dimension,
            model_name,
        })
    }

    /// Resolve a model by its fastembed name, e.g. `BGESmallENV15`.
    pub fn model_from_name(name: &str) -> Result<EmbeddingModel, SimilarityError> {
        TextEmbedding::list_supported_models()
            .into_iter()
            .map(|info| info.model)
            .find(|model| format!("{:?}", model).eq_ignore_ascii_case(name))
            .ok_or_else(|| SimilarityError::Embedding(format!("unsupported embedding model: {}", name)))
    }

    /// Get the default cache directory: `~/.archsim/cache/`
    pub fn default_cache_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".archsim")
            .join("cache")
    }
}

impl Embedder for FastEmbedder {
    fn vector(&self, text: &str) -> Option<Vec<f32>> {
        match self.model.embed(vec![text], None) {
            Ok(mut vectors) => vectors.pop().filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::debug!(text, error = %e, "embedding failed");
                None
            }
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

// =============================================================================
// STATIC TABLE
// =============================================================================

/// In-memory word vectors, such as a fastText `.vec` export.
///
/// Multi-word queries average the vectors of the words that are present.
#[derive(Debug, Clone, Default)]
pub struct StaticEmbedder {
    words: HashMap<String, Vec<f32>>,
    dimension: usize,
    model_name: String,
}

impl StaticEmbedder {
    /// Create an empty table of the given dimensionality.
    pub fn new(dimension: usize) -> Self {
        Self {
            words: HashMap::new(),
            dimension,
            model_name: "static".to_string(),
        }
    }

    /// Add a word vector. Vectors of the wrong length are ignored.
    pub fn insert(&mut self, word: impl Into<String>, vector: Vec<f32>) {
        if vector.len() == self.dimension {
            self.words.insert(word.into().to_lowercase(), vector);
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_word(mut self, word: impl Into<String>, vector: Vec<f32>) -> Self {
        self.insert(word, vector);
        self
    }

    /// Load a text vector file: one `word v1 v2 ...` entry per line, with an
    /// optional `count dimension` header line.
    pub fn from_vec_file(path: impl AsRef<Path>) -> Result<Self, SimilarityError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SimilarityError::io(path, e))?;
        let mut table: Option<StaticEmbedder> = None;

        for (line_no, line) in content.lines().enumerate() {
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let values = match parts.map(str::parse::<f32>).collect::<Result<Vec<_>, _>>() {
                Ok(values) => values,
                Err(_) => {
                    tracing::debug!(line = line_no + 1, "skipping unparsable vector line");
                    continue;
                }
            };

            if line_no == 0 && values.len() == 1 && word.parse::<usize>().is_ok() {
                continue;
            }
            if values.is_empty() {
                continue;
            }

            let table = table.get_or_insert_with(|| StaticEmbedder::new(values.len()));
            table.insert(word, values);
        }

        let mut table = table.ok_or_else(|| {
            SimilarityError::Embedding(format!("no vectors found in {}", path.display()))
        })?;
        table.model_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("static")
            .to_string();
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Embedder for StaticEmbedder {
    fn vector(&self, text: &str) -> Option<Vec<f32>> {
        let text = text.to_lowercase();
        if let Some(v) = self.words.get(&text) {
            return Some(v.clone());
        }

        let mut sum = vec![0.0f32; self.dimension];
        let mut found = 0usize;
        for token in text.split_whitespace() {
            if let Some(v) = self.words.get(token) {
                for (acc, x) in sum.iter_mut().zip(v) {
                    *acc += x;
                }
                found += 1;
            }
        }

        if found == 0 {
            return None;
        }
        for acc in &mut sum {
            *acc /= found as f32;
        }
        Some(sum)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

// =============================================================================
// CACHE
// =============================================================================

/// Memoizes lookups of an inner embedder.
///
/// A corpus pass asks for the same names once per pair, so the cache turns
/// O(n²) model calls into one call per distinct name.
pub struct CachedEmbedder<E> {
    inner: E,
    cache: DashMap<String, Option<Vec<f32>>>,
}

impl<E: Embedder> CachedEmbedder<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    /// Number of distinct queries seen so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl<E: Embedder> Embedder for CachedEmbedder<E> {
    fn vector(&self, text: &str) -> Option<Vec<f32>> {
        if let Some(hit) = self.cache.get(text) {
            return hit.value().clone();
        }
        let vector = self.inner.vector(text);
        self.cache.insert(text.to_string(), vector.clone());
        vector
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn vector(&self, text: &str) -> Option<Vec<f32>> {
        (**self).vector(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
