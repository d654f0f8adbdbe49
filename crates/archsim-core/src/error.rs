//! Error types for the similarity engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or comparing models.
#[derive(Debug, Error)]
pub enum SimilarityError {
    /// A field required at this position of the document is absent.
    #[error("Document is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// The document is not valid JSON or does not have the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Embedding model could not be loaded or queried.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Weights are not usable for a production run.
    #[error("Invalid weights: structural {structural} + semantic {semantic} must equal 1")]
    InvalidWeights { structural: f64, semantic: f64 },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SimilarityError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SimilarityError::Io {
            path: path.into(),
            source,
        }
    }
}
