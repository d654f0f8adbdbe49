//! Corpus discovery on disk.

use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

use crate::config::DOCUMENT_EXTENSION;
use crate::document::InstanceDocument;
use crate::error::SimilarityError;

/// One model of a corpus: its id (the file name) and its unparsed JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    pub id: String,
    pub json: String,
}

impl ModelSource {
    pub fn new(id: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            json: json.into(),
        }
    }

    /// Parse the JSON into a document.
    pub fn document(&self) -> Result<InstanceDocument, SimilarityError> {
        InstanceDocument::from_json_str(&self.json)
    }
}

/// An ordered list of models. Position in the list is the matrix index.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    sources: Vec<ModelSource>,
}

impl Corpus {
    pub fn new(sources: Vec<ModelSource>) -> Self {
        Self { sources }
    }

    /// Load every `*.json` file directly inside `dir`, sorted by file name.
    ///
    /// Subdirectories and hidden files are not visited. Files are read but not
    /// parsed; malformed documents surface per pair during scheduling.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, SimilarityError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(SimilarityError::io(
                dir,
                io::Error::new(io::ErrorKind::NotFound, "corpus directory not found"),
            ));
        }

        let walker = WalkBuilder::new(dir)
            .max_depth(Some(1))
            .hidden(true)
            .git_ignore(false)
            .build();

        let mut sources = Vec::new();
        for entry in walker.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if extension != DOCUMENT_EXTENSION {
                continue;
            }

            let Some(id) = path.file_name().and_then(|n| n.to_str()) else {
                debug!(path = %path.display(), "skipping file with non UTF-8 name");
                continue;
            };

            let json = fs::read_to_string(path).map_err(|e| SimilarityError::io(path, e))?;
            sources.push(ModelSource::new(id, json));
        }

        sources.sort_by(|a, b| a.id.cmp(&b.id));
        debug!(dir = %dir.display(), models = sources.len(), "corpus loaded");

        Ok(Self { sources })
    }

    pub fn sources(&self) -> &[ModelSource] {
        &self.sources
    }

    pub fn ids(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Number of unordered pairs `(i, j)` with `i <= j`.
    pub fn pair_count(&self) -> usize {
        let n = self.len();
        n * (n + 1) / 2
    }
}
