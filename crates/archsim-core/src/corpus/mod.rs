//! Corpus-wide comparison.
//!
//! A [`Corpus`] is loaded from a directory of instance documents, scored pair
//! by pair on a worker pool by the [`CorpusScheduler`], and exported as
//! [`SimilarityMatrix`] CSV files.

mod loader;
mod matrix;
mod scheduler;

pub use loader::{Corpus, ModelSource};
pub use matrix::{sweep_output_path, SimilarityMatrix};
pub use scheduler::{CorpusResult, CorpusScheduler};
