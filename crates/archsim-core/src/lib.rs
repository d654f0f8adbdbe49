pub mod config;
pub mod corpus;
pub mod document;
pub mod error;
pub mod graph;
pub mod matching;
pub mod semantic;
pub mod similarity;

pub use config::Config;
pub use corpus::{Corpus, CorpusResult, CorpusScheduler, ModelSource, SimilarityMatrix};
pub use document::InstanceDocument;
pub use error::SimilarityError;
pub use graph::{BuildMode, GraphBuilder, Model};
pub use matching::CompareMode;
pub use semantic::{Embedder, SemanticScorer};
pub use similarity::{SimilarityEngine, SimilarityScores, Weights};
