//! Structural comparison of model graphs.
//!
//! - [`approximate_common_subgraph`] - greedy category-matched overlap of two graphs
//! - [`structural_similarity`] - overlap normalized under a [`CompareMode`]
//! - [`jaccard_distance`] - label-multiset distance, a cheaper alternative measure

mod common_subgraph;
mod jaccard;
mod score;

pub use common_subgraph::approximate_common_subgraph;
pub use jaccard::jaccard_distance;
pub use score::{structural_similarity, CompareMode};
