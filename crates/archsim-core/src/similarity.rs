//! Combined similarity of two instance documents.
//!
//! The structural score comes from the approximate common subgraph of the two
//! complete-mode graphs, the semantic score from the names each document
//! declares. Semantic cosine values live in `[-1, 1]` and are mapped onto
//! `[0, 1]` before weighting, so the combined score of a production run is
//! always in `[0, 1]`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{
    DEFAULT_WEIGHT_SEMANTIC, DEFAULT_WEIGHT_STRUCTURAL, SWEEP_STEPS, WEIGHT_SUM_TOLERANCE,
};
use crate::document::InstanceDocument;
use crate::error::SimilarityError;
use crate::graph::{BuildMode, GraphBuilder, Model};
use crate::matching::{approximate_common_subgraph, structural_similarity, CompareMode};
use crate::semantic::SemanticScorer;

/// Relative weight of the structural and semantic scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub structural: f64,
    pub semantic: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            structural: DEFAULT_WEIGHT_STRUCTURAL,
            semantic: DEFAULT_WEIGHT_SEMANTIC,
        }
    }
}

impl Weights {
    pub fn new(structural: f64, semantic: f64) -> Self {
        Self {
            structural,
            semantic,
        }
    }

    /// Reject weights that do not sum to 1.
    pub fn validate(&self) -> Result<(), SimilarityError> {
        let sum = self.structural + self.semantic;
        if !sum.is_finite() || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SimilarityError::InvalidWeights {
                structural: self.structural,
                semantic: self.semantic,
            });
        }
        Ok(())
    }

    /// The eleven splits `0.0/1.0, 0.1/0.9, ..., 1.0/0.0` used by a weight sweep.
    ///
    /// The structural weight is rounded to one decimal and the semantic weight
    /// is its complement.
    pub fn sweep() -> Vec<Weights> {
        (0..=SWEEP_STEPS)
            .map(|i| {
                let structural = (i as f64 / SWEEP_STEPS as f64 * 10.0).round() / 10.0;
                Weights::new(structural, 1.0 - structural)
            })
            .collect()
    }
}

/// The three scores of one document pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScores {
    /// Structural score in `[0, 1]`.
    pub structural: f64,
    /// Raw cosine similarity in `[-1, 1]`.
    pub semantic: f64,
    /// Weighted combination of the structural and normalized semantic scores.
    pub combined: f64,
}

impl SimilarityScores {
    /// Semantic score mapped onto `[0, 1]`.
    pub fn semantic_normalized(&self) -> f64 {
        normalize_semantic(self.semantic)
    }

    /// Recombine the same component scores under different weights.
    pub fn reweighted(&self, weights: Weights) -> Self {
        Self {
            combined: combine(self.structural, self.semantic, weights),
            ..*self
        }
    }
}

/// Map a cosine similarity from `[-1, 1]` onto `[0, 1]`.
pub fn normalize_semantic(raw: f64) -> f64 {
    (1.0 + raw) / 2.0
}

/// Weighted sum of a structural score and a raw semantic score.
pub fn combine(structural: f64, semantic: f64, weights: Weights) -> f64 {
    weights.structural * structural.min(1.0) + weights.semantic * normalize_semantic(semantic)
}

/// Computes [`SimilarityScores`] for document pairs.
///
/// Shared read-only across worker threads; graphs are rebuilt per call.
#[derive(Clone)]
pub struct SimilarityEngine {
    builder: GraphBuilder,
    scorer: SemanticScorer,
    compare_mode: CompareMode,
}

impl SimilarityEngine {
    pub fn new(scorer: SemanticScorer, compare_mode: CompareMode) -> Self {
        Self {
            builder: GraphBuilder::new(BuildMode::Complete),
            scorer,
            compare_mode,
        }
    }

    pub fn compare_mode(&self) -> CompareMode {
        self.compare_mode
    }

    pub fn scorer(&self) -> &SemanticScorer {
        &self.scorer
    }

    /// Structural score of two documents under this engine's compare mode.
    pub fn structural(
        &self,
        doc1: &InstanceDocument,
        doc2: &InstanceDocument,
    ) -> Result<f64, SimilarityError> {
        let g1 = self.builder.build(doc1)?;
        let g2 = self.builder.build(doc2)?;
        Ok(self.structural_between(&g1, &g2))
    }

    fn structural_between(&self, g1: &Model, g2: &Model) -> f64 {
        let mcs = approximate_common_subgraph(g1, g2);

        debug!(
            model1 = g1.name(),
            model2 = g2.name(),
            mcs_nodes = mcs.node_count(),
            mcs_edges = mcs.edge_count(),
            "common subgraph computed"
        );

        structural_similarity(&mcs, g1, g2, self.compare_mode).min(1.0)
    }

    /// Score one pair of documents.
    ///
    /// `name1` and `name2` identify the documents in logs only.
    pub fn score(
        &self,
        doc1: &InstanceDocument,
        doc2: &InstanceDocument,
        name1: &str,
        name2: &str,
        weights: Weights,
    ) -> Result<SimilarityScores, SimilarityError> {
        let g1 = self.builder.build(doc1)?;
        let g2 = self.builder.build(doc2)?;

        if name1 == name2 {
            info!(
                model = name1,
                nodes = g1.node_count(),
                edges = g1.edge_count(),
                "comparing model with itself"
            );
        }

        let structural = self.structural_between(&g1, &g2);
        let semantic = self.scorer.similarity(doc1, doc2);
        let combined = combine(structural, semantic, weights);

        debug!(
            name1,
            name2,
            structural,
            semantic,
            combined,
            "pair scored"
        );

        Ok(SimilarityScores {
            structural,
            semantic,
            combined,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::{Embedder, StaticEmbedder};
    use std::sync::Arc;

    fn engine(mode: CompareMode) -> SimilarityEngine {
        let embedder: Arc<dyn Embedder> = Arc::new(
            StaticEmbedder::new(2)
                .with_word("heater", vec![1.0, 0.0])
                .with_word("pump", vec![-1.0, 0.0]),
        );
        SimilarityEngine::new(SemanticScorer::new(embedder), mode)
    }

    fn doc(json: &str) -> InstanceDocument {
        InstanceDocument::from_json_str(json).unwrap()
    }

    #[test]
    fn test_weights_validate() {
        assert!(Weights::new(0.5, 0.5).validate().is_ok());
        assert!(Weights::new(0.3, 0.7).validate().is_ok());
        assert!(matches!(
            Weights::new(0.6, 0.6).validate(),
            Err(SimilarityError::InvalidWeights { .. })
        ));
        assert!(Weights::new(f64::NAN, 0.5).validate().is_err());
    }

    #[test]
    fn test_sweep_splits() {
        let splits = Weights::sweep();
        assert_eq!(splits.len(), 11);
        assert_eq!(splits[0].structural, 0.0);
        assert_eq!(splits[3].structural, 0.3);
        assert_eq!(splits[10].structural, 1.0);
        for w in &splits {
            assert!((w.structural + w.semantic - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_normalize_semantic() {
        assert_eq!(normalize_semantic(-1.0), 0.0);
        assert_eq!(normalize_semantic(0.0), 0.5);
        assert_eq!(normalize_semantic(1.0), 1.0);
    }

    #[test]
    fn test_identical_documents_score_one() {
        let engine = engine(CompareMode::Max);
        let a = doc(
            r#"{"name":"Heater","category":"system",
                "componentInstance":[{"name":"heater_t1","category":"thread"},
                                     {"name":"heater_t2","category":"thread"}]}"#,
        );
        let scores = engine
            .score(&a, &a, "a", "a", Weights::new(0.5, 0.5))
            .unwrap();
        assert!((scores.structural - 1.0).abs() < 1e-12);
        assert!((scores.semantic - 1.0).abs() < 1e-9);
        assert!((scores.combined - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_opposite_names_combine_structure_only() {
        let engine = engine(CompareMode::Max);
        let a = doc(
            r#"{"name":"Heater","category":"system",
                "componentInstance":{"name":"x1","category":"thread"}}"#,
        );
        let b = doc(
            r#"{"name":"Pump","category":"system",
                "componentInstance":[{"name":"x1","category":"thread"},
                                     {"name":"x2","category":"thread"}]}"#,
        );
        let scores = engine
            .score(&a, &b, "a", "b", Weights::new(0.5, 0.5))
            .unwrap();
        // 2 of 3 vertices and 1 of 2 edges matched.
        let expected = (2.0 / 3.0 + 1.0 / 2.0) / 2.0;
        assert!((scores.structural - expected).abs() < 1e-12);
        assert!((scores.semantic + 1.0).abs() < 1e-9);
        assert!((scores.combined - expected / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_reweighted_keeps_component_scores() {
        let scores = SimilarityScores {
            structural: 0.8,
            semantic: 0.0,
            combined: 0.0,
        };
        let r = scores.reweighted(Weights::new(1.0, 0.0));
        assert_eq!(r.structural, 0.8);
        assert!((r.combined - 0.8).abs() < 1e-12);
        let r = scores.reweighted(Weights::new(0.0, 1.0));
        assert!((r.combined - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_root_name_fails() {
        let engine = engine(CompareMode::Max);
        let a = doc(r#"{"category":"system"}"#);
        let b = doc(r#"{"name":"B"}"#);
        assert!(matches!(
            engine.score(&a, &b, "a", "b", Weights::default()),
            Err(SimilarityError::MissingField { .. })
        ));
    }
}
