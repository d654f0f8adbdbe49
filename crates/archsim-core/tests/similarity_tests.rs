use archsim_core::semantic::{Embedder, SemanticScorer, StaticEmbedder};
use archsim_core::similarity::combine;
use archsim_core::{CompareMode, InstanceDocument, SimilarityEngine, SimilarityError, Weights};
use std::sync::Arc;

fn engine(mode: CompareMode) -> SimilarityEngine {
    let embedder: Arc<dyn Embedder> = Arc::new(
        StaticEmbedder::new(2)
            .with_word("alpha", vec![1.0, 0.0])
            .with_word("beta", vec![0.6, 0.8])
            .with_word("worker", vec![0.0, 1.0]),
    );
    SimilarityEngine::new(SemanticScorer::new(embedder), mode)
}

fn threads(name: &str) -> InstanceDocument {
    InstanceDocument::from_json_str(&format!(
        r#"{{"name":"{}","category":"system","componentInstance":[
            {{"name":"worker_1","category":"thread"}},
            {{"name":"worker_2","category":"thread"}}
        ]}}"#,
        name
    ))
    .unwrap()
}

#[test]
fn test_identical_structure_scores_one() {
    let engine = engine(CompareMode::Max);
    let scores = engine
        .score(&threads("alpha"), &threads("beta"), "alpha.json", "beta.json", Weights::default())
        .unwrap();
    assert!((scores.structural - 1.0).abs() < 1e-12);
    assert!(scores.semantic > 0.0 && scores.semantic < 1.0);
    let expected = 0.5 * 1.0 + 0.5 * scores.semantic_normalized();
    assert!((scores.combined - expected).abs() < 1e-12);
}

#[test]
fn test_self_comparison() {
    let engine = engine(CompareMode::Average);
    let doc = threads("alpha");
    let scores = engine
        .score(&doc, &doc, "alpha.json", "alpha.json", Weights::new(0.3, 0.7))
        .unwrap();
    assert!((scores.structural - 1.0).abs() < 1e-12);
    assert!((scores.semantic - 1.0).abs() < 1e-9);
    assert!((scores.combined - 1.0).abs() < 1e-9);
}

#[test]
fn test_score_is_symmetric() {
    let engine = engine(CompareMode::Min);
    let a = threads("alpha");
    let b = InstanceDocument::from_json_str(
        r#"{"name":"beta","category":"system","componentInstance":{"name":"worker","category":"thread"}}"#,
    )
    .unwrap();
    let ab = engine.score(&a, &b, "a", "b", Weights::default()).unwrap();
    let ba = engine.score(&b, &a, "b", "a", Weights::default()).unwrap();
    assert!((ab.structural - ba.structural).abs() < 1e-12);
    assert!((ab.semantic - ba.semantic).abs() < 1e-12);
    assert!((ab.combined - ba.combined).abs() < 1e-12);
}

#[test]
fn test_sweep_weights_sum_to_one() {
    let splits = Weights::sweep();
    assert_eq!(splits.len(), 11);
    for (i, w) in splits.iter().enumerate() {
        assert!((w.structural - i as f64 / 10.0).abs() < 1e-12);
        assert!((w.structural + w.semantic - 1.0).abs() < 1e-12);
        assert!(w.validate().is_ok());
    }
}

#[test]
fn test_combine_uses_normalized_semantic() {
    let w = Weights::new(0.5, 0.5);
    assert!((combine(1.0, -1.0, w) - 0.5).abs() < 1e-12);
    assert!((combine(0.0, 1.0, w) - 0.5).abs() < 1e-12);
    assert!((combine(1.0, 1.0, w) - 1.0).abs() < 1e-12);
}

#[test]
fn test_invalid_weights() {
    let err = Weights::new(0.7, 0.7).validate().unwrap_err();
    assert!(matches!(err, SimilarityError::InvalidWeights { .. }));
    assert!(err.to_string().contains("must equal 1"));
}
