use archsim_core::graph::{GraphBuilder, Model};
use archsim_core::matching::{
    approximate_common_subgraph, jaccard_distance, structural_similarity, CompareMode,
};

const MODES: [CompareMode; 3] = [CompareMode::Max, CompareMode::Min, CompareMode::Average];

fn build(json: &str) -> Model {
    GraphBuilder::default().build_from_json(json).unwrap()
}

fn two_threads(name: &str) -> Model {
    build(&format!(
        r#"{{"name":"{}","category":"system","componentInstance":[
            {{"name":"t1","category":"thread"}},
            {{"name":"t2","category":"thread"}}
        ]}}"#,
        name
    ))
}

#[test]
fn test_self_similarity_is_one_in_every_mode() {
    let model = build(
        r#"{"name":"S","category":"system",
            "componentInstance":[
                {"name":"p","category":"process",
                 "featureInstance":[{"name":"i","category":"dataPort"},{"name":"o","category":"dataPort"}]},
                {"name":"cpu","category":"processor",
                 "featureInstance":{"name":"ba","category":"busAccess"}},
                {"name":"bus","category":"bus"}
            ],
            "connectionInstance":{"source":"//@componentInstance.1/@featureInstance.0",
                                  "destination":"//@componentInstance.2"}}"#,
    );
    let mcs = approximate_common_subgraph(&model, &model);
    assert_eq!(mcs.node_count(), model.node_count());
    assert_eq!(mcs.edge_count(), model.edge_count());

    for mode in MODES {
        let score = structural_similarity(&mcs, &model, &model, mode);
        assert!((score - 1.0).abs() < 1e-12, "{} scored {}", mode, score);
    }
}

#[test]
fn test_same_shape_different_names_is_one() {
    let a = two_threads("A");
    let b = two_threads("B");
    let mcs = approximate_common_subgraph(&a, &b);
    assert_eq!(mcs.node_count(), 3);
    assert_eq!(mcs.edge_count(), 2);
    for mode in MODES {
        assert!((structural_similarity(&mcs, &a, &b, mode) - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_uncategorized_roots_with_one_thread_match_fully() {
    let a = build(r#"{"name":"A","componentInstance":[{"name":"T1","category":"thread"}]}"#);
    let b = build(r#"{"name":"B","componentInstance":[{"name":"T1","category":"thread"}]}"#);
    for model in [&a, &b] {
        assert_eq!(model.node_count(), 2);
        assert_eq!(model.edge_count(), 1);
    }
    let mcs = approximate_common_subgraph(&a, &b);
    assert_eq!(mcs.node_count(), 2);
    assert_eq!(mcs.edge_count(), 1);
    let score = structural_similarity(&mcs, &a, &b, CompareMode::Max);
    assert!((score - 1.0).abs() < 1e-12);
}

#[test]
fn test_no_shared_edges_scores_zero() {
    let a = build(r#"{"name":"A","category":"system","componentInstance":{"name":"x","category":"thread"}}"#);
    let b = build(r#"{"name":"B","category":"system","componentInstance":{"name":"y","category":"memory"}}"#);
    let mcs = approximate_common_subgraph(&a, &b);
    assert!(mcs.is_empty());
    for mode in MODES {
        assert_eq!(structural_similarity(&mcs, &a, &b, mode), 0.0);
    }
}

#[test]
fn test_score_is_symmetric_for_max_and_min_on_subsets() {
    let small = build(r#"{"name":"A","category":"system","componentInstance":{"name":"x","category":"thread"}}"#);
    let large = two_threads("B");

    for mode in [CompareMode::Max, CompareMode::Min] {
        let forward = structural_similarity(
            &approximate_common_subgraph(&small, &large),
            &small,
            &large,
            mode,
        );
        let backward = structural_similarity(
            &approximate_common_subgraph(&large, &small),
            &large,
            &small,
            mode,
        );
        assert!((forward - backward).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&forward));
    }
}

#[test]
fn test_mcs_names_use_category_and_id() {
    let a = two_threads("A");
    let mcs = approximate_common_subgraph(&a, &two_threads("B"));
    let mut names = mcs.node_names();
    names.sort();
    assert_eq!(names, vec!["system 0", "thread 1", "thread 2"]);
}

#[test]
fn test_jaccard_distance_bounds() {
    let a = two_threads("A");
    assert_eq!(jaccard_distance(&a, &two_threads("B")), 0.0);

    let other = build(r#"{"name":"C","category":"bus"}"#);
    let d = jaccard_distance(&a, &other);
    assert!(d > 0.0 && d <= 1.0);
}
