//! Jaccard distance over category-labelled vertices and edges.

use std::collections::BTreeMap;

use crate::graph::{Category, ConnectionType, Model};

/// Jaccard distance between two models, averaged over vertices and edges.
///
/// Node ids are local to each build, so vertices are compared by category and
/// edges by `(type, source category, target category)`, both as multisets.
/// Identical models are at distance 0, models sharing no label at distance 1.
pub fn jaccard_distance(g1: &Model, g2: &Model) -> f64 {
    let vertex_distance = multiset_distance(&vertex_labels(g1), &vertex_labels(g2));
    let edge_distance = multiset_distance(&edge_labels(g1), &edge_labels(g2));
    (vertex_distance + edge_distance) / 2.0
}

type EdgeLabel = (ConnectionType, Category, Category);

fn vertex_labels(model: &Model) -> BTreeMap<Category, usize> {
    model.category_histogram()
}

fn edge_labels(model: &Model) -> BTreeMap<EdgeLabel, usize> {
    let mut labels = BTreeMap::new();
    for (source, target, connection) in model.edges() {
        if let (Some(s), Some(t)) = (model.node(source), model.node(target)) {
            *labels
                .entry((connection.connection_type(), s.category(), t.category()))
                .or_insert(0) += 1;
        }
    }
    labels
}

fn multiset_distance<K: Ord>(a: &BTreeMap<K, usize>, b: &BTreeMap<K, usize>) -> f64 {
    let mut intersection = 0usize;
    let mut union = 0usize;

    for (key, &count_a) in a {
        let count_b = b.get(key).copied().unwrap_or(0);
        intersection += count_a.min(count_b);
        union += count_a.max(count_b);
    }
    for (key, &count_b) in b {
        if !a.contains_key(key) {
            union += count_b;
        }
    }

    if union == 0 {
        return 0.0;
    }
    1.0 - intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn build(json: &str) -> Model {
        GraphBuilder::default().build_from_json(json).unwrap()
    }

    #[test]
    fn test_identical_models_are_at_zero() {
        let json = r#"{"name":"A","componentInstance":[{"name":"t","category":"thread"}]}"#;
        assert_eq!(jaccard_distance(&build(json), &build(json)), 0.0);
    }

    #[test]
    fn test_disjoint_models_are_at_one() {
        let g1 = build(r#"{"name":"A","category":"system","componentInstance":{"name":"t","category":"thread"}}"#);
        let g2 = build(r#"{"name":"B","category":"bus","componentInstance":{"name":"m","category":"memory"}}"#);
        assert_eq!(jaccard_distance(&g1, &g2), 1.0);
    }

    #[test]
    fn test_partial_overlap() {
        // vertices {unknown, thread} vs {unknown, thread, thread}: 1 - 2/3
        // edges {(father, unknown, thread)} vs two copies: 1 - 1/2
        let g1 = build(r#"{"name":"A","componentInstance":{"name":"t","category":"thread"}}"#);
        let g2 = build(
            r#"{"name":"B","componentInstance":[{"name":"t","category":"thread"},{"name":"u","category":"thread"}]}"#,
        );
        let expected = ((1.0 - 2.0 / 3.0) + 0.5) / 2.0;
        assert!((jaccard_distance(&g1, &g2) - expected).abs() < 1e-12);
    }
}
