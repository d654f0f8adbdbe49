//! Structural score from a common subgraph.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::graph::Model;

/// How overlap counts are normalized into a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Divide by the larger model's counts.
    #[default]
    Max,
    /// Divide by the smaller model's counts.
    Min,
    /// Mean of the `max` and `min` scores.
    Average,
}

impl CompareMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareMode::Max => "max",
            CompareMode::Min => "min",
            CompareMode::Average => "average",
        }
    }
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompareMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "max" => Ok(CompareMode::Max),
            "min" => Ok(CompareMode::Min),
            "average" | "avg" => Ok(CompareMode::Average),
            other => Err(format!("invalid compare mode '{}' (expected max, min or average)", other)),
        }
    }
}

/// Structural similarity of `g1` and `g2` given their common subgraph.
///
/// Node and edge overlap ratios are averaged. The result is 0 when `mcs` has no
/// vertices and never exceeds 1.
pub fn structural_similarity(mcs: &Model, g1: &Model, g2: &Model, mode: CompareMode) -> f64 {
    if mcs.is_empty() {
        return 0.0;
    }

    let nodes = (mcs.node_count(), g1.node_count(), g2.node_count());
    let edges = (mcs.edge_count(), g1.edge_count(), g2.edge_count());

    let score = match mode {
        CompareMode::Max => overlap(nodes, edges, usize::max),
        CompareMode::Min => overlap(nodes, edges, usize::min),
        CompareMode::Average => {
            (overlap(nodes, edges, usize::max) + overlap(nodes, edges, usize::min)) / 2.0
        }
    };

    score.min(1.0)
}

fn overlap(
    nodes: (usize, usize, usize),
    edges: (usize, usize, usize),
    pick: fn(usize, usize) -> usize,
) -> f64 {
    let node_similarity = ratio(nodes.0, pick(nodes.1, nodes.2));
    let edge_similarity = ratio(edges.0, pick(edges.1, edges.2));
    (node_similarity + edge_similarity) / 2.0
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, Model};
    use crate::matching::approximate_common_subgraph;

    fn build(json: &str) -> Model {
        GraphBuilder::default().build_from_json(json).unwrap()
    }

    #[test]
    fn test_compare_mode_parse() {
        assert_eq!("max".parse::<CompareMode>(), Ok(CompareMode::Max));
        assert_eq!("MIN".parse::<CompareMode>(), Ok(CompareMode::Min));
        assert_eq!("average".parse::<CompareMode>(), Ok(CompareMode::Average));
        assert!("median".parse::<CompareMode>().is_err());
    }

    #[test]
    fn test_empty_subgraph_scores_zero() {
        let g1 = build(r#"{"name":"A","category":"system"}"#);
        let g2 = build(r#"{"name":"B","category":"bus"}"#);
        let mcs = approximate_common_subgraph(&g1, &g2);
        for mode in [CompareMode::Max, CompareMode::Min, CompareMode::Average] {
            assert_eq!(structural_similarity(&mcs, &g1, &g2, mode), 0.0);
        }
    }

    #[test]
    fn test_modes_on_partial_overlap() {
        // g1: root + 1 thread (2 nodes, 1 edge); g2: root + 3 threads (4 nodes, 3 edges)
        let g1 = build(r#"{"name":"A","componentInstance":{"name":"a","category":"thread"}}"#);
        let g2 = build(
            r#"{"name":"B","componentInstance":[
                {"name":"a","category":"thread"},
                {"name":"b","category":"thread"},
                {"name":"c","category":"thread"}
            ]}"#,
        );
        let mcs = approximate_common_subgraph(&g1, &g2);

        let max = structural_similarity(&mcs, &g1, &g2, CompareMode::Max);
        let min = structural_similarity(&mcs, &g1, &g2, CompareMode::Min);
        let avg = structural_similarity(&mcs, &g1, &g2, CompareMode::Average);

        assert!((max - (2.0 / 4.0 + 1.0 / 3.0) / 2.0).abs() < 1e-12);
        assert!((min - 1.0).abs() < 1e-12);
        assert!((avg - (max + min) / 2.0).abs() < 1e-12);
    }
}
