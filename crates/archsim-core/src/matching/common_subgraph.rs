//! Greedy, category-matched common subgraph.

use petgraph::stable_graph::NodeIndex;
use std::collections::{HashMap, HashSet};

use crate::graph::{Category, ConnectionType, Model};

/// Approximate the common subgraph of two models.
///
/// This is a first-match heuristic, not an exact maximum common subgraph:
///
/// 1. Each vertex of `g1`, in depth-first order from the root, claims the first
///    still-unclaimed vertex of `g2` with the same [`Category`].
/// 2. Each edge of `g1` whose endpoints were both claimed then claims the first
///    remaining edge of `g2` with the same connection type and the same source
///    and target categories.
/// 3. Vertices left without any edge are dropped and the survivors are renamed
///    `"<category> <id>"`.
///
/// The result holds copies of `g1`'s nodes and edges. It is empty when the
/// models share no structure.
pub fn approximate_common_subgraph(g1: &Model, g2: &Model) -> Model {
    let common_vertices = match_vertices(g1, g2);
    let common_set: HashSet<NodeIndex> = common_vertices.iter().copied().collect();
    let mut common_edges = match_edges(g1, g2, &common_set);

    let mut mcs = Model::new(format!("{} ~ {}", g1.name(), g2.name()));
    let mut placed: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(common_vertices.len());

    for idx in &common_vertices {
        if let Some(node) = g1.node(*idx) {
            placed.insert(*idx, mcs.add_node(node.clone()));
        }
    }

    for (source, target, connection) in g1.edges() {
        if !common_edges.take(&(source, target, connection.connection_type())) {
            continue;
        }
        if let (Some(s), Some(t)) = (placed.get(&source), placed.get(&target)) {
            mcs.add_edge(*s, *t, *connection);
        }
    }

    let isolated: Vec<NodeIndex> = mcs
        .node_indices()
        .filter(|idx| mcs.degree(*idx) == 0)
        .collect();
    for idx in isolated {
        mcs.remove_node(idx);
    }

    let survivors: Vec<NodeIndex> = mcs.node_indices().collect();
    for idx in survivors {
        if let Some(node) = mcs.node_mut(idx) {
            let name = format!("{} {}", node.category(), node.id());
            node.set_name(name);
        }
    }

    mcs
}

fn category_of(model: &Model, idx: NodeIndex) -> Option<Category> {
    model.node(idx).map(|n| n.category())
}

/// Indices of `g1` vertices that found a partner in `g2`, in visit order.
fn match_vertices(g1: &Model, g2: &Model) -> Vec<NodeIndex> {
    let mut pool: Vec<Category> = g2.nodes().map(|n| n.category()).collect();
    let mut common = Vec::new();

    for idx in g1.dfs_order() {
        let Some(category) = category_of(g1, idx) else {
            continue;
        };
        if let Some(pos) = pool.iter().position(|c| *c == category) {
            pool.remove(pos);
            common.push(idx);
        }
    }

    common
}

type EdgeKey = (NodeIndex, NodeIndex, ConnectionType);

/// Multiset of claimed `g1` edges, keyed by endpoints and type.
struct ClaimedEdges(HashMap<EdgeKey, usize>);

impl ClaimedEdges {
    /// Consume one copy of `key`; parallel edges with the same key are counted.
    fn take(&mut self, key: &EdgeKey) -> bool {
        match self.0.get_mut(key) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}

fn match_edges(g1: &Model, g2: &Model, common: &HashSet<NodeIndex>) -> ClaimedEdges {
    let mut pool: Vec<(ConnectionType, Option<Category>, Option<Category>)> = g2
        .edges()
        .map(|(s, t, c)| (c.connection_type(), category_of(g2, s), category_of(g2, t)))
        .collect();
    let mut claimed = HashMap::new();

    for (source, target, connection) in g1.edges() {
        if !common.contains(&source) || !common.contains(&target) {
            continue;
        }
        let wanted = (
            connection.connection_type(),
            category_of(g1, source),
            category_of(g1, target),
        );
        if let Some(pos) = pool.iter().position(|candidate| *candidate == wanted) {
            pool.remove(pos);
            *claimed
                .entry((source, target, connection.connection_type()))
                .or_insert(0) += 1;
        }
    }

    ClaimedEdges(claimed)
}
