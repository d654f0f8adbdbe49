//! Model graphs built from instance documents.
//!
//! # Components
//!
//! - [`Node`] / [`Category`] / [`Kind`] - typed vertices
//! - [`Connection`] / [`ConnectionType`] - typed edges (father, feature, connection)
//! - [`Model`] - a named directed multigraph over those vertices and edges
//! - [`GraphBuilder`] - turns one [`InstanceDocument`](crate::InstanceDocument)
//!   into a [`Model`], in complete or component-only mode
//!
//! # Example
//!
//! ```ignore
//! use archsim_core::{BuildMode, GraphBuilder, InstanceDocument};
//!
//! let doc = InstanceDocument::from_file("models/isolette.json")?;
//! let model = GraphBuilder::new(BuildMode::Complete).build(&doc)?;
//! println!("{}: {} nodes, {} edges", model.name(), model.node_count(), model.edge_count());
//! ```

mod builder;
mod edge;
mod node;

pub use builder::{
    clean_connection_path, BuildMode, BuildReport, GraphBuilder, UnresolvedConnection, ROOT_PATH,
};
pub use edge::{Connection, ConnectionType};
pub use node::{Category, Kind, Node, NodeId, UnknownCategory};

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{Dfs, EdgeRef, IntoEdgeReferences};
use std::collections::{BTreeMap, HashSet};

/// A named model graph.
///
/// Owns its nodes and edges exclusively. Parallel edges are allowed.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    graph: StableDiGraph<Node, Connection>,
    root: Option<NodeIndex>,
}

impl Model {
    /// Create an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph: StableDiGraph::new(),
            root: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a node. The first node inserted becomes the root.
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        let idx = self.graph.add_node(node);
        self.root.get_or_insert(idx);
        idx
    }

    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, connection: Connection) {
        self.graph.add_edge(source, target, connection);
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, idx: NodeIndex) -> Option<Node> {
        if self.root == Some(idx) {
            self.root = None;
        }
        self.graph.remove_node(idx)
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(idx)
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> Option<&mut Node> {
        self.graph.node_weight_mut(idx)
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node indices in insertion order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx))
    }

    /// Edges in insertion order as `(source, target, connection)` indices.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &Connection)> {
        self.graph
            .edge_references()
            .map(|e| (e.source(), e.target(), e.weight()))
    }

    /// Number of edges touching `idx`, in either direction.
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors_undirected(idx).count()
    }

    /// Depth-first visit order over every node.
    ///
    /// Follows outgoing edges from the root first, then restarts from each
    /// still-unvisited node in insertion order.
    pub fn dfs_order(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.node_count());
        let mut seen = HashSet::with_capacity(self.node_count());

        let starts = self.root.into_iter().chain(self.graph.node_indices());
        for start in starts {
            if seen.contains(&start) {
                continue;
            }
            let mut dfs = Dfs::new(&self.graph, start);
            while let Some(idx) = dfs.next(&self.graph) {
                if seen.insert(idx) {
                    order.push(idx);
                }
            }
        }

        order
    }

    /// Display names of every node.
    pub fn node_names(&self) -> Vec<String> {
        self.nodes().map(|n| n.name().to_string()).collect()
    }

    /// Number of nodes per category.
    pub fn category_histogram(&self) -> BTreeMap<Category, usize> {
        let mut histogram = BTreeMap::new();
        for node in self.nodes() {
            *histogram.entry(node.category()).or_insert(0) += 1;
        }
        histogram
    }

    /// Number of edges per connection type.
    pub fn connection_histogram(&self) -> BTreeMap<ConnectionType, usize> {
        let mut histogram = BTreeMap::new();
        for (_, _, connection) in self.edges() {
            *histogram.entry(connection.connection_type()).or_insert(0) += 1;
        }
        histogram
    }
}
