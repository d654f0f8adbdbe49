//! Graph construction from instance documents.
//!
//! The builder descends the instance tree depth-first, creating one node per
//! component or feature instance and linking it to its parent. Every node is
//! registered under a path key (`componentInstance.0/componentInstance.2/featureInstance.1`)
//! so that the explicit connections declared at the root can be resolved in a
//! second pass.

use petgraph::stable_graph::NodeIndex;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::{Category, Connection, ConnectionType, Kind, Model, Node, NodeId};
use crate::document::{ConnectionDescriptor, Instance, InstanceDocument};
use crate::error::SimilarityError;

/// Path key of the root instance.
pub const ROOT_PATH: &str = "componentInstance.0";

const COMPONENT_SEGMENT: &str = "componentInstance";
const FEATURE_SEGMENT: &str = "featureInstance";

/// Marker identifying a feature segment in a connection path.
const FEATURE_MARKER: &str = "feature";

/// How connection endpoints are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Feature instances are first-class vertices and connection endpoints
    /// resolve to the exact port or access they name.
    #[default]
    Complete,
    /// Feature instances still get nodes, but connection endpoints resolve to
    /// the component owning the feature.
    Component,
}

/// A connection whose endpoints did not both resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedConnection {
    pub source: String,
    pub destination: String,
}

/// Diagnostics gathered while building one model.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub unresolved: Vec<UnresolvedConnection>,
}

/// Builds [`Model`]s from [`InstanceDocument`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    mode: BuildMode,
}

impl GraphBuilder {
    pub fn new(mode: BuildMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Build the model graph for a document.
    ///
    /// Fails only when the root has no `name`.
    pub fn build(&self, document: &InstanceDocument) -> Result<Model, SimilarityError> {
        self.build_with_report(document).map(|(model, _)| model)
    }

    /// Parse a JSON document and build its model graph.
    pub fn build_from_json(&self, json: &str) -> Result<Model, SimilarityError> {
        let document = InstanceDocument::from_json_str(json)?;
        self.build(&document)
    }

    /// Build the model graph and return the diagnostics alongside it.
    pub fn build_with_report(
        &self,
        document: &InstanceDocument,
    ) -> Result<(Model, BuildReport), SimilarityError> {
        let name = document.name()?;
        let root = document.root();

        let mut run = BuildRun {
            mode: self.mode,
            model: Model::new(name),
            index: HashMap::new(),
            next_id: 0,
            report: BuildReport::default(),
        };

        let root_idx = run.insert(root);
        run.index.insert(ROOT_PATH.to_string(), root_idx);
        run.descend(root, root_idx, ROOT_PATH);

        for descriptor in &root.connections {
            run.connect(descriptor);
        }

        debug!(
            model = name,
            nodes = run.model.node_count(),
            edges = run.model.edge_count(),
            unresolved = run.report.unresolved.len(),
            "built model graph"
        );

        Ok((run.model, run.report))
    }
}

/// State of a single build. Node ids are handed out from here, so separate
/// builds never share a counter.
struct BuildRun {
    mode: BuildMode,
    model: Model,
    index: HashMap<String, NodeIndex>,
    next_id: u32,
    report: BuildReport,
}

impl BuildRun {
    fn insert(&mut self, instance: &Instance) -> NodeIndex {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let category = Category::classify(instance.category.as_deref(), instance.feature_type());
        let node = match instance.name.as_deref() {
            Some(name) => Node::new(id, name, category),
            None => Node::unnamed(id, category),
        };
        self.model.add_node(node)
    }

    fn descend(&mut self, instance: &Instance, parent: NodeIndex, parent_path: &str) {
        for (i, child) in instance.components.iter().enumerate() {
            let path = format!("{}/{}.{}", parent_path, COMPONENT_SEGMENT, i);
            self.attach(child, parent, path);
        }
        for (i, child) in instance.features.iter().enumerate() {
            let path = format!("{}/{}.{}", parent_path, FEATURE_SEGMENT, i);
            self.attach(child, parent, path);
        }
    }

    fn attach(&mut self, instance: &Instance, parent: NodeIndex, path: String) {
        let idx = self.insert(instance);

        let is_feature = self
            .model
            .node(idx)
            .map_or(false, |n| n.kind() == Kind::Feature);
        let connection_type = if is_feature {
            ConnectionType::Feature
        } else {
            ConnectionType::Father
        };
        self.model.add_edge(parent, idx, Connection::new(connection_type));

        self.descend(instance, idx, &path);
        self.index.insert(path, idx);
    }

    fn connect(&mut self, descriptor: &ConnectionDescriptor) {
        let source = resolve_path(descriptor.source.as_deref(), self.mode);
        let destination = resolve_path(descriptor.destination.as_deref(), self.mode);

        let source_idx = source.as_ref().and_then(|p| self.index.get(p)).copied();
        let destination_idx = destination.as_ref().and_then(|p| self.index.get(p)).copied();

        match (source_idx, destination_idx) {
            (Some(s), Some(d)) => {
                self.model
                    .add_edge(s, d, Connection::new(ConnectionType::Connection));
            }
            _ => {
                let source = source.unwrap_or_default();
                let destination = destination.unwrap_or_default();
                warn!(
                    model = self.model.name(),
                    source = %source,
                    destination = %destination,
                    source_found = source_idx.is_some(),
                    destination_found = destination_idx.is_some(),
                    "connection endpoint not found, skipping connection"
                );
                self.report.unresolved.push(UnresolvedConnection {
                    source,
                    destination,
                });
            }
        }
    }
}

fn resolve_path(raw: Option<&str>, mode: BuildMode) -> Option<String> {
    let cleaned = clean_connection_path(raw?, mode);
    Some(format!("{}/{}", ROOT_PATH, cleaned))
}

/// Turn a connection endpoint such as `//@componentInstance.1/@featureInstance.0`
/// into a path key relative to the root.
///
/// The two-character prefix and every `@` are removed. In
/// [`BuildMode::Component`] each segment naming a feature is dropped as well,
/// so the endpoint resolves to the owning component.
pub fn clean_connection_path(raw: &str, mode: BuildMode) -> String {
    let body = raw
        .char_indices()
        .nth(2)
        .map_or("", |(offset, _)| &raw[offset..]);
    let body = body.replace('@', "");

    match mode {
        BuildMode::Complete => body,
        BuildMode::Component => body
            .split('/')
            .filter(|segment| !segment.is_empty() && !segment.contains(FEATURE_MARKER))
            .collect::<Vec<_>>()
            .join("/"),
    }
}
