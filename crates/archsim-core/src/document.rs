//! Instance-model documents.
//!
//! A document is the JSON rendering of one architecture instance model: a tree
//! of component instances, each carrying optional features and the explicit
//! connections declared at the root. The converter that produces these files
//! emits `componentInstance`, `featureInstance` and `connectionInstance` either
//! as a single object or as an array; both shapes are normalized here into
//! ordered vectors so the graph builders only ever see one representation.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::SimilarityError;

/// One parsed instance-model document.
///
/// Keeps the raw JSON next to the normalized tree: name extraction for the
/// semantic score walks every `name` in the raw document, which is richer than
/// the set of nodes the graph builders create.
#[derive(Debug, Clone)]
pub struct InstanceDocument {
    root: Instance,
    raw: Value,
}

/// A component or feature instance.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Instance {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    /// Feature descriptor; only its namespaced `type` tag is used.
    #[serde(default)]
    pub feature: Option<Value>,

    #[serde(rename = "componentInstance", default, deserialize_with = "one_or_many")]
    pub components: Vec<Instance>,

    #[serde(rename = "featureInstance", default, deserialize_with = "one_or_many")]
    pub features: Vec<Instance>,

    #[serde(rename = "connectionInstance", default, deserialize_with = "one_or_many")]
    pub connections: Vec<ConnectionDescriptor>,
}

impl Instance {
    /// The namespaced type tag of the feature descriptor, e.g. `aadl2:DataPort`.
    pub fn feature_type(&self) -> Option<&str> {
        self.feature
            .as_ref()
            .and_then(|f| f.get("type"))
            .and_then(Value::as_str)
    }
}

/// An explicit wiring between two instances, addressed by hierarchical path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionDescriptor {
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub destination: Option<String>,
}

// `Many` comes first: derived struct visitors also accept a sequence, so an
// empty array would otherwise parse as one all-default element.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(item)) => vec![item],
        Some(OneOrMany::Many(items)) => items,
    })
}

impl InstanceDocument {
    /// Parse a document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, SimilarityError> {
        let raw: Value = serde_json::from_str(json)?;
        Self::from_value(raw)
    }

    /// Build a document from an already-parsed JSON value.
    pub fn from_value(raw: Value) -> Result<Self, SimilarityError> {
        let root = Instance::deserialize(&raw)?;
        Ok(Self { root, raw })
    }

    /// Read and parse a document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimilarityError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| SimilarityError::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// The root instance.
    pub fn root(&self) -> &Instance {
        &self.root
    }

    /// The root's `name`, required for every buildable document.
    pub fn name(&self) -> Result<&str, SimilarityError> {
        self.root
            .name
            .as_deref()
            .ok_or(SimilarityError::MissingField { field: "name" })
    }

    /// The raw JSON the document was parsed from.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Every `name` value in the document, underscores replaced with spaces.
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_names(&self.raw, &mut names);
        names
    }
}

fn collect_names(value: &Value, names: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(name) = map.get("name").and_then(Value::as_str) {
                names.push(name.replace('_', " "));
            }
            for child in map.values() {
                collect_names(child, names);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_names(item, names);
            }
        }
        _ => {}
    }
}
