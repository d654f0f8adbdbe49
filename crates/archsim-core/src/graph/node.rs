//! Vertex types: component categories and the nodes that carry them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

// =============================================================================
// CATEGORY
// =============================================================================

/// Fine-grained classification of a component or feature instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "process")]
    Process,
    #[serde(rename = "thread")]
    Thread,
    #[serde(rename = "thread_group")]
    ThreadGroup,
    #[serde(rename = "data")]
    Data,
    #[serde(rename = "subprogram")]
    Subprogram,
    #[serde(rename = "subprogram_group")]
    SubprogramGroup,
    #[serde(rename = "processor")]
    Processor,
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "bus")]
    Bus,
    #[serde(rename = "device")]
    Device,
    #[serde(rename = "system")]
    System,
    #[serde(rename = "virtual_bus")]
    VirtualBus,
    #[serde(rename = "virtual_processor")]
    VirtualProcessor,
    #[serde(rename = "busAccess")]
    BusAccess,
    #[serde(rename = "dataPort")]
    DataPort,
    #[serde(rename = "dataPortIn")]
    DataPortIn,
    #[serde(rename = "dataPortOut")]
    DataPortOut,
    #[serde(rename = "eventPort")]
    EventPort,
    #[serde(rename = "eventDataPort")]
    EventDataPort,
    #[serde(rename = "featureGroup")]
    FeatureGroup,
    #[serde(rename = "dataAccess")]
    DataAccess,
    #[serde(rename = "abstractFeature")]
    AbstractFeature,
    #[serde(rename = "subprogramAccess")]
    SubprogramAccess,
    #[serde(rename = "subprogramGroupAccess")]
    SubprogramGroupAccess,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Category {
    pub const ALL: [Category; 25] = [
        Category::Process,
        Category::Thread,
        Category::ThreadGroup,
        Category::Data,
        Category::Subprogram,
        Category::SubprogramGroup,
        Category::Processor,
        Category::Memory,
        Category::Bus,
        Category::Device,
        Category::System,
        Category::VirtualBus,
        Category::VirtualProcessor,
        Category::BusAccess,
        Category::DataPort,
        Category::DataPortIn,
        Category::DataPortOut,
        Category::EventPort,
        Category::EventDataPort,
        Category::FeatureGroup,
        Category::DataAccess,
        Category::AbstractFeature,
        Category::SubprogramAccess,
        Category::SubprogramGroupAccess,
        Category::Unknown,
    ];

    /// The spelling used in instance documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Process => "process",
            Category::Thread => "thread",
            Category::ThreadGroup => "thread_group",
            Category::Data => "data",
            Category::Subprogram => "subprogram",
            Category::SubprogramGroup => "subprogram_group",
            Category::Processor => "processor",
            Category::Memory => "memory",
            Category::Bus => "bus",
            Category::Device => "device",
            Category::System => "system",
            Category::VirtualBus => "virtual_bus",
            Category::VirtualProcessor => "virtual_processor",
            Category::BusAccess => "busAccess",
            Category::DataPort => "dataPort",
            Category::DataPortIn => "dataPortIn",
            Category::DataPortOut => "dataPortOut",
            Category::EventPort => "eventPort",
            Category::EventDataPort => "eventDataPort",
            Category::FeatureGroup => "featureGroup",
            Category::DataAccess => "dataAccess",
            Category::AbstractFeature => "abstractFeature",
            Category::SubprogramAccess => "subprogramAccess",
            Category::SubprogramGroupAccess => "subprogramGroupAccess",
            Category::Unknown => "unknown",
        }
    }

    /// Coarse kind of this category.
    pub fn kind(&self) -> Kind {
        match self {
            Category::Process
            | Category::VirtualProcessor
            | Category::Thread
            | Category::ThreadGroup
            | Category::Data
            | Category::Subprogram
            | Category::SubprogramGroup => Kind::Software,
            Category::Processor
            | Category::Memory
            | Category::Bus
            | Category::Device
            | Category::VirtualBus => Kind::Hardware,
            Category::System => Kind::System,
            Category::BusAccess
            | Category::DataPort
            | Category::DataPortIn
            | Category::DataPortOut
            | Category::EventPort
            | Category::EventDataPort
            | Category::FeatureGroup
            | Category::DataAccess
            | Category::AbstractFeature
            | Category::SubprogramAccess
            | Category::SubprogramGroupAccess => Kind::Feature,
            Category::Unknown => Kind::Unknown,
        }
    }

    /// Classify an instance from its `category` field and feature type tag.
    ///
    /// An explicit category wins (with the multi-word spellings the converter
    /// emits rewritten). Without one, the part of the feature type after the
    /// namespace separator is used. Anything unrecognized is `Unknown`.
    pub fn classify(category: Option<&str>, feature_type: Option<&str>) -> Category {
        let raw = match category.map(rewrite_synonym) {
            Some(c) if c != "unknown" => c,
            _ => match feature_type {
                Some(tag) => {
                    let local = tag.split_once(':').map_or(tag, |(_, local)| local);
                    if local == "DataPort" {
                        "dataPort"
                    } else {
                        local
                    }
                }
                None => return Category::Unknown,
            },
        };

        raw.parse().unwrap_or_else(|_| {
            tracing::debug!(category = raw, "unrecognized category, classifying as unknown");
            Category::Unknown
        })
    }
}

fn rewrite_synonym(category: &str) -> &str {
    match category {
        "thread group" => "thread_group",
        "virtual bus" => "virtual_bus",
        "virtual processor" => "virtual_processor",
        "subprogram group" => "subprogram_group",
        other => other,
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// =============================================================================
// KIND
// =============================================================================

/// Coarse classification derived from [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Software,
    Hardware,
    System,
    Feature,
    Unknown,
}

// =============================================================================
// NODE
// =============================================================================

/// Identifier of a node, unique within the build that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vertex of a model graph.
///
/// Two nodes are equal only when they share an id; name and category play no
/// part in identity.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    id: NodeId,
    name: String,
    category: Category,
}

impl Node {
    /// Create a node with an explicit name; the id is appended for display.
    pub fn new(id: NodeId, name: &str, category: Category) -> Self {
        Self {
            id,
            name: format!("{} ({})", name, id),
            category,
        }
    }

    /// Create a node named after its category.
    pub fn unnamed(id: NodeId, category: Category) -> Self {
        Self {
            id,
            name: format!("{} ({})", category, id),
            category,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Reclassify the node. Its kind follows the new category.
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn kind(&self) -> Kind {
        self.category.kind()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
