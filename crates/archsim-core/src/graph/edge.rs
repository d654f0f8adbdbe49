//! Edge types: the relations between instances in a model graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relation an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// Containment: parent instance to child component instance.
    Father,
    /// Component to one of its declared features (ports, accesses).
    Feature,
    /// Explicit wiring between two instances, resolved by path.
    Connection,
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionType::Father => "father",
            ConnectionType::Feature => "feature",
            ConnectionType::Connection => "connection",
        })
    }
}

/// A directed, typed edge. Every edge weighs the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    connection_type: ConnectionType,
}

impl Connection {
    pub fn new(connection_type: ConnectionType) -> Self {
        Self { connection_type }
    }

    pub fn connection_type(&self) -> ConnectionType {
        self.connection_type
    }

    pub fn weight(&self) -> u32 {
        1
    }
}
