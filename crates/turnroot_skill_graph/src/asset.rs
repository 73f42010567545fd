// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persisted skill graphs.
//!
//! A [`GraphAsset`] is the on-disk form of a [`Graph`] built from
//! [`BuiltinNode`]s. Loading replays every connection through
//! [`Graph::connect`], so an asset can never describe a graph the
//! authoring API would have refused.

use crate::graph::{ConnectionError, Graph, GraphError};
use crate::library::BuiltinNode;
use crate::node::{Node, NodeId};
use crate::port::{Port, PortRef};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Newest asset format this crate reads and the one it writes
pub const FORMAT_VERSION: u32 = 1;

/// Asset errors
#[derive(Debug, Error)]
pub enum AssetError {
    /// Reading or writing the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not a valid asset
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Written by a newer version
    #[error("Unsupported asset version {found} (newest supported is {supported})")]
    UnsupportedVersion {
        /// Version in the document
        found: u32,
        /// [`FORMAT_VERSION`]
        supported: u32,
    },

    /// A node is not one of the built-in kinds
    #[error("Node {name:?} ({tag}) is not a built-in kind and cannot be saved")]
    UnserializableNode {
        /// Node name
        name: String,
        /// Type tag
        tag: String,
    },

    /// Stored port declarations disagree with the node kind
    #[error("Stored ports of node {0:?} do not match its kind")]
    PortMismatch(String),

    /// Rebuilding the graph failed
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A stored connection was refused
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// Stored node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Instance ID
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Kind and parameters
    pub node: BuiltinNode,
    /// Port declarations at save time; empty means "whatever the kind declares"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<Port>,
}

/// Stored connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Output end
    pub from: PortRef,
    /// Input end
    pub to: PortRef,
}

/// A skill graph on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphAsset {
    /// Format version
    pub version: u32,
    /// Graph name
    pub name: String,
    /// Nodes in insertion order
    pub nodes: Vec<NodeRecord>,
    /// Connections in creation order
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

impl GraphAsset {
    /// Capture a graph; every node must be a [`BuiltinNode`]
    pub fn from_graph(graph: &Graph) -> Result<Self, AssetError> {
        let nodes = graph
            .nodes()
            .map(|node| {
                let builtin = node.behavior().to_builtin().ok_or_else(|| {
                    AssetError::UnserializableNode {
                        name: node.name.clone(),
                        tag: node.behavior().type_tag().to_string(),
                    }
                })?;
                Ok(NodeRecord {
                    id: node.id,
                    name: node.name.clone(),
                    node: builtin,
                    ports: node.ports().to_vec(),
                })
            })
            .collect::<Result<Vec<_>, AssetError>>()?;

        let connections = graph
            .connections()
            .map(|c| ConnectionRecord {
                from: c.from.clone(),
                to: c.to.clone(),
            })
            .collect();

        Ok(Self {
            version: FORMAT_VERSION,
            name: graph.name.clone(),
            nodes,
            connections,
        })
    }

    /// Rebuild the graph, validating every connection
    pub fn into_graph(self) -> Result<Graph, AssetError> {
        if self.version > FORMAT_VERSION {
            return Err(AssetError::UnsupportedVersion {
                found: self.version,
                supported: FORMAT_VERSION,
            });
        }

        let mut graph = Graph::new(self.name);
        for record in self.nodes {
            let node = Node::new(record.id, record.name, Arc::new(record.node))?;
            if !record.ports.is_empty() && record.ports.as_slice() != node.ports() {
                return Err(AssetError::PortMismatch(node.name));
            }
            graph.insert_node(node)?;
        }

        for record in self.connections {
            graph.connect(record.from.node, &record.from.port, record.to.node, &record.to.port)?;
        }

        tracing::debug!(
            graph = %graph.name,
            nodes = graph.node_count(),
            connections = graph.connection_count(),
            "Loaded graph asset"
        );
        Ok(graph)
    }

    /// Parse an asset from RON
    pub fn from_ron(source: &str) -> Result<Self, AssetError> {
        Ok(ron::from_str(source)?)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, AssetError> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load and rebuild a graph from a file
    pub fn load(path: &Path) -> Result<Graph, AssetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)?.into_graph()
    }

    /// Save a graph to a file
    pub fn save(graph: &Graph, path: &Path) -> Result<(), AssetError> {
        let content = Self::from_graph(graph)?.to_ron()?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
