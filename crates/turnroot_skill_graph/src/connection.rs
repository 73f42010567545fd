// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connections between ports.
//!
//! A connection always runs from an output to an input. Flow connections
//! carry control, every other socket type carries pulled data.

use crate::node::NodeId;
use crate::port::PortRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A connection from an output port to an input port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Source output port
    pub from: PortRef,
    /// Destination input port
    pub to: PortRef,
}

impl Connection {
    /// Create a new connection
    pub fn new(from: PortRef, to: PortRef) -> Self {
        Self {
            id: ConnectionId::new(),
            from,
            to,
        }
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from.node == node_id || self.to.node == node_id
    }

    /// Check if this connection leaves the given output port
    pub fn leaves(&self, node_id: NodeId, port: &str) -> bool {
        self.from.node == node_id && self.from.port == port
    }

    /// Check if this connection arrives at the given input port
    pub fn arrives(&self, node_id: NodeId, port: &str) -> bool {
        self.to.node == node_id && self.to.port == port
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
