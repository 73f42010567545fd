// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and connections.

use crate::connection::{Connection, ConnectionId};
use crate::node::{Node, NodeBehavior, NodeId};
use crate::port::{Capacity, Port, PortRef};
use crate::socket::SocketType;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;

/// A skill graph.
///
/// Nodes and connections are kept in insertion order; entry discovery and
/// fan-out visitation both follow that order.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// Add a node with a fresh ID
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        behavior: impl NodeBehavior + 'static,
    ) -> Result<NodeId, GraphError> {
        self.add_shared_node(name, Arc::new(behavior))
    }

    /// Add a node whose behavior is already shared
    pub fn add_shared_node(
        &mut self,
        name: impl Into<String>,
        behavior: Arc<dyn NodeBehavior>,
    ) -> Result<NodeId, GraphError> {
        self.insert_node(Node::new(NodeId::new(), name, behavior)?)
    }

    /// Insert a fully built node, keeping its ID
    pub fn insert_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        let id = node.id;
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Remove a node and its connections
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        // Remove connections involving this node
        self.connections.retain(|_, c| !c.involves_node(node_id));
        self.nodes.shift_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a port, reporting which half of the address is missing
    pub fn port(&self, node_id: NodeId, port: &str) -> Result<&Port, ConnectionError> {
        let node = self
            .nodes
            .get(&node_id)
            .ok_or(ConnectionError::NodeNotFound(node_id))?;
        node.port(port)
            .ok_or_else(|| ConnectionError::PortNotFound(PortRef::new(node_id, port)))
    }

    /// Check whether `connect` with these endpoints would succeed
    pub fn can_connect(&self, from_node: NodeId, from_port: &str, to_node: NodeId, to_port: &str) -> bool {
        self.check_connection(from_node, from_port, to_node, to_port)
            .is_ok()
    }

    fn check_connection(
        &self,
        from_node: NodeId,
        from_port: &str,
        to_node: NodeId,
        to_port: &str,
    ) -> Result<(Capacity, Capacity), ConnectionError> {
        let source = self.port(from_node, from_port)?;
        let target = self.port(to_node, to_port)?;

        if source.can_connect(target) {
            return Ok((source.capacity, target.capacity));
        }

        if !source.is_output() || !target.is_input() {
            return Err(ConnectionError::DirectionMismatch {
                from: PortRef::new(from_node, from_port),
                to: PortRef::new(to_node, to_port),
            });
        }
        Err(ConnectionError::TypeMismatch {
            expected: target.socket,
            found: source.socket,
        })
    }

    /// Add a connection from an output port to an input port.
    ///
    /// A `Single` port that is already connected has its old connection
    /// replaced; nothing changes when an error is returned.
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_port: &str,
        to_node: NodeId,
        to_port: &str,
    ) -> Result<ConnectionId, ConnectionError> {
        let (source_capacity, target_capacity) =
            self.check_connection(from_node, from_port, to_node, to_port)?;

        let from = PortRef::new(from_node, from_port);
        let to = PortRef::new(to_node, to_port);

        let replaced: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| {
                (target_capacity == Capacity::Single && c.to == to)
                    || (source_capacity == Capacity::Single && c.from == from)
            })
            .map(|c| c.id)
            .collect();
        for id in replaced {
            if let Some(old) = self.connections.shift_remove(&id) {
                tracing::debug!(connection = %old, "Replaced connection on single-capacity port");
            }
        }

        let connection = Connection::new(from, to);
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Remove a connection
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(&connection_id)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Get all connections, in creation order
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections leaving a specific output port
    pub fn connections_from<'a>(&'a self, node_id: NodeId, port: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.values().filter(move |c| c.leaves(node_id, port))
    }

    /// Get connections arriving at a specific input port
    pub fn connections_to<'a>(&'a self, node_id: NodeId, port: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.values().filter(move |c| c.arrives(node_id, port))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Nodes with a flow output and no flow input, in insertion order
    pub fn entry_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.is_entry())
    }

    /// Input ports fed by an output port, in connection-creation order
    pub fn downstream<'a>(&'a self, node_id: NodeId, output: &'a str) -> impl Iterator<Item = &'a PortRef> + 'a {
        self.connections_from(node_id, output).map(|c| &c.to)
    }

    /// The output port feeding an input port, if any
    pub fn upstream(&self, input: &PortRef) -> Option<&PortRef> {
        self.connections
            .values()
            .find(|c| c.arrives(input.node, &input.port))
            .map(|c| &c.from)
    }

    /// Check that the graph can be executed
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.nodes.is_empty() {
            return Err(GraphError::EmptyGraph);
        }
        if self.entry_nodes().next().is_none() {
            return Err(GraphError::NoEntryPoint);
        }
        self.topological_order()?;
        Ok(())
    }

    /// Nodes ordered so that every node comes after the nodes feeding it
    pub fn topological_order(&self) -> Result<Vec<NodeId>, CycleError> {
        let mut visited = HashSet::new();
        let mut on_path = HashSet::new();
        let mut order = Vec::with_capacity(self.nodes.len());
        // (node, upstream already pushed)
        let mut stack: Vec<(NodeId, bool)> = Vec::new();

        for &root in self.nodes.keys() {
            stack.push((root, false));
            while let Some((node_id, expanded)) = stack.pop() {
                if expanded {
                    on_path.remove(&node_id);
                    if visited.insert(node_id) {
                        order.push(node_id);
                    }
                    continue;
                }
                if visited.contains(&node_id) {
                    continue;
                }
                if !on_path.insert(node_id) {
                    return Err(CycleError);
                }

                stack.push((node_id, true));
                for connection in self.connections.values().filter(|c| c.to.node == node_id) {
                    let from = connection.from.node;
                    if on_path.contains(&from) {
                        return Err(CycleError);
                    }
                    if !visited.contains(&from) {
                        stack.push((from, false));
                    }
                }
            }
        }

        Ok(order)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when creating a connection
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0}")]
    PortNotFound(PortRef),

    /// Connection must run from an output to an input
    #[error("Connection must run from an output to an input: {from} -> {to}")]
    DirectionMismatch {
        /// Requested source
        from: PortRef,
        /// Requested destination
        to: PortRef,
    },

    /// Socket types differ
    #[error("Type mismatch: {found} output cannot feed a {expected} input")]
    TypeMismatch {
        /// Destination socket type
        expected: SocketType,
        /// Source socket type
        found: SocketType,
    },
}

/// Error when a graph is structurally unfit to run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// No nodes at all
    #[error("Graph has no nodes")]
    EmptyGraph,

    /// No node qualifies as an entry point
    #[error("Graph has no entry node")]
    NoEntryPoint,

    /// Connections form a cycle
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// A node declares the same port name twice
    #[error("Node {node:?} declares port {port:?} more than once")]
    DuplicatePort {
        /// Node name
        node: String,
        /// Repeated port name
        port: String,
    },

    /// A node with this ID is already present
    #[error("Node already in graph: {0}")]
    DuplicateNode(NodeId),
}

/// Error when graph contains a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Graph contains a cycle")]
pub struct CycleError;
