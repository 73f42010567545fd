// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use crate::node::NodeId;
use crate::socket::{SocketType, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

/// How many live connections a port accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capacity {
    /// At most one; a new connection replaces the old one
    Single,
    /// Unbounded
    Multiple,
}

/// A port declared by a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Port name, unique within the owning node
    pub name: String,
    /// Port direction
    pub direction: PortDirection,
    /// Data kind
    pub socket: SocketType,
    /// Connection capacity
    pub capacity: Capacity,
    /// Default value (for unconnected data inputs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl Port {
    /// Create a new input port.
    ///
    /// Inputs accept a single connection, flow or data.
    pub fn input(name: impl Into<String>, socket: SocketType) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Input,
            socket,
            capacity: Capacity::Single,
            default_value: None,
        }
    }

    /// Create a new output port
    pub fn output(name: impl Into<String>, socket: SocketType) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Output,
            socket,
            capacity: Capacity::Multiple, // Outputs fan out by default
            default_value: None,
        }
    }

    /// Flow input named `name`
    pub fn flow_in(name: impl Into<String>) -> Self {
        Self::input(name, SocketType::Flow)
    }

    /// Flow output named `name`
    pub fn flow_out(name: impl Into<String>) -> Self {
        Self::output(name, SocketType::Flow)
    }

    /// Set the default value
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Override the capacity policy
    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Whether this is an input port
    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    /// Whether this is an output port
    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }

    /// Whether a connection from this port into `dest` is valid: output to
    /// input, identical socket types
    pub fn can_connect(&self, dest: &Port) -> bool {
        self.is_output() && dest.is_input() && self.socket.can_connect_to(dest.socket)
    }

    /// Value used when nothing is connected upstream
    pub fn fallback_value(&self) -> Option<Value> {
        self.default_value
            .clone()
            .or_else(|| self.socket.zero_value())
    }
}

/// Address of a port inside a graph: owning node plus port name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    /// Owning node
    pub node: NodeId,
    /// Port name on that node
    pub port: String,
}

impl PortRef {
    /// Create a new port reference
    pub fn new(node: NodeId, port: impl Into<String>) -> Self {
        Self {
            node,
            port: port.into(),
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.port)
    }
}
