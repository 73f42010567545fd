// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket types and the values that flow through data sockets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of data a port carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketType {
    /// Control-flow token, carries no payload
    Flow,
    /// Boolean value
    Bool,
    /// Numeric value
    Number,
    /// Text value
    Text,
}

impl SocketType {
    /// Check if this socket type can connect to another.
    ///
    /// There is no implicit coercion between kinds.
    pub fn can_connect_to(self, other: SocketType) -> bool {
        self == other
    }

    /// Whether this is the control-flow kind
    pub fn is_flow(self) -> bool {
        matches!(self, Self::Flow)
    }

    /// Value an unconnected data input falls back to when the port declares none
    pub fn zero_value(self) -> Option<Value> {
        match self {
            Self::Flow => None,
            Self::Bool => Some(Value::Bool(false)),
            Self::Number => Some(Value::Number(0.0)),
            Self::Text => Some(Value::Text(String::new())),
        }
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flow => "flow",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

/// Value carried by a data socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Number
    Number(f64),
    /// Text
    Text(String),
}

impl Value {
    /// Get the socket type for this value
    pub fn socket_type(&self) -> SocketType {
        match self {
            Self::Bool(_) => SocketType::Bool,
            Self::Number(_) => SocketType::Number,
            Self::Text(_) => SocketType::Text,
        }
    }

    /// The boolean payload, if this is a `Bool`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// The numeric payload, if this is a `Number`
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The text payload, if this is a `Text`
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}
