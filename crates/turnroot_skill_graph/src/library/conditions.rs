// SPDX-License-Identifier: MIT OR Apache-2.0
//! Readers for state the battle layer puts in the context.

use super::BuiltinNode;
use crate::context::ExecutionContext;
use crate::evaluation::NodeScope;
use crate::node::NodeBehavior;
use crate::port::Port;
use crate::socket::{SocketType, Value};
use serde::{Deserialize, Serialize};

pub(super) const CONTEXT_NUMBER: &str = "context_number";
pub(super) const CONTEXT_FLAG: &str = "context_flag";

/// Outputs the `f64` stored under `key`, or zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextNumber {
    /// Data bag key
    pub key: String,
}

impl ContextNumber {
    /// Read the number under `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl NodeBehavior for ContextNumber {
    fn type_tag(&self) -> &str {
        CONTEXT_NUMBER
    }

    fn ports(&self) -> Vec<Port> {
        vec![Port::output("Value", SocketType::Number)]
    }

    fn evaluate(&self, output: &str, _scope: &NodeScope<'_>, ctx: &ExecutionContext) -> Option<Value> {
        (output == "Value").then(|| Value::Number(ctx.number(&self.key).unwrap_or_default()))
    }

    fn to_builtin(&self) -> Option<BuiltinNode> {
        Some(self.clone().into())
    }
}

/// Outputs the `bool` stored under `key`, or `false`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextFlag {
    /// Data bag key
    pub key: String,
}

impl ContextFlag {
    /// Read the flag under `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl NodeBehavior for ContextFlag {
    fn type_tag(&self) -> &str {
        CONTEXT_FLAG
    }

    fn ports(&self) -> Vec<Port> {
        vec![Port::output("Value", SocketType::Bool)]
    }

    fn evaluate(&self, output: &str, _scope: &NodeScope<'_>, ctx: &ExecutionContext) -> Option<Value> {
        (output == "Value").then(|| Value::Bool(ctx.get_or(&self.key, false)))
    }

    fn to_builtin(&self) -> Option<BuiltinNode> {
        Some(self.clone().into())
    }
}
