// SPDX-License-Identifier: MIT OR Apache-2.0
//! Lazy, pull-based evaluation of data inputs.
//!
//! Data never flows along connections eagerly. When a node wants the value
//! of one of its inputs it asks [`NodeScope::resolve_input`], which walks the
//! single upstream connection and asks the source node to evaluate that
//! output. Nothing is cached; every read recomputes.

use crate::context::ExecutionContext;
use crate::graph::Graph;
use crate::node::{Completion, Node, NodeId};
use crate::port::PortRef;
use crate::socket::Value;

/// Upstream hops a single pull may take before it gives up
pub const MAX_PULL_DEPTH: usize = 256;

/// A node together with the graph it lives in, as seen from inside a hook
#[derive(Debug, Clone, Copy)]
pub struct NodeScope<'g> {
    graph: &'g Graph,
    node: &'g Node,
    depth: usize,
}

impl<'g> NodeScope<'g> {
    /// Create a scope for `node` inside `graph`
    pub fn new(graph: &'g Graph, node: &'g Node) -> Self {
        Self {
            graph,
            node,
            depth: 0,
        }
    }

    /// The graph being executed
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// The node this scope belongs to
    pub fn node(&self) -> &'g Node {
        self.node
    }

    /// ID of the node this scope belongs to
    pub fn id(&self) -> NodeId {
        self.node.id
    }

    /// Pull the current value of an input port.
    ///
    /// Returns the upstream node's freshly computed output, or the port's
    /// default when nothing is connected or the chain is deeper than
    /// [`MAX_PULL_DEPTH`]. `None` for flow ports and unknown names.
    pub fn resolve_input(&self, port: &str, ctx: &ExecutionContext) -> Option<Value> {
        let Some(input) = self.node.input(port) else {
            tracing::warn!(node = %self.node.name, port, "Pulled from an unknown input port");
            return None;
        };
        if input.socket.is_flow() {
            return None;
        }

        let Some(source) = self.graph.upstream(&PortRef::new(self.node.id, port)) else {
            return input.fallback_value();
        };
        let Some(source_node) = self.graph.node(source.node) else {
            return input.fallback_value();
        };

        if self.depth >= MAX_PULL_DEPTH {
            tracing::warn!(node = %self.node.name, port, "Pull chain too deep, using fallback");
            return input.fallback_value();
        }

        let scope = NodeScope {
            graph: self.graph,
            node: source_node,
            depth: self.depth + 1,
        };
        match source_node.behavior().evaluate(&source.port, &scope, ctx) {
            Some(value) if value.socket_type() == input.socket => Some(value),
            Some(value) => {
                tracing::warn!(
                    node = %source_node.name,
                    port = %source.port,
                    expected = %input.socket,
                    found = %value.socket_type(),
                    "Upstream produced a value of the wrong kind"
                );
                input.fallback_value()
            }
            None => input.fallback_value(),
        }
    }

    /// Pull a numeric input, falling back to zero
    pub fn number(&self, port: &str, ctx: &ExecutionContext) -> f64 {
        self.resolve_input(port, ctx)
            .and_then(|v| v.as_number())
            .unwrap_or_default()
    }

    /// Pull a boolean input, falling back to `false`
    pub fn boolean(&self, port: &str, ctx: &ExecutionContext) -> bool {
        self.resolve_input(port, ctx)
            .and_then(|v| v.as_bool())
            .unwrap_or_default()
    }

    /// Pull a text input, falling back to the empty string
    pub fn text(&self, port: &str, ctx: &ExecutionContext) -> String {
        match self.resolve_input(port, ctx) {
            Some(Value::Text(text)) => text,
            _ => String::new(),
        }
    }

    /// Default synchronous completion: signal the first flow output, or end
    /// the branch when the node has none
    pub fn complete(&self) -> Completion {
        self.node
            .flow_outputs()
            .next()
            .map_or(Completion::End, |port| Completion::Signal(port.name.clone()))
    }
}
