// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions and the contract every node kind implements.

use crate::context::ExecutionContext;
use crate::evaluation::NodeScope;
use crate::graph::GraphError;
use crate::library::BuiltinNode;
use crate::port::Port;
use crate::socket::{SocketType, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Entry points and control flow
    Flow,
    /// Constants and arithmetic
    Math,
    /// Nodes that report effects back to the battle
    Events,
    /// Nodes that read battle state
    Conditions,
}

/// Battle event an entry node reacts to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Once at the start of battle
    BattleStarts,
    /// At the start of the unit's turn
    TurnStarts,
    /// At the end of the unit's turn
    TurnEnds,
    /// When the unit moves
    UnitMoves,
    /// When the unit attacks
    UnitAttacks,
    /// When an enemy attacks the unit
    EnemyAttacks,
    /// When the unit defeats an enemy
    EnemyDefeated,
    /// Event defined by the embedding simulation
    Custom(String),
}

impl EventKind {
    /// Stock event kinds, in declaration order
    pub const STOCK: [EventKind; 7] = [
        EventKind::BattleStarts,
        EventKind::TurnStarts,
        EventKind::TurnEnds,
        EventKind::UnitMoves,
        EventKind::UnitAttacks,
        EventKind::EnemyAttacks,
        EventKind::EnemyDefeated,
    ];

    /// Snake-case name used on the command line and in logs
    pub fn name(&self) -> &str {
        match self {
            Self::BattleStarts => "battle_starts",
            Self::TurnStarts => "turn_starts",
            Self::TurnEnds => "turn_ends",
            Self::UnitMoves => "unit_moves",
            Self::UnitAttacks => "unit_attacks",
            Self::EnemyAttacks => "enemy_attacks",
            Self::EnemyDefeated => "enemy_defeated",
            Self::Custom(name) => name,
        }
    }

    /// Human-readable description of when the event fires
    pub fn description(&self) -> &str {
        match self {
            Self::BattleStarts => "Runs once at the start of battle",
            Self::TurnStarts => "Runs at the start of unit's turn",
            Self::TurnEnds => "Runs at the end of unit's turn",
            Self::UnitMoves => "Runs when this unit moves",
            Self::UnitAttacks => "Runs when this unit attacks",
            Self::EnemyAttacks => "Runs when an enemy attacks this unit",
            Self::EnemyDefeated => "Runs when an enemy is defeated by this unit",
            Self::Custom(_) => "Runs when the simulation raises this event",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::STOCK
            .iter()
            .find(|kind| kind.name() == s)
            .cloned()
            .unwrap_or_else(|| Self::Custom(s.to_string())))
    }
}

/// How a node finished its `execute` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Done; continue into everything connected to this output port
    Signal(String),
    /// Waiting on an external signal; the branch parks until resumed
    Suspend {
        /// What the presentation layer should play before resuming
        cue: Option<String>,
    },
    /// Done, and there is nothing downstream to follow
    End,
}

impl Completion {
    /// Signal the named output port
    pub fn signal(port: impl Into<String>) -> Self {
        Self::Signal(port.into())
    }
}

/// Behavior shared by every node kind.
///
/// Implementations must not hold per-execution state: one instance serves
/// every traversal of the graph it lives in, possibly from several threads.
pub trait NodeBehavior: fmt::Debug + Send + Sync {
    /// Stable tag naming this node kind
    fn type_tag(&self) -> &str;

    /// Declared ports
    fn ports(&self) -> Vec<Port>;

    /// Event this node reacts to when it is an entry node
    fn event_kind(&self) -> Option<&EventKind> {
        None
    }

    /// Perform the node's effect.
    ///
    /// The default completes synchronously on the first flow output.
    fn execute(&self, scope: &NodeScope<'_>, _ctx: &mut ExecutionContext) -> Completion {
        scope.complete()
    }

    /// Compute the value of a data output port.
    ///
    /// Called on every pull, so it must be free of side effects.
    fn evaluate(&self, _output: &str, _scope: &NodeScope<'_>, _ctx: &ExecutionContext) -> Option<Value> {
        None
    }

    /// The serializable form of this node, if it is a built-in kind
    fn to_builtin(&self) -> Option<BuiltinNode> {
        None
    }
}

/// A node instance in the graph
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Display name
    pub name: String,
    behavior: Arc<dyn NodeBehavior>,
    ports: Vec<Port>,
}

impl Node {
    /// Create a node, instantiating the ports its behavior declares
    pub fn new(
        id: NodeId,
        name: impl Into<String>,
        behavior: Arc<dyn NodeBehavior>,
    ) -> Result<Self, GraphError> {
        let name = name.into();
        let ports = behavior.ports();

        let mut seen = HashSet::new();
        for port in &ports {
            if !seen.insert(port.name.as_str()) {
                return Err(GraphError::DuplicatePort {
                    node: name,
                    port: port.name.clone(),
                });
            }
        }

        Ok(Self {
            id,
            name,
            behavior,
            ports,
        })
    }

    /// The node's behavior
    pub fn behavior(&self) -> &dyn NodeBehavior {
        self.behavior.as_ref()
    }

    /// Get a port by name
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Get an input port by name
    pub fn input(&self, name: &str) -> Option<&Port> {
        self.port(name).filter(|p| p.is_input())
    }

    /// Get an output port by name
    pub fn output(&self, name: &str) -> Option<&Port> {
        self.port(name).filter(|p| p.is_output())
    }

    /// Get all ports
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Flow output ports, in declaration order
    pub fn flow_outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports
            .iter()
            .filter(|p| p.is_output() && p.socket == SocketType::Flow)
    }

    /// Whether this node has a flow output and no flow input
    pub fn is_entry(&self) -> bool {
        let has_flow_in = self
            .ports
            .iter()
            .any(|p| p.is_input() && p.socket == SocketType::Flow);
        !has_flow_in && self.flow_outputs().next().is_some()
    }

    /// Event kind this node reacts to, if any
    pub fn event_kind(&self) -> Option<&EventKind> {
        self.behavior.event_kind()
    }
}
