// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-trigger execution context.
//!
//! A context is created by the battle layer for one triggering event, seeded
//! with whatever references the nodes need, handed to the executor, and
//! dropped once the traversal completes or is interrupted. It is never
//! shared between traversals.

use crate::executor::SuspendedHandle;
use crate::node::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use uuid::Uuid;

/// Well-known data bag keys.
///
/// The engine never looks inside these; they are a naming convention shared
/// between the battle layer and node implementations.
pub mod keys {
    /// The unit using the skill
    pub const CASTER: &str = "caster";
    /// The primary target
    pub const TARGET: &str = "target";
    /// Units allied with the caster
    pub const ALLIES: &str = "allies";
    /// Units opposing the caster
    pub const ENEMIES: &str = "enemies";
    /// Neighbourhood lookup around the caster
    pub const ADJACENCY: &str = "adjacency";
    /// Accumulated damage
    pub const DAMAGE: &str = "damage";
    /// Accumulated healing
    pub const HEALING: &str = "healing";
}

/// Unique identifier for an execution context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(pub Uuid);

impl ContextId {
    /// Create a new random context ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a traversal stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionState {
    /// Not triggered yet
    #[default]
    Idle,
    /// Visiting nodes
    Running,
    /// Waiting on at least one external signal
    Suspended,
    /// Every branch ran to the end
    Completed,
    /// Stopped by the interruption flag
    Interrupted,
}

impl ExecutionState {
    /// Whether the traversal has reached a terminal state
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Interrupted)
    }
}

/// Runtime state carried through one traversal
pub struct ExecutionContext {
    id: ContextId,
    data: IndexMap<String, Box<dyn Any + Send + Sync>>,
    interrupted: bool,
    state: ExecutionState,
    pending: IndexMap<u64, SuspendedHandle>,
    next_ticket: u64,
    visits: usize,
    trace: Vec<NodeId>,
}

impl ExecutionContext {
    /// Create a fresh context
    pub fn new() -> Self {
        Self {
            id: ContextId::new(),
            data: IndexMap::new(),
            interrupted: false,
            state: ExecutionState::Idle,
            pending: IndexMap::new(),
            next_ticket: 0,
            visits: 0,
            trace: Vec::new(),
        }
    }

    /// Builder-style `set`
    pub fn with<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.set(key, value);
        self
    }

    /// Context ID
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Get a value from the data bag if present and of type `T`
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.data.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Mutable access to a data bag value of type `T`
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.data.get_mut(key).and_then(|v| v.downcast_mut::<T>())
    }

    /// Get a value, or `default` if it is missing or of another type
    pub fn get_or<T: Any + Clone>(&self, key: &str, default: T) -> T {
        self.get::<T>(key).cloned().unwrap_or(default)
    }

    /// Store a value, replacing whatever was under `key`
    pub fn set<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.data.insert(key.into(), Box::new(value));
    }

    /// Remove a value; returns whether anything was removed
    pub fn remove(&mut self, key: &str) -> bool {
        self.data.shift_remove(key).is_some()
    }

    /// Whether a key is present
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Keys in the data bag, in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Numeric value under `key`
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get::<f64>(key).copied()
    }

    /// Add `amount` to the number under `key`, starting from zero.
    ///
    /// Returns the new total. A non-numeric value under `key` is replaced.
    pub fn add_number(&mut self, key: &str, amount: f64) -> f64 {
        let total = self.number(key).unwrap_or_default() + amount;
        self.set(key, total);
        total
    }

    /// Request cooperative cancellation; takes effect before the next node
    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }

    /// Whether cancellation has been requested
    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Current traversal state
    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// Nodes executed so far, in visit order
    pub fn trace(&self) -> &[NodeId] {
        &self.trace
    }

    /// Number of node visits so far
    pub fn visits(&self) -> usize {
        self.visits
    }

    /// Suspensions still waiting for `continue_from`
    pub fn pending(&self) -> impl Iterator<Item = &SuspendedHandle> {
        self.pending.values()
    }

    pub(crate) fn set_state(&mut self, state: ExecutionState) {
        self.state = state;
    }

    pub(crate) fn record_visit(&mut self, node: NodeId, keep_trace: bool) {
        self.visits += 1;
        if keep_trace {
            self.trace.push(node);
        }
    }

    pub(crate) fn park(&mut self, node: NodeId, cue: Option<String>) -> SuspendedHandle {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let handle = SuspendedHandle {
            context: self.id,
            node,
            ticket,
            cue,
        };
        self.pending.insert(ticket, handle.clone());
        handle
    }

    pub(crate) fn parked(&self, ticket: u64) -> Option<&SuspendedHandle> {
        self.pending.get(&ticket)
    }

    pub(crate) fn unpark(&mut self, handle: &SuspendedHandle) -> bool {
        self.pending.shift_remove(&handle.ticket).is_some()
    }

    pub(crate) fn drop_pending(&mut self) {
        self.pending.clear();
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("id", &self.id)
            .field("keys", &self.data.keys().collect::<Vec<_>>())
            .field("interrupted", &self.interrupted)
            .field("state", &self.state)
            .field("pending", &self.pending.len())
            .field("visits", &self.visits)
            .finish()
    }
}
