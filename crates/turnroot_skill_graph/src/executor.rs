// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph traversal: triggering, suspension and continuation.
//!
//! Traversal is depth-first and runs entirely on the caller's thread. A node
//! either completes by naming an output port, whose downstream nodes are
//! visited next in connection order, or suspends. A suspended branch parks
//! until the caller hands its [`SuspendedHandle`] back to
//! [`GraphExecutor::continue_from`]; sibling branches keep running.
//!
//! The interruption flag on the context is checked before every visit.

use crate::context::{ContextId, ExecutionContext, ExecutionState};
use crate::evaluation::NodeScope;
use crate::graph::{Graph, GraphError};
use crate::node::{Completion, EventKind, Node, NodeId};
use crate::settings::ExecutorSettings;
use serde::{Deserialize, Serialize};

/// Identifies one parked branch of one traversal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuspendedHandle {
    /// Context the suspension belongs to
    pub context: ContextId,
    /// Node that suspended
    pub node: NodeId,
    /// Distinguishes repeated suspensions of the same node
    pub ticket: u64,
    /// What the presentation layer should play before resuming
    pub cue: Option<String>,
}

/// What a `trigger` or `continue_from` call left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// No entry node reacts to the event
    NoMatchingEntry,
    /// Every branch finished
    Completed,
    /// Branches are parked; the handles are every outstanding suspension
    Suspended(Vec<SuspendedHandle>),
    /// The interruption flag stopped the traversal
    Interrupted,
    /// The handle was already resumed, or its traversal already ended
    AlreadyComplete,
}

impl ExecutionStatus {
    /// Outstanding suspensions, empty unless `Suspended`
    pub fn handles(&self) -> &[SuspendedHandle] {
        match self {
            Self::Suspended(handles) => handles,
            _ => &[],
        }
    }

    /// Whether the traversal is waiting on external signals
    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended(_))
    }
}

/// Misuse of the executor by its caller
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionError {
    /// Contexts are single-use
    #[error("Context {0} was already used for a trigger")]
    ContextReused(ContextId),

    /// The handle came from another traversal
    #[error("Handle belongs to context {found}, not {expected}")]
    ContextMismatch {
        /// Context passed in
        expected: ContextId,
        /// Context named by the handle
        found: ContextId,
    },

    /// The handle names a node this graph does not have
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// The handle does not match the suspension parked under its ticket
    #[error("Handle does not match suspension {ticket}")]
    HandleMismatch {
        /// Ticket named by the handle
        ticket: u64,
    },

    /// Continuation must name a flow output of the suspended node
    #[error("Node {node} has no flow output {port:?}")]
    InvalidContinuation {
        /// Suspended node
        node: NodeId,
        /// Requested port
        port: String,
    },
}

/// Drives traversals over one validated graph.
///
/// Holds no per-traversal state, so a single executor can serve any number
/// of contexts, including from several threads.
#[derive(Debug, Clone)]
pub struct GraphExecutor<'g> {
    graph: &'g Graph,
    settings: ExecutorSettings,
}

impl<'g> GraphExecutor<'g> {
    /// Create an executor with default settings; fails if the graph does not validate
    pub fn new(graph: &'g Graph) -> Result<Self, GraphError> {
        Self::with_settings(graph, ExecutorSettings::default())
    }

    /// Create an executor with explicit settings
    pub fn with_settings(graph: &'g Graph, settings: ExecutorSettings) -> Result<Self, GraphError> {
        graph.validate()?;
        Ok(Self { graph, settings })
    }

    /// The graph being executed
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Active settings
    pub fn settings(&self) -> &ExecutorSettings {
        &self.settings
    }

    /// Run every entry node reacting to `event`, in insertion order
    pub fn trigger(&self, event: &EventKind, ctx: &mut ExecutionContext) -> Result<ExecutionStatus, ExecutionError> {
        if ctx.state() != ExecutionState::Idle {
            return Err(ExecutionError::ContextReused(ctx.id()));
        }

        let mut frontier: Vec<NodeId> = self
            .graph
            .entry_nodes()
            .filter(|n| n.event_kind() == Some(event))
            .map(|n| n.id)
            .collect();
        if frontier.is_empty() {
            tracing::debug!(graph = %self.graph.name, %event, "No entry node for event");
            return Ok(ExecutionStatus::NoMatchingEntry);
        }

        tracing::info!(
            graph = %self.graph.name,
            %event,
            context = %ctx.id(),
            entries = frontier.len(),
            "Triggering skill graph"
        );

        // The frontier is a stack
        frontier.reverse();
        ctx.set_state(ExecutionState::Running);
        self.run(frontier, ctx);
        Ok(self.settle(ctx))
    }

    /// Resume a parked branch from the given flow output of its node
    pub fn continue_from(
        &self,
        handle: &SuspendedHandle,
        port: &str,
        ctx: &mut ExecutionContext,
    ) -> Result<ExecutionStatus, ExecutionError> {
        self.resume_with(handle, Some(port), ctx)
    }

    /// Resume a parked branch from its node's first flow output
    pub fn resume(&self, handle: &SuspendedHandle, ctx: &mut ExecutionContext) -> Result<ExecutionStatus, ExecutionError> {
        self.resume_with(handle, None, ctx)
    }

    fn resume_with(
        &self,
        handle: &SuspendedHandle,
        port: Option<&str>,
        ctx: &mut ExecutionContext,
    ) -> Result<ExecutionStatus, ExecutionError> {
        if handle.context != ctx.id() {
            return Err(ExecutionError::ContextMismatch {
                expected: ctx.id(),
                found: handle.context,
            });
        }
        if ctx.state() == ExecutionState::Interrupted {
            return Ok(ExecutionStatus::Interrupted);
        }
        match ctx.parked(handle.ticket) {
            None => {
                tracing::debug!(node = %handle.node, ticket = handle.ticket, "Ignoring duplicate resume");
                return Ok(ExecutionStatus::AlreadyComplete);
            }
            Some(parked) if parked != handle => {
                return Err(ExecutionError::HandleMismatch { ticket: handle.ticket });
            }
            Some(_) => {}
        }

        let node = self
            .graph
            .node(handle.node)
            .ok_or(ExecutionError::NodeNotFound(handle.node))?;
        let port = match port {
            Some(port) => {
                let is_flow_output = node.output(port).is_some_and(|p| p.socket.is_flow());
                if !is_flow_output {
                    return Err(ExecutionError::InvalidContinuation {
                        node: node.id,
                        port: port.to_string(),
                    });
                }
                Some(port)
            }
            None => node.flow_outputs().next().map(|p| p.name.as_str()),
        };

        ctx.unpark(handle);
        ctx.set_state(ExecutionState::Running);
        tracing::debug!(node = %node.name, port = ?port, context = %ctx.id(), "Continuing traversal");

        let mut frontier = Vec::new();
        if let Some(port) = port {
            self.push_downstream(node, port, &mut frontier);
        }
        self.run(frontier, ctx);
        Ok(self.settle(ctx))
    }

    fn run(&self, mut frontier: Vec<NodeId>, ctx: &mut ExecutionContext) {
        while let Some(node_id) = frontier.pop() {
            if ctx.is_interrupted() {
                tracing::debug!(context = %ctx.id(), skipped = frontier.len() + 1, "Traversal interrupted");
                return;
            }
            if ctx.visits() >= self.settings.max_node_visits {
                tracing::warn!(
                    graph = %self.graph.name,
                    limit = self.settings.max_node_visits,
                    "Node visit budget exhausted, interrupting traversal"
                );
                ctx.interrupt();
                return;
            }

            let Some(node) = self.graph.node(node_id) else {
                continue;
            };
            ctx.record_visit(node_id, self.settings.record_trace);
            tracing::debug!(node = %node.name, kind = node.behavior().type_tag(), "Executing node");

            let scope = NodeScope::new(self.graph, node);
            match node.behavior().execute(&scope, ctx) {
                Completion::Signal(port) => self.push_downstream(node, &port, &mut frontier),
                Completion::Suspend { cue } => {
                    let handle = ctx.park(node_id, cue);
                    tracing::debug!(node = %node.name, ticket = handle.ticket, cue = ?handle.cue, "Node suspended");
                }
                Completion::End => {}
            }
        }
    }

    /// Push the nodes fed by `port` so the first connection pops first
    fn push_downstream(&self, node: &Node, port: &str, frontier: &mut Vec<NodeId>) {
        match node.output(port) {
            Some(p) if p.socket.is_flow() => {}
            Some(_) => {
                tracing::warn!(node = %node.name, port, "Node signalled a data port; branch ends");
                return;
            }
            None => {
                tracing::warn!(node = %node.name, port, "Node signalled an unknown port; branch ends");
                return;
            }
        }

        let start = frontier.len();
        frontier.extend(self.graph.downstream(node.id, port).map(|dest| dest.node));
        frontier[start..].reverse();
    }

    fn settle(&self, ctx: &mut ExecutionContext) -> ExecutionStatus {
        if ctx.is_interrupted() {
            ctx.drop_pending();
            ctx.set_state(ExecutionState::Interrupted);
            tracing::info!(graph = %self.graph.name, context = %ctx.id(), "Skill graph interrupted");
            return ExecutionStatus::Interrupted;
        }

        let handles: Vec<SuspendedHandle> = ctx.pending().cloned().collect();
        if handles.is_empty() {
            ctx.set_state(ExecutionState::Completed);
            tracing::info!(graph = %self.graph.name, context = %ctx.id(), visits = ctx.visits(), "Skill graph completed");
            ExecutionStatus::Completed
        } else {
            ctx.set_state(ExecutionState::Suspended);
            ExecutionStatus::Suspended(handles)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{Branch, BoolInput, PlayCue, Trigger};
    use crate::port::Port;
    use crate::node::NodeBehavior;
    use crate::socket::SocketType;
    use std::thread;

    /// Appends its label to a `Vec<&str>` in the context under "log"
    #[derive(Debug)]
    struct Record(&'static str);

    impl NodeBehavior for Record {
        fn type_tag(&self) -> &str {
            "record"
        }

        fn ports(&self) -> Vec<Port> {
            vec![Port::flow_in("Exec"), Port::flow_out("Then")]
        }

        fn execute(&self, scope: &NodeScope<'_>, ctx: &mut ExecutionContext) -> Completion {
            log_entry(ctx, self.0);
            scope.complete()
        }
    }

    /// Records, then raises the interruption flag
    #[derive(Debug)]
    struct Halt(&'static str);

    impl NodeBehavior for Halt {
        fn type_tag(&self) -> &str {
            "halt"
        }

        fn ports(&self) -> Vec<Port> {
            vec![Port::flow_in("Exec"), Port::flow_out("Then")]
        }

        fn execute(&self, scope: &NodeScope<'_>, ctx: &mut ExecutionContext) -> Completion {
            log_entry(ctx, self.0);
            ctx.interrupt();
            scope.complete()
        }
    }

    /// Signals whatever port it was built with
    #[derive(Debug)]
    struct Signals(&'static str);

    impl NodeBehavior for Signals {
        fn type_tag(&self) -> &str {
            "signals"
        }

        fn ports(&self) -> Vec<Port> {
            vec![
                Port::flow_in("Exec"),
                Port::flow_out("Then"),
                Port::output("Value", SocketType::Number),
            ]
        }

        fn execute(&self, _scope: &NodeScope<'_>, _ctx: &mut ExecutionContext) -> Completion {
            Completion::signal(self.0)
        }
    }

    fn log_entry(ctx: &mut ExecutionContext, label: &'static str) {
        match ctx.get_mut::<Vec<&'static str>>("log") {
            Some(log) => log.push(label),
            None => ctx.set("log", vec![label]),
        }
    }

    fn log(ctx: &ExecutionContext) -> Vec<&'static str> {
        ctx.get::<Vec<&'static str>>("log").cloned().unwrap_or_default()
    }

    fn linear_chain() -> (Graph, [NodeId; 3]) {
        let mut graph = Graph::new("Chain");
        let start = graph.add_node("Start", Trigger::new(EventKind::TurnStarts)).unwrap();
        let a = graph.add_node("A", Record("A")).unwrap();
        let b = graph.add_node("B", Record("B")).unwrap();
        let c = graph.add_node("C", Record("C")).unwrap();
        graph.connect(start, "Then", a, "Exec").unwrap();
        graph.connect(a, "Then", b, "Exec").unwrap();
        graph.connect(b, "Then", c, "Exec").unwrap();
        (graph, [a, b, c])
    }

    #[test]
    fn test_executor_requires_valid_graph() {
        let empty = Graph::new("Empty");
        assert_eq!(GraphExecutor::new(&empty).unwrap_err(), GraphError::EmptyGraph);
    }

    #[test]
    fn test_linear_chain_runs_in_order() {
        let (graph, [a, b, c]) = linear_chain();
        let executor = GraphExecutor::new(&graph).unwrap();
        let mut ctx = ExecutionContext::new();

        let status = executor.trigger(&EventKind::TurnStarts, &mut ctx).unwrap();
        assert_eq!(status, ExecutionStatus::Completed);
        assert_eq!(ctx.state(), ExecutionState::Completed);
        assert_eq!(log(&ctx), vec!["A", "B", "C"]);
        assert_eq!(&ctx.trace()[1..], &[a, b, c]);
        assert_eq!(ctx.visits(), 4);
    }

    #[test]
    fn test_no_matching_entry() {
        let (graph, _) = linear_chain();
        let executor = GraphExecutor::new(&graph).unwrap();
        let mut ctx = ExecutionContext::new();

        let status = executor.trigger(&EventKind::EnemyDefeated, &mut ctx).unwrap();
        assert_eq!(status, ExecutionStatus::NoMatchingEntry);
        assert_eq!(ctx.visits(), 0);
        assert_eq!(ctx.state(), ExecutionState::Idle);
    }

    #[test]
    fn test_context_is_single_use() {
        let (graph, _) = linear_chain();
        let executor = GraphExecutor::new(&graph).unwrap();
        let mut ctx = ExecutionContext::new();
        executor.trigger(&EventKind::TurnStarts, &mut ctx).unwrap();

        assert_eq!(
            executor.trigger(&EventKind::TurnStarts, &mut ctx),
            Err(ExecutionError::ContextReused(ctx.id()))
        );
        assert_eq!(log(&ctx), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_branch_exclusivity() {
        let mut graph = Graph::new("Branching");
        let start = graph.add_node("Start", Trigger::new(EventKind::UnitAttacks)).unwrap();
        let flag = graph.add_node("Flag", BoolInput::new(true)).unwrap();
        let branch = graph.add_node("Branch", Branch).unwrap();
        let d = graph.add_node("D", Record("D")).unwrap();
        let e = graph.add_node("E", Record("E")).unwrap();
        graph.connect(start, "Then", branch, "Exec").unwrap();
        graph.connect(flag, "Value", branch, "Condition").unwrap();
        graph.connect(branch, "True", d, "Exec").unwrap();
        graph.connect(branch, "False", e, "Exec").unwrap();

        let executor = GraphExecutor::new(&graph).unwrap();
        for _ in 0..5 {
            let mut ctx = ExecutionContext::new();
            executor.trigger(&EventKind::UnitAttacks, &mut ctx).unwrap();
            assert_eq!(log(&ctx), vec!["D"]);
            assert!(!ctx.trace().contains(&e));
        }
    }

    #[test]
    fn test_fan_out_follows_creation_order() {
        let mut graph = Graph::new("Fan");
        let start = graph.add_node("Start", Trigger::new(EventKind::BattleStarts)).unwrap();
        let d3 = graph.add_node("D3", Record("D3")).unwrap();
        let d1 = graph.add_node("D1", Record("D1")).unwrap();
        let d2 = graph.add_node("D2", Record("D2")).unwrap();
        let after = graph.add_node("After", Record("D1.after")).unwrap();
        graph.connect(start, "Then", d1, "Exec").unwrap();
        graph.connect(start, "Then", d2, "Exec").unwrap();
        graph.connect(start, "Then", d3, "Exec").unwrap();
        graph.connect(d1, "Then", after, "Exec").unwrap();

        let executor = GraphExecutor::new(&graph).unwrap();
        for _ in 0..3 {
            let mut ctx = ExecutionContext::new();
            executor.trigger(&EventKind::BattleStarts, &mut ctx).unwrap();
            // Depth-first: D1's subtree finishes before D2 starts
            assert_eq!(log(&ctx), vec!["D1", "D1.after", "D2", "D3"]);
        }
    }

    #[test]
    fn test_suspension_and_resume() {
        let mut graph = Graph::new("Animated");
        let start = graph.add_node("Start", Trigger::new(EventKind::UnitAttacks)).unwrap();
        let cue = graph.add_node("Swing", PlayCue::new("sword_swing")).unwrap();
        let hit = graph.add_node("Hit", Record("hit")).unwrap();
        let side = graph.add_node("Side", Record("side")).unwrap();
        graph.connect(start, "Then", cue, "Exec").unwrap();
        graph.connect(start, "Then", side, "Exec").unwrap();
        graph.connect(cue, "Done", hit, "Exec").unwrap();

        let executor = GraphExecutor::new(&graph).unwrap();
        let mut ctx = ExecutionContext::new();
        let status = executor.trigger(&EventKind::UnitAttacks, &mut ctx).unwrap();

        // The sibling branch runs; the cue's branch waits
        assert_eq!(log(&ctx), vec!["side"]);
        assert_eq!(ctx.state(), ExecutionState::Suspended);
        let handles = status.handles().to_vec();
        assert_eq!(handles.len(), 1);
        assert_eq!(handles[0].node, cue);
        assert_eq!(handles[0].cue.as_deref(), Some("sword_swing"));

        let status = executor.continue_from(&handles[0], "Done", &mut ctx).unwrap();
        assert_eq!(status, ExecutionStatus::Completed);
        assert_eq!(log(&ctx), vec!["side", "hit"]);

        // A duplicate signal from the presentation layer is harmless
        let again = executor.continue_from(&handles[0], "Done", &mut ctx).unwrap();
        assert_eq!(again, ExecutionStatus::AlreadyComplete);
        assert_eq!(log(&ctx), vec!["side", "hit"]);
    }

    #[test]
    fn test_resume_defaults_to_first_flow_output() {
        let mut graph = Graph::new("Resume");
        let start = graph.add_node("Start", Trigger::new(EventKind::UnitAttacks)).unwrap();
        let cue = graph.add_node("Cue", PlayCue::new("flash")).unwrap();
        let hit = graph.add_node("Hit", Record("hit")).unwrap();
        graph.connect(start, "Then", cue, "Exec").unwrap();
        graph.connect(cue, "Done", hit, "Exec").unwrap();

        let executor = GraphExecutor::new(&graph).unwrap();
        let mut ctx = ExecutionContext::new();
        let status = executor.trigger(&EventKind::UnitAttacks, &mut ctx).unwrap();
        let handle = status.handles()[0].clone();

        assert_eq!(executor.resume(&handle, &mut ctx).unwrap(), ExecutionStatus::Completed);
        assert_eq!(log(&ctx), vec!["hit"]);
    }

    #[test]
    fn test_continue_rejects_foreign_handles_and_bad_ports() {
        let mut graph = Graph::new("Checks");
        let start = graph.add_node("Start", Trigger::new(EventKind::UnitAttacks)).unwrap();
        let cue = graph.add_node("Cue", PlayCue::new("flash")).unwrap();
        graph.connect(start, "Then", cue, "Exec").unwrap();
        let executor = GraphExecutor::new(&graph).unwrap();

        let mut ctx = ExecutionContext::new();
        let handle = executor.trigger(&EventKind::UnitAttacks, &mut ctx).unwrap().handles()[0].clone();

        let mut other = ExecutionContext::new();
        assert_eq!(
            executor.continue_from(&handle, "Done", &mut other),
            Err(ExecutionError::ContextMismatch {
                expected: other.id(),
                found: ctx.id(),
            })
        );
        assert!(matches!(
            executor.continue_from(&handle, "Exec", &mut ctx),
            Err(ExecutionError::InvalidContinuation { .. })
        ));
        // Still parked after the rejected calls
        assert_eq!(ctx.pending().count(), 1);
        assert_eq!(executor.continue_from(&handle, "Done", &mut ctx).unwrap(), ExecutionStatus::Completed);
    }

    #[test]
    fn test_altered_handle_is_rejected() {
        let mut graph = Graph::new("Tampered");
        let start = graph.add_node("Start", Trigger::new(EventKind::UnitAttacks)).unwrap();
        let cue = graph.add_node("Cue", PlayCue::new("flash")).unwrap();
        let hit = graph.add_node("Hit", Record("hit")).unwrap();
        let elsewhere = graph.add_node("Elsewhere", Record("elsewhere")).unwrap();
        let other = graph.add_node("Other", Trigger::new(EventKind::TurnEnds)).unwrap();
        graph.connect(start, "Then", cue, "Exec").unwrap();
        graph.connect(cue, "Done", hit, "Exec").unwrap();
        graph.connect(other, "Then", elsewhere, "Exec").unwrap();
        let executor = GraphExecutor::new(&graph).unwrap();

        let mut ctx = ExecutionContext::new();
        let handle = executor.trigger(&EventKind::UnitAttacks, &mut ctx).unwrap().handles()[0].clone();

        let mut altered = handle.clone();
        altered.node = other;
        assert_eq!(
            executor.resume(&altered, &mut ctx),
            Err(ExecutionError::HandleMismatch { ticket: handle.ticket })
        );
        assert!(log(&ctx).is_empty());
        assert_eq!(ctx.pending().count(), 1);

        // The genuine handle still resumes the real branch
        assert_eq!(executor.resume(&handle, &mut ctx).unwrap(), ExecutionStatus::Completed);
        assert_eq!(log(&ctx), vec!["hit"]);
    }

    #[test]
    fn test_interruption_stops_remaining_nodes() {
        let mut graph = Graph::new("Interrupted");
        let start = graph.add_node("Start", Trigger::new(EventKind::TurnEnds)).unwrap();
        let a = graph.add_node("A", Halt("A")).unwrap();
        let b = graph.add_node("B", Record("B")).unwrap();
        let c = graph.add_node("C", Record("C")).unwrap();
        graph.connect(start, "Then", a, "Exec").unwrap();
        graph.connect(a, "Then", b, "Exec").unwrap();
        graph.connect(b, "Then", c, "Exec").unwrap();

        let executor = GraphExecutor::new(&graph).unwrap();
        let mut ctx = ExecutionContext::new();
        let status = executor.trigger(&EventKind::TurnEnds, &mut ctx).unwrap();

        assert_eq!(status, ExecutionStatus::Interrupted);
        assert_eq!(ctx.state(), ExecutionState::Interrupted);
        assert_eq!(log(&ctx), vec!["A"]);
    }

    #[test]
    fn test_interrupt_while_suspended() {
        let mut graph = Graph::new("Cancel");
        let start = graph.add_node("Start", Trigger::new(EventKind::UnitAttacks)).unwrap();
        let cue = graph.add_node("Cue", PlayCue::new("charge")).unwrap();
        let hit = graph.add_node("Hit", Record("hit")).unwrap();
        graph.connect(start, "Then", cue, "Exec").unwrap();
        graph.connect(cue, "Done", hit, "Exec").unwrap();

        let executor = GraphExecutor::new(&graph).unwrap();
        let mut ctx = ExecutionContext::new();
        let handle = executor.trigger(&EventKind::UnitAttacks, &mut ctx).unwrap().handles()[0].clone();

        ctx.interrupt();
        assert_eq!(executor.continue_from(&handle, "Done", &mut ctx).unwrap(), ExecutionStatus::Interrupted);
        assert_eq!(log(&ctx), Vec::<&str>::new());
        assert_eq!(ctx.pending().count(), 0);
        // Once interrupted, later signals change nothing
        assert_eq!(executor.continue_from(&handle, "Done", &mut ctx).unwrap(), ExecutionStatus::Interrupted);
    }

    #[test]
    fn test_bad_signals_end_the_branch() {
        let mut graph = Graph::new("Bad signals");
        let start = graph.add_node("Start", Trigger::new(EventKind::TurnStarts)).unwrap();
        let data = graph.add_node("Data", Signals("Value")).unwrap();
        let unknown = graph.add_node("Unknown", Signals("Nowhere")).unwrap();
        let never = graph.add_node("Never", Record("never")).unwrap();
        graph.connect(start, "Then", data, "Exec").unwrap();
        graph.connect(start, "Then", unknown, "Exec").unwrap();
        graph.connect(data, "Then", never, "Exec").unwrap();

        let executor = GraphExecutor::new(&graph).unwrap();
        let mut ctx = ExecutionContext::new();
        assert_eq!(executor.trigger(&EventKind::TurnStarts, &mut ctx).unwrap(), ExecutionStatus::Completed);
        assert!(log(&ctx).is_empty());
        assert_eq!(ctx.visits(), 3);
    }

    #[test]
    fn test_visit_budget_interrupts() {
        let (graph, _) = linear_chain();
        let settings = ExecutorSettings {
            record_trace: false,
            max_node_visits: 2,
        };
        let executor = GraphExecutor::with_settings(&graph, settings).unwrap();
        let mut ctx = ExecutionContext::new();

        assert_eq!(executor.trigger(&EventKind::TurnStarts, &mut ctx).unwrap(), ExecutionStatus::Interrupted);
        assert_eq!(log(&ctx), vec!["A"]);
        assert!(ctx.trace().is_empty());
    }

    #[test]
    fn test_reentrant_contexts_are_independent() {
        let mut graph = Graph::new("Shared");
        let start = graph.add_node("Start", Trigger::new(EventKind::UnitAttacks)).unwrap();
        let cue = graph.add_node("Cue", PlayCue::new("flash")).unwrap();
        let a = graph.add_node("A", Record("A")).unwrap();
        graph.connect(start, "Then", cue, "Exec").unwrap();
        graph.connect(cue, "Done", a, "Exec").unwrap();
        let executor = GraphExecutor::new(&graph).unwrap();

        let mut first = ExecutionContext::new().with("caster", "Alm");
        let mut second = ExecutionContext::new().with("caster", "Celica");
        let h1 = executor.trigger(&EventKind::UnitAttacks, &mut first).unwrap().handles()[0].clone();
        let h2 = executor.trigger(&EventKind::UnitAttacks, &mut second).unwrap().handles()[0].clone();

        executor.continue_from(&h1, "Done", &mut first).unwrap();
        assert_eq!(log(&first), vec!["A"]);
        assert!(log(&second).is_empty());
        assert_eq!(second.state(), ExecutionState::Suspended);
        assert_eq!(second.get::<&str>("caster"), Some(&"Celica"));

        executor.continue_from(&h2, "Done", &mut second).unwrap();
        assert_eq!(log(&second), vec!["A"]);
        assert_eq!(log(&first), vec!["A"]);
    }

    #[test]
    fn test_concurrent_triggers_share_one_executor() {
        let (graph, _) = linear_chain();
        let executor = GraphExecutor::new(&graph).unwrap();

        thread::scope(|scope| {
            let workers: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        let mut ctx = ExecutionContext::new();
                        let status = executor.trigger(&EventKind::TurnStarts, &mut ctx).unwrap();
                        (status, log(&ctx))
                    })
                })
                .collect();

            for worker in workers {
                let (status, entries) = worker.join().unwrap();
                assert_eq!(status, ExecutionStatus::Completed);
                assert_eq!(entries, vec!["A", "B", "C"]);
            }
        });
    }
}
