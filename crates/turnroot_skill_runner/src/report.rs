// SPDX-License-Identifier: MIT OR Apache-2.0
//! What a dry run did.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use turnroot_skill_graph::{ExecutionContext, ExecutionStatus, Graph, Value};

/// Summary of one triggered event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Graph name
    pub graph: String,
    /// Event that fired
    pub event: String,
    /// Final status
    pub status: String,
    /// Executed node names, in visit order
    pub trace: Vec<String>,
    /// Cues that were auto-resumed, in order
    pub played: Vec<String>,
    /// Cues still waiting
    pub pending: Vec<String>,
    /// Reported context values
    pub values: IndexMap<String, Value>,
}

impl RunReport {
    /// Build a report from the finished context
    pub fn new(
        graph: &Graph,
        event: &str,
        status: &ExecutionStatus,
        ctx: &ExecutionContext,
        played: Vec<String>,
        report_keys: &[String],
    ) -> Self {
        let trace = ctx
            .trace()
            .iter()
            .map(|id| graph.node(*id).map_or_else(|| id.to_string(), |n| n.name.clone()))
            .collect();

        let pending = status
            .handles()
            .iter()
            .map(|h| h.cue.clone().unwrap_or_else(|| h.node.to_string()))
            .collect();

        let keys: Vec<&str> = if report_keys.is_empty() {
            ctx.keys().collect()
        } else {
            report_keys.iter().map(String::as_str).collect()
        };
        let values = keys
            .into_iter()
            .filter_map(|key| plain_value(ctx, key).map(|v| (key.to_string(), v)))
            .collect();

        Self {
            graph: graph.name.clone(),
            event: event.to_string(),
            status: status_label(status).to_string(),
            trace,
            played,
            pending,
            values,
        }
    }
}

fn status_label(status: &ExecutionStatus) -> &'static str {
    match status {
        ExecutionStatus::NoMatchingEntry => "no_matching_entry",
        ExecutionStatus::Completed => "completed",
        ExecutionStatus::Suspended(_) => "suspended",
        ExecutionStatus::Interrupted => "interrupted",
        ExecutionStatus::AlreadyComplete => "already_complete",
    }
}

fn plain_value(ctx: &ExecutionContext, key: &str) -> Option<Value> {
    if let Some(n) = ctx.number(key) {
        return Some(Value::Number(n));
    }
    if let Some(b) = ctx.get::<bool>(key) {
        return Some(Value::Bool(*b));
    }
    ctx.get::<String>(key).map(|s| Value::Text(s.clone()))
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} on {}: {}", self.graph, self.event, self.status)?;
        writeln!(f, "  trace: {}", self.trace.join(" -> "))?;
        if !self.played.is_empty() {
            writeln!(f, "  played: {}", self.played.join(", "))?;
        }
        if !self.pending.is_empty() {
            writeln!(f, "  pending: {}", self.pending.join(", "))?;
        }
        for (key, value) in &self.values {
            writeln!(f, "  {key} = {value}")?;
        }
        Ok(())
    }
}
