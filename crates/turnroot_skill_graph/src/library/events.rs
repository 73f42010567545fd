// SPDX-License-Identifier: MIT OR Apache-2.0
//! Nodes that report effects back to the battle or wait on presentation.

use super::BuiltinNode;
use crate::context::ExecutionContext;
use crate::evaluation::NodeScope;
use crate::node::{Completion, NodeBehavior};
use crate::port::Port;
use crate::socket::SocketType;
use serde::{Deserialize, Serialize};

pub(super) const ACCUMULATE: &str = "accumulate";
pub(super) const PLAY_CUE: &str = "play_cue";

/// Adds `Amount` to the number under `key` (e.g. accumulated damage)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accumulate {
    /// Data bag key of the accumulator
    pub key: String,
}

impl Accumulate {
    /// Accumulate into `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl NodeBehavior for Accumulate {
    fn type_tag(&self) -> &str {
        ACCUMULATE
    }

    fn ports(&self) -> Vec<Port> {
        vec![
            Port::flow_in("Exec"),
            Port::input("Amount", SocketType::Number),
            Port::flow_out("Then"),
        ]
    }

    fn execute(&self, scope: &NodeScope<'_>, ctx: &mut ExecutionContext) -> Completion {
        let amount = scope.number("Amount", ctx);
        let total = ctx.add_number(&self.key, amount);
        tracing::debug!(key = %self.key, amount, total, "Accumulated value");
        scope.complete()
    }

    fn to_builtin(&self) -> Option<BuiltinNode> {
        Some(self.clone().into())
    }
}

/// Hands `cue` to the presentation layer and suspends until it calls back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayCue {
    /// Animation or effect identifier
    pub cue: String,
}

impl PlayCue {
    /// Wait on `cue`
    pub fn new(cue: impl Into<String>) -> Self {
        Self { cue: cue.into() }
    }
}

impl NodeBehavior for PlayCue {
    fn type_tag(&self) -> &str {
        PLAY_CUE
    }

    fn ports(&self) -> Vec<Port> {
        vec![Port::flow_in("Exec"), Port::flow_out("Done")]
    }

    fn execute(&self, _scope: &NodeScope<'_>, _ctx: &mut ExecutionContext) -> Completion {
        Completion::Suspend {
            cue: Some(self.cue.clone()),
        }
    }

    fn to_builtin(&self) -> Option<BuiltinNode> {
        Some(self.clone().into())
    }
}
