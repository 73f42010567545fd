// SPDX-License-Identifier: MIT OR Apache-2.0
//! Entry points and control flow.

use super::BuiltinNode;
use crate::context::ExecutionContext;
use crate::evaluation::NodeScope;
use crate::node::{Completion, EventKind, NodeBehavior};
use crate::port::Port;
use crate::socket::SocketType;
use serde::{Deserialize, Serialize};

pub(super) const TRIGGER: &str = "trigger";
pub(super) const BRANCH: &str = "branch";

/// Entry node for one battle event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// Event this entry reacts to
    pub event: EventKind,
}

impl Trigger {
    /// Create a trigger for `event`
    pub fn new(event: EventKind) -> Self {
        Self { event }
    }
}

impl NodeBehavior for Trigger {
    fn type_tag(&self) -> &str {
        TRIGGER
    }

    fn ports(&self) -> Vec<Port> {
        vec![Port::flow_out("Then")]
    }

    fn event_kind(&self) -> Option<&EventKind> {
        Some(&self.event)
    }

    fn to_builtin(&self) -> Option<BuiltinNode> {
        Some(self.clone().into())
    }
}

/// If/else on the `Condition` input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Branch;

impl NodeBehavior for Branch {
    fn type_tag(&self) -> &str {
        BRANCH
    }

    fn ports(&self) -> Vec<Port> {
        vec![
            Port::flow_in("Exec"),
            Port::input("Condition", SocketType::Bool),
            Port::flow_out("True"),
            Port::flow_out("False"),
        ]
    }

    fn execute(&self, scope: &NodeScope<'_>, ctx: &mut ExecutionContext) -> Completion {
        if scope.boolean("Condition", ctx) {
            Completion::signal("True")
        } else {
            Completion::signal("False")
        }
    }

    fn to_builtin(&self) -> Option<BuiltinNode> {
        Some((*self).into())
    }
}
