// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in node kinds.
//!
//! [`BuiltinNode`] is the closed set of node kinds a skill asset can store.
//! Each kind lives in the module for its category and implements
//! [`NodeBehavior`]; the enum dispatches to them. Category and label are
//! static data keyed by the type tag, see [`node_info`].

mod conditions;
mod events;
mod flow;
mod math;

pub use conditions::{ContextFlag, ContextNumber};
pub use events::{Accumulate, PlayCue};
pub use flow::{Branch, Trigger};
pub use math::{Arithmetic, ArithmeticOp, BoolInput, Compare, CompareOp, NumberInput, TextInput};

use crate::context::ExecutionContext;
use crate::evaluation::NodeScope;
use crate::node::{Completion, EventKind, NodeBehavior, NodeCategory};
use crate::port::Port;
use crate::socket::Value;
use serde::{Deserialize, Serialize};

/// Static description of a built-in node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeInfo {
    /// Type tag
    pub tag: &'static str,
    /// Category
    pub category: NodeCategory,
    /// One-line description shown to designers
    pub label: &'static str,
}

const CATALOG: &[NodeInfo] = &[
    NodeInfo {
        tag: flow::TRIGGER,
        category: NodeCategory::Flow,
        label: "Starts the graph when a battle event fires",
    },
    NodeInfo {
        tag: flow::BRANCH,
        category: NodeCategory::Flow,
        label: "Continues on True or False",
    },
    NodeInfo {
        tag: math::NUMBER_INPUT,
        category: NodeCategory::Math,
        label: "Outputs a number",
    },
    NodeInfo {
        tag: math::BOOL_INPUT,
        category: NodeCategory::Math,
        label: "Outputs a boolean",
    },
    NodeInfo {
        tag: math::TEXT_INPUT,
        category: NodeCategory::Math,
        label: "Outputs a piece of text",
    },
    NodeInfo {
        tag: math::ARITHMETIC,
        category: NodeCategory::Math,
        label: "Combines two numbers",
    },
    NodeInfo {
        tag: math::COMPARE,
        category: NodeCategory::Math,
        label: "Compares two numbers",
    },
    NodeInfo {
        tag: conditions::CONTEXT_NUMBER,
        category: NodeCategory::Conditions,
        label: "Reads a number supplied by the battle",
    },
    NodeInfo {
        tag: conditions::CONTEXT_FLAG,
        category: NodeCategory::Conditions,
        label: "Checks a flag supplied by the battle",
    },
    NodeInfo {
        tag: events::ACCUMULATE,
        category: NodeCategory::Events,
        label: "Adds an amount to a battle value",
    },
    NodeInfo {
        tag: events::PLAY_CUE,
        category: NodeCategory::Events,
        label: "Waits for an animation or effect to finish",
    },
];

/// Every built-in node kind, in catalog order
pub fn catalog() -> &'static [NodeInfo] {
    CATALOG
}

/// Look up a built-in node kind by type tag
pub fn node_info(tag: &str) -> Option<&'static NodeInfo> {
    CATALOG.iter().find(|info| info.tag == tag)
}

/// Serializable built-in node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BuiltinNode {
    /// Entry point for a battle event
    Trigger(Trigger),
    /// Two-way choice on a boolean
    Branch(Branch),
    /// Constant number
    NumberInput(NumberInput),
    /// Constant boolean
    BoolInput(BoolInput),
    /// Constant text
    TextInput(TextInput),
    /// Binary arithmetic
    Arithmetic(Arithmetic),
    /// Numeric comparison
    Compare(Compare),
    /// Number read from the context
    ContextNumber(ContextNumber),
    /// Flag read from the context
    ContextFlag(ContextFlag),
    /// Adds to a context accumulator
    Accumulate(Accumulate),
    /// Suspends until the presentation layer finishes a cue
    PlayCue(PlayCue),
}

impl BuiltinNode {
    fn inner(&self) -> &dyn NodeBehavior {
        match self {
            Self::Trigger(node) => node,
            Self::Branch(node) => node,
            Self::NumberInput(node) => node,
            Self::BoolInput(node) => node,
            Self::TextInput(node) => node,
            Self::Arithmetic(node) => node,
            Self::Compare(node) => node,
            Self::ContextNumber(node) => node,
            Self::ContextFlag(node) => node,
            Self::Accumulate(node) => node,
            Self::PlayCue(node) => node,
        }
    }

    /// Static catalog entry for this kind
    pub fn info(&self) -> &'static NodeInfo {
        let tag = self.inner().type_tag();
        // Every variant's tag is in the catalog
        node_info(tag).unwrap_or(&CATALOG[0])
    }

    /// Category of this kind
    pub fn category(&self) -> NodeCategory {
        self.info().category
    }
}

impl NodeBehavior for BuiltinNode {
    fn type_tag(&self) -> &str {
        self.inner().type_tag()
    }

    fn ports(&self) -> Vec<Port> {
        self.inner().ports()
    }

    fn event_kind(&self) -> Option<&EventKind> {
        self.inner().event_kind()
    }

    fn execute(&self, scope: &NodeScope<'_>, ctx: &mut ExecutionContext) -> Completion {
        self.inner().execute(scope, ctx)
    }

    fn evaluate(&self, output: &str, scope: &NodeScope<'_>, ctx: &ExecutionContext) -> Option<Value> {
        self.inner().evaluate(output, scope, ctx)
    }

    fn to_builtin(&self) -> Option<BuiltinNode> {
        Some(self.clone())
    }
}

macro_rules! impl_from_kind {
    ($($kind:ident),* $(,)?) => {
        $(
            impl From<$kind> for BuiltinNode {
                fn from(node: $kind) -> Self {
                    Self::$kind(node)
                }
            }
        )*
    };
}

impl_from_kind!(
    Trigger,
    Branch,
    NumberInput,
    BoolInput,
    TextInput,
    Arithmetic,
    Compare,
    ContextNumber,
    ContextFlag,
    Accumulate,
    PlayCue,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<BuiltinNode> {
        vec![
            Trigger::new(EventKind::BattleStarts).into(),
            Branch.into(),
            NumberInput::new(1.0).into(),
            BoolInput::new(true).into(),
            TextInput::new("x").into(),
            Arithmetic::new(ArithmeticOp::Add).into(),
            Compare::new(CompareOp::Less).into(),
            ContextNumber::new("hp").into(),
            ContextFlag::new("riding").into(),
            Accumulate::new("damage").into(),
            PlayCue::new("flash").into(),
        ]
    }

    #[test]
    fn test_every_kind_is_catalogued() {
        let nodes = samples();
        assert_eq!(nodes.len(), catalog().len());
        for node in &nodes {
            let info = node_info(node.type_tag()).expect("catalogued");
            assert_eq!(node.info(), info);
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(BuiltinNode::from(Branch).category(), NodeCategory::Flow);
        assert_eq!(BuiltinNode::from(NumberInput::new(0.0)).category(), NodeCategory::Math);
        assert_eq!(BuiltinNode::from(ContextFlag::new("riding")).category(), NodeCategory::Conditions);
        assert_eq!(BuiltinNode::from(PlayCue::new("flash")).category(), NodeCategory::Events);
    }

    #[test]
    fn test_only_triggers_are_entries() {
        for node in samples() {
            let ports = node.ports();
            let has_flow_in = ports.iter().any(|p| p.is_input() && p.socket.is_flow());
            let has_flow_out = ports.iter().any(|p| p.is_output() && p.socket.is_flow());
            let is_entry = has_flow_out && !has_flow_in;
            assert_eq!(is_entry, node.event_kind().is_some(), "{}", node.type_tag());
        }
    }

    #[test]
    fn test_ron_form() {
        let node = BuiltinNode::from(Accumulate::new("damage"));
        let text = ron::ser::to_string(&node).unwrap();
        let back: BuiltinNode = ron::from_str(&text).unwrap();
        assert_eq!(back, node);
    }
}
