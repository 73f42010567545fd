// SPDX-License-Identifier: MIT OR Apache-2.0
//! Constants, arithmetic and comparison.
//!
//! These are pure data nodes: no flow ports, evaluated only when pulled.

use super::BuiltinNode;
use crate::context::ExecutionContext;
use crate::evaluation::NodeScope;
use crate::node::NodeBehavior;
use crate::port::Port;
use crate::socket::{SocketType, Value};
use serde::{Deserialize, Serialize};

pub(super) const NUMBER_INPUT: &str = "number_input";
pub(super) const BOOL_INPUT: &str = "bool_input";
pub(super) const TEXT_INPUT: &str = "text_input";
pub(super) const ARITHMETIC: &str = "arithmetic";
pub(super) const COMPARE: &str = "compare";

/// Outputs a fixed number on `Number`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberInput {
    /// Value to output
    pub value: f64,
}

impl NumberInput {
    /// Create a number constant
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl NodeBehavior for NumberInput {
    fn type_tag(&self) -> &str {
        NUMBER_INPUT
    }

    fn ports(&self) -> Vec<Port> {
        vec![Port::output("Number", SocketType::Number)]
    }

    fn evaluate(&self, output: &str, _scope: &NodeScope<'_>, _ctx: &ExecutionContext) -> Option<Value> {
        (output == "Number").then_some(Value::Number(self.value))
    }

    fn to_builtin(&self) -> Option<BuiltinNode> {
        Some(self.clone().into())
    }
}

/// Outputs a fixed boolean on `Value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolInput {
    /// Value to output
    pub value: bool,
}

impl BoolInput {
    /// Create a boolean constant
    pub fn new(value: bool) -> Self {
        Self { value }
    }
}

impl NodeBehavior for BoolInput {
    fn type_tag(&self) -> &str {
        BOOL_INPUT
    }

    fn ports(&self) -> Vec<Port> {
        vec![Port::output("Value", SocketType::Bool)]
    }

    fn evaluate(&self, output: &str, _scope: &NodeScope<'_>, _ctx: &ExecutionContext) -> Option<Value> {
        (output == "Value").then_some(Value::Bool(self.value))
    }

    fn to_builtin(&self) -> Option<BuiltinNode> {
        Some(self.clone().into())
    }
}

/// Outputs fixed text on `Value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInput {
    /// Value to output
    pub value: String,
}

impl TextInput {
    /// Create a text constant
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

impl NodeBehavior for TextInput {
    fn type_tag(&self) -> &str {
        TEXT_INPUT
    }

    fn ports(&self) -> Vec<Port> {
        vec![Port::output("Value", SocketType::Text)]
    }

    fn evaluate(&self, output: &str, _scope: &NodeScope<'_>, _ctx: &ExecutionContext) -> Option<Value> {
        (output == "Value").then(|| Value::Text(self.value.clone()))
    }

    fn to_builtin(&self) -> Option<BuiltinNode> {
        Some(self.clone().into())
    }
}

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArithmeticOp {
    /// `A + B`
    Add,
    /// `A - B`
    Subtract,
    /// `A * B`
    Multiply,
    /// `A / B`, zero when `B` is zero
    Divide,
    /// Smaller of the two
    Min,
    /// Larger of the two
    Max,
}

impl ArithmeticOp {
    /// Apply the operator
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide if b == 0.0 => 0.0,
            Self::Divide => a / b,
            Self::Min => a.min(b),
            Self::Max => a.max(b),
        }
    }
}

/// `Result = A op B`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arithmetic {
    /// Operator
    pub op: ArithmeticOp,
}

impl Arithmetic {
    /// Create an arithmetic node
    pub fn new(op: ArithmeticOp) -> Self {
        Self { op }
    }
}

impl NodeBehavior for Arithmetic {
    fn type_tag(&self) -> &str {
        ARITHMETIC
    }

    fn ports(&self) -> Vec<Port> {
        vec![
            Port::input("A", SocketType::Number),
            Port::input("B", SocketType::Number),
            Port::output("Result", SocketType::Number),
        ]
    }

    fn evaluate(&self, output: &str, scope: &NodeScope<'_>, ctx: &ExecutionContext) -> Option<Value> {
        if output != "Result" {
            return None;
        }
        let a = scope.number("A", ctx);
        let b = scope.number("B", ctx);
        Some(Value::Number(self.op.apply(a, b)))
    }

    fn to_builtin(&self) -> Option<BuiltinNode> {
        Some(self.clone().into())
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    /// `A < B`
    Less,
    /// `A <= B`
    LessOrEqual,
    /// `A == B`
    Equal,
    /// `A != B`
    NotEqual,
    /// `A >= B`
    GreaterOrEqual,
    /// `A > B`
    Greater,
}

impl CompareOp {
    /// Apply the comparison
    pub fn apply(self, a: f64, b: f64) -> bool {
        match self {
            Self::Less => a < b,
            Self::LessOrEqual => a <= b,
            Self::Equal => a == b,
            Self::NotEqual => a != b,
            Self::GreaterOrEqual => a >= b,
            Self::Greater => a > b,
        }
    }
}

/// `Result = A cmp B`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compare {
    /// Comparison
    pub op: CompareOp,
}

impl Compare {
    /// Create a comparison node
    pub fn new(op: CompareOp) -> Self {
        Self { op }
    }
}

impl NodeBehavior for Compare {
    fn type_tag(&self) -> &str {
        COMPARE
    }

    fn ports(&self) -> Vec<Port> {
        vec![
            Port::input("A", SocketType::Number),
            Port::input("B", SocketType::Number),
            Port::output("Result", SocketType::Bool),
        ]
    }

    fn evaluate(&self, output: &str, scope: &NodeScope<'_>, ctx: &ExecutionContext) -> Option<Value> {
        if output != "Result" {
            return None;
        }
        let a = scope.number("A", ctx);
        let b = scope.number("B", ctx);
        Some(Value::Bool(self.op.apply(a, b)))
    }

    fn to_builtin(&self) -> Option<BuiltinNode> {
        Some(self.clone().into())
    }
}
