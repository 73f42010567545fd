// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph runtime for Turnroot skills.
//!
//! Designers author a skill as a graph of nodes. Battle events fire entry
//! nodes, control flows along `Flow` connections, and data is pulled lazily
//! along typed connections when a node reads an input.
//!
//! ## Architecture
//!
//! - [`socket`] and [`port`]: typed connection points
//! - [`graph`]: nodes, connections and connect-time validation
//! - [`node`]: the [`NodeBehavior`] contract every node kind implements
//! - [`evaluation`]: pull-based input resolution
//! - [`executor`]: triggering, suspension, resumption and interruption
//! - [`context`]: per-invocation battle state
//! - [`library`]: the built-in node kinds
//! - [`asset`] and [`settings`]: RON persistence

pub mod asset;
pub mod connection;
pub mod context;
pub mod evaluation;
pub mod executor;
pub mod graph;
pub mod library;
pub mod node;
pub mod port;
pub mod settings;
pub mod socket;

pub use asset::{AssetError, GraphAsset};
pub use connection::{Connection, ConnectionId};
pub use context::{ContextId, ExecutionContext, ExecutionState};
pub use evaluation::NodeScope;
pub use executor::{ExecutionError, ExecutionStatus, GraphExecutor, SuspendedHandle};
pub use graph::{ConnectionError, Graph, GraphError};
pub use library::BuiltinNode;
pub use node::{Completion, EventKind, Node, NodeBehavior, NodeCategory, NodeId};
pub use port::{Capacity, Port, PortDirection, PortRef};
pub use settings::{ExecutorSettings, SettingsError};
pub use socket::{SocketType, Value};
