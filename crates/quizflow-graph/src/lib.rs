//! Quizflow Graph
//!
//! Node/edge model of a quiz configuration and the reachability passes that
//! annotate it.
//!
//! # Core Concepts
//!
//! - [`ConfigGraph`]: editable snapshot of nodes and edges
//! - [`Topology`]: live-edge [`Adjacency`] plus [`GraphDiagnostics`]
//! - [`propagate_routes`]: router route badges
//! - [`propagate_modifiers`]: selection modifier flags
//!
//! # Example
//!
//! ```rust
//! use quizflow_graph::{propagate_routes, ConfigEdge, ConfigGraph, ConfigNode, NodeId, Route};
//!
//! let mut graph = ConfigGraph::new();
//! graph.add_node(ConfigNode::router("router", vec![Route::new("main", "Main")])).unwrap();
//! graph.add_node(ConfigNode::modifier("leaf")).unwrap();
//! graph.add_edge(ConfigEdge::new("e1", "router", "leaf").from_route("main")).unwrap();
//!
//! let badges = propagate_routes(&graph, &graph.adjacency("flow-"));
//! assert_eq!(badges[&NodeId::new("leaf")][0].label, "R1");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod adjacency;
mod edge;
mod error;
mod graph;
mod modifiers;
mod node;
mod routes;
mod topology;

pub use adjacency::Adjacency;
pub use edge::ConfigEdge;
pub use error::GraphError;
pub use graph::ConfigGraph;
pub use modifiers::{propagate_modifiers, ModifierOutcome};
pub use node::{
    ConfigNode, ModifierSettings, NodeCategory, NodeId, NodeSettings, NodeTypeKey, Route,
    RouterSettings, SongCount,
};
pub use routes::{propagate_routes, RouteBadge, RouteBadges};
pub use topology::{GraphDiagnostics, Topology};
