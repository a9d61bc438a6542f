//! Edge filtering and structural diagnostics
//!
//! Malformed graphs are never fatal: dangling edges are dropped and counted,
//! cycles are reported and left to the visited sets of each traversal.

use crate::adjacency::Adjacency;
use crate::graph::ConfigGraph;
use crate::node::NodeId;
use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Structural report for one graph snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDiagnostics {
    /// IDs of edges whose source or target does not exist
    pub dangling_edges: Vec<String>,

    /// IDs of internal flow edges left out of adjacency
    pub internal_edges: Vec<String>,

    /// Whether any directed cycle exists
    pub has_cycle: bool,

    /// Nodes that sit on a cycle
    pub cyclic_nodes: BTreeSet<NodeId>,

    /// Nodes with no incoming live edge, in array order
    pub entry_nodes: Vec<NodeId>,
}

impl GraphDiagnostics {
    /// Whether the graph needed no repair
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.dangling_edges.is_empty() && !self.has_cycle
    }
}

/// Adjacency plus diagnostics for one snapshot
#[derive(Debug, Clone)]
pub struct Topology {
    /// Adjacency over live edges
    pub adjacency: Adjacency,

    /// What was dropped or detected
    pub diagnostics: GraphDiagnostics,
}

impl Topology {
    /// Split edges into live, internal and dangling, then build adjacency
    #[must_use]
    pub fn of(graph: &ConfigGraph, internal_prefix: &str) -> Self {
        let mut diagnostics = GraphDiagnostics::default();
        let mut live = Vec::with_capacity(graph.edges().len());

        for edge in graph.edges() {
            if edge.is_internal(internal_prefix) {
                diagnostics.internal_edges.push(edge.id.clone());
            } else if !graph.contains_node(&edge.source) || !graph.contains_node(&edge.target) {
                tracing::warn!(
                    "Dropping dangling edge {} ({} -> {})",
                    edge.id,
                    edge.source,
                    edge.target
                );
                diagnostics.dangling_edges.push(edge.id.clone());
            } else {
                live.push(edge);
            }
        }

        if !diagnostics.internal_edges.is_empty() {
            tracing::debug!("Skipped {} internal edges", diagnostics.internal_edges.len());
        }

        let adjacency = Adjacency::build(live);
        Self::detect_structure(graph, &adjacency, &mut diagnostics);

        Self {
            adjacency,
            diagnostics,
        }
    }

    fn detect_structure(
        graph: &ConfigGraph,
        adjacency: &Adjacency,
        diagnostics: &mut GraphDiagnostics,
    ) {
        // Node positions stand in for IDs so the graph map stays Copy-keyed.
        let mut index: DiGraphMap<usize, ()> =
            DiGraphMap::with_capacity(graph.node_count(), adjacency.edge_count());
        for position in 0..graph.node_count() {
            index.add_node(position);
        }
        for source in adjacency.sources() {
            let Some(from) = graph.position(source) else {
                continue;
            };
            for target in adjacency.targets(source) {
                if let Some(to) = graph.position(target) {
                    index.add_edge(from, to, ());
                }
            }
        }

        diagnostics.has_cycle = is_cyclic_directed(&index);
        if diagnostics.has_cycle {
            let ids: Vec<&NodeId> = graph.nodes().map(|node| &node.id).collect();
            for component in tarjan_scc(&index) {
                let on_cycle = component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&only| index.contains_edge(only, only));
                if on_cycle {
                    diagnostics
                        .cyclic_nodes
                        .extend(component.iter().map(|&position| ids[position].clone()));
                }
            }
            tracing::debug!("Graph has {} nodes on cycles", diagnostics.cyclic_nodes.len());
        }

        diagnostics.entry_nodes = graph
            .nodes()
            .enumerate()
            .filter(|(position, _)| {
                index
                    .neighbors_directed(*position, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|(_, node)| node.id.clone())
            .collect();
    }
}
