//! Adjacency built from the edge list
//!
//! Insertion order is kept everywhere so traversals are deterministic for a
//! given graph.

use crate::edge::ConfigEdge;
use crate::node::NodeId;
use indexmap::{IndexMap, IndexSet};
use std::collections::VecDeque;

/// Outgoing adjacency, plus the targets of each router route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    targets: IndexMap<NodeId, IndexSet<NodeId>>,
    routes: IndexMap<(NodeId, String), IndexSet<NodeId>>,
    edge_count: usize,
}

impl Adjacency {
    /// Build from edges
    ///
    /// Performs no node-existence checks; callers drop dangling and internal
    /// edges beforehand. Runs in O(E).
    #[must_use]
    pub fn build<'a>(edges: impl IntoIterator<Item = &'a ConfigEdge>) -> Self {
        let mut adjacency = Self::default();
        for edge in edges {
            adjacency
                .targets
                .entry(edge.source.clone())
                .or_default()
                .insert(edge.target.clone());

            if let Some(route) = &edge.source_handle {
                adjacency
                    .routes
                    .entry((edge.source.clone(), route.clone()))
                    .or_default()
                    .insert(edge.target.clone());
            }
            adjacency.edge_count += 1;
        }
        adjacency
    }

    /// Direct targets of a node, in insertion order
    pub fn targets<'a>(&'a self, node: &NodeId) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.targets.get(node).into_iter().flatten()
    }

    /// Targets of the edges leaving `router` through `route_id`
    pub fn route_targets<'a>(
        &'a self,
        router: &NodeId,
        route_id: &str,
    ) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.routes
            .get(&(router.clone(), route_id.to_string()))
            .into_iter()
            .flatten()
    }

    /// Breadth-first walk from `seeds`
    ///
    /// Nodes already in `visited` are neither returned nor expanded. Returns
    /// newly visited nodes in visit order.
    pub fn walk<'a>(
        &self,
        seeds: impl IntoIterator<Item = &'a NodeId>,
        visited: &mut IndexSet<NodeId>,
    ) -> Vec<NodeId> {
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        let mut order = Vec::new();

        for seed in seeds {
            if visited.insert(seed.clone()) {
                queue.push_back(seed.clone());
            }
        }

        while let Some(current) = queue.pop_front() {
            for next in self.targets(&current) {
                if visited.insert(next.clone()) {
                    queue.push_back(next.clone());
                }
            }
            order.push(current);
        }
        order
    }

    /// Every node reachable from `start`, excluding `start` itself
    #[must_use]
    pub fn reachable(&self, start: &NodeId) -> Vec<NodeId> {
        let mut visited = IndexSet::new();
        visited.insert(start.clone());
        self.walk(self.targets(start), &mut visited)
    }

    /// Number of edges the adjacency was built from
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Nodes with at least one outgoing edge
    pub fn sources(&self) -> impl Iterator<Item = &NodeId> {
        self.targets.keys()
    }
}
