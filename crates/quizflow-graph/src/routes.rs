//! Route badge propagation
//!
//! Every enabled route of every router floods its downstream subgraph with a
//! badge. Routers themselves are never badged, but traversal passes through
//! them so nested routing still reaches leaf nodes.

use crate::adjacency::Adjacency;
use crate::graph::ConfigGraph;
use crate::node::{NodeCategory, NodeId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marks a node as downstream of one router route
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteBadge {
    /// Originating router
    pub router_id: NodeId,

    /// Route on that router
    pub route_id: String,

    /// Short label, `R<n>` with `n` the 1-based route position
    pub label: String,

    /// Route display name
    pub name: String,
}

impl RouteBadge {
    /// Numeric part of the label, if it has one
    #[must_use]
    pub fn route_number(&self) -> Option<u32> {
        self.label.strip_prefix('R')?.parse().ok()
    }

    fn sort_key(&self) -> (Option<u32>, &str, &NodeId, &str) {
        (self.route_number(), &self.label, &self.router_id, &self.route_id)
    }
}

/// Badges per node, sorted for display
pub type RouteBadges = BTreeMap<NodeId, Vec<RouteBadge>>;

/// Compute route badges for every reachable non-router node
///
/// Each route gets its own visited set with the originating router
/// pre-inserted, so a cycle back into the router cannot leak into its other
/// routes.
#[must_use]
pub fn propagate_routes(graph: &ConfigGraph, adjacency: &Adjacency) -> RouteBadges {
    let mut badges = RouteBadges::new();

    for router in graph.nodes_of(NodeCategory::Router) {
        let Some(settings) = router.as_router() else {
            continue;
        };

        for (position, route) in settings.routes.iter().enumerate() {
            if !route.enabled {
                continue;
            }

            let badge = RouteBadge {
                router_id: router.id.clone(),
                route_id: route.id.clone(),
                label: format!("R{}", position + 1),
                name: route.name.clone(),
            };

            let mut visited = IndexSet::new();
            visited.insert(router.id.clone());
            let seeds = adjacency.route_targets(&router.id, &route.id);
            let reached = adjacency.walk(seeds, &mut visited);

            let mut tagged = 0usize;
            for id in reached {
                let is_router = graph
                    .node(&id)
                    .is_some_and(|node| node.category() == NodeCategory::Router);
                if is_router {
                    continue;
                }

                let entry = badges.entry(id).or_default();
                let duplicate = entry
                    .iter()
                    .any(|b| b.router_id == badge.router_id && b.route_id == badge.route_id);
                if !duplicate {
                    entry.push(badge.clone());
                    tagged += 1;
                }
            }
            tracing::debug!("Route {} of {} reaches {} nodes", badge.label, router.id, tagged);
        }
    }

    for list in badges.values_mut() {
        list.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }
    badges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::ConfigEdge;
    use crate::node::{ConfigNode, Route};
    use pretty_assertions::assert_eq;

    fn labels(badges: &RouteBadges, id: &str) -> Vec<String> {
        badges
            .get(&NodeId::new(id))
            .map(|list| list.iter().map(|b| b.label.clone()).collect())
            .unwrap_or_default()
    }

    fn build(nodes: Vec<ConfigNode>, edges: Vec<ConfigEdge>) -> (ConfigGraph, Adjacency) {
        let graph = ConfigGraph::from_parts(nodes, edges).unwrap();
        let adjacency = graph.adjacency("flow-");
        (graph, adjacency)
    }

    #[test]
    fn disjoint_routes_badge_their_own_subgraphs() {
        let (graph, adjacency) = build(
            vec![
                ConfigNode::router("r", vec![Route::new("a", "Anime"), Route::new("b", "Other")]),
                ConfigNode::modifier("x"),
                ConfigNode::modifier("y"),
            ],
            vec![
                ConfigEdge::new("e1", "r", "x").from_route("a"),
                ConfigEdge::new("e2", "r", "y").from_route("b"),
            ],
        );

        let badges = propagate_routes(&graph, &adjacency);

        assert_eq!(labels(&badges, "x"), vec!["R1"]);
        assert_eq!(labels(&badges, "y"), vec!["R2"]);
        assert!(labels(&badges, "r").is_empty());
    }

    #[test]
    fn disabled_route_keeps_its_number() {
        let (graph, adjacency) = build(
            vec![
                ConfigNode::router(
                    "r",
                    vec![Route::new("a", "Off").disabled(), Route::new("b", "On")],
                ),
                ConfigNode::modifier("x"),
                ConfigNode::modifier("y"),
            ],
            vec![
                ConfigEdge::new("e1", "r", "x").from_route("a"),
                ConfigEdge::new("e2", "r", "y").from_route("b"),
            ],
        );

        let badges = propagate_routes(&graph, &adjacency);

        assert!(labels(&badges, "x").is_empty());
        assert_eq!(labels(&badges, "y"), vec!["R2"]);
    }

    #[test]
    fn traversal_passes_through_nested_router() {
        let (graph, adjacency) = build(
            vec![
                ConfigNode::router("outer", vec![Route::new("a", "A")]),
                ConfigNode::router("inner", vec![Route::new("c", "C"), Route::new("d", "D")]),
                ConfigNode::modifier("leaf"),
            ],
            vec![
                ConfigEdge::new("e1", "outer", "inner").from_route("a"),
                ConfigEdge::new("e2", "inner", "leaf").from_route("d"),
            ],
        );

        let badges = propagate_routes(&graph, &adjacency);
        let leaf = &badges[&NodeId::new("leaf")];

        assert_eq!(leaf.len(), 2);
        assert_eq!(leaf[0].router_id, NodeId::new("outer"));
        assert_eq!(leaf[1].label, "R2");
        assert!(labels(&badges, "inner").is_empty());
    }

    #[test]
    fn cycle_into_router_does_not_cross_routes() {
        let (graph, adjacency) = build(
            vec![
                ConfigNode::router("r", vec![Route::new("a", "A"), Route::new("b", "B")]),
                ConfigNode::modifier("x"),
                ConfigNode::modifier("y"),
            ],
            vec![
                ConfigEdge::new("e1", "r", "x").from_route("a"),
                ConfigEdge::new("e2", "x", "r"),
                ConfigEdge::new("e3", "r", "y").from_route("b"),
            ],
        );

        let badges = propagate_routes(&graph, &adjacency);

        assert_eq!(labels(&badges, "x"), vec!["R1"]);
        assert_eq!(labels(&badges, "y"), vec!["R2"]);
    }

    #[test]
    fn badges_sorted_numerically() {
        let routes: Vec<_> = (1..=11)
            .map(|i| Route::new(format!("r{i}"), format!("Route {i}")))
            .collect();
        let edges = (1..=11)
            .rev()
            .map(|i| ConfigEdge::new(format!("e{i}"), "r", "x").from_route(format!("r{i}")))
            .collect();
        let (graph, adjacency) = build(
            vec![ConfigNode::router("r", routes), ConfigNode::modifier("x")],
            edges,
        );

        let badges = propagate_routes(&graph, &adjacency);
        let got = labels(&badges, "x");

        assert_eq!(got.first().map(String::as_str), Some("R1"));
        assert_eq!(got[1], "R2");
        assert_eq!(got.last().map(String::as_str), Some("R11"));
    }
}
