//! Functional tests for graph propagation.
//!
//! Route badges and modifier flags over whole configurations:
//! - Disjoint routes label disjoint subgraphs; routers stay unlabeled.
//! - The first modifier in array order claims a type.
//! - Cycles and dangling edges never stall or abort a pass.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use quizflow_allocation::FilterKind;
use quizflow_graph::{propagate_modifiers, propagate_routes, NodeId, Topology};
use quizflow_test_utils::{arb_graph, song_types, GraphFixture};

fn labels(badges: &quizflow_graph::RouteBadges, id: &str) -> Vec<String> {
    badges
        .get(&NodeId::new(id))
        .map(|list| list.iter().map(|b| b.label.clone()).collect())
        .unwrap_or_default()
}

/// Tenet: each route labels only its own subgraph and the router has no badge.
#[test]
fn route_propagation_disjoint_subgraphs() {
    let graph = GraphFixture::new()
        .router("router", &[("anime", "Anime"), ("list", "List")])
        .filter("types-a", song_types(&[("openings", 100.0)]))
        .filter("types-b", song_types(&[("endings", 100.0)]))
        .modifier("mod-b")
        .route_edge("router", "anime", "types-a")
        .route_edge("router", "list", "mod-b")
        .edge("mod-b", "types-b")
        .build();

    let topology = Topology::of(&graph, "flow-");
    let badges = propagate_routes(&graph, &topology.adjacency);

    assert_eq!(labels(&badges, "types-a"), vec!["R1"]);
    assert_eq!(labels(&badges, "mod-b"), vec!["R2"]);
    assert_eq!(labels(&badges, "types-b"), vec!["R2"]);
    assert!(labels(&badges, "router").is_empty());
}

/// Tenet: a type belongs to the first modifier that points at it.
#[test]
fn modifier_first_claim() {
    let graph = GraphFixture::new()
        .modifier("m1")
        .modifier("m2")
        .filter("a", song_types(&[("openings", 100.0)]))
        .filter("b", song_types(&[("openings", 100.0)]))
        .edge("m2", "b")
        .edge("m1", "a")
        .build();

    let outcome = propagate_modifiers(&graph, &graph.adjacency("flow-"));

    assert!(outcome.is_modified(&NodeId::new("a")));
    assert!(!outcome.is_modified(&NodeId::new("b")));
}

/// Tenet: internal flow edges carry neither badges nor modifier flags.
#[test]
fn internal_edges_are_ignored() {
    let graph = GraphFixture::new()
        .router("router", &[("main", "Main")])
        .modifier("m")
        .filter("f", song_types(&[("openings", 100.0)]))
        .route_edge("router", "main", "m")
        .internal_edge("m", "f")
        .build();

    let topology = Topology::of(&graph, "flow-");

    assert!(labels(&propagate_routes(&graph, &topology.adjacency), "f").is_empty());
    assert!(propagate_modifiers(&graph, &topology.adjacency).modified.is_empty());
    assert_eq!(topology.diagnostics.internal_edges.len(), 1);
}

/// Tenet: cyclic graphs terminate and are reported.
#[test]
fn cyclic_graph_terminates() {
    let graph = GraphFixture::new()
        .router("router", &[("main", "Main")])
        .modifier("m")
        .filter("f", quizflow_allocation::FilterSettings::new(FilterKind::Genres))
        .route_edge("router", "main", "m")
        .edge("m", "f")
        .edge("f", "m")
        .edge("f", "router")
        .build();

    let topology = Topology::of(&graph, "flow-");
    let badges = propagate_routes(&graph, &topology.adjacency);
    let outcome = propagate_modifiers(&graph, &topology.adjacency);

    assert!(topology.diagnostics.has_cycle);
    assert_eq!(labels(&badges, "f"), vec!["R1"]);
    assert!(outcome.is_modified(&NodeId::new("f")));
}

proptest! {
    #[test]
    fn prop_passes_are_deterministic(graph in arb_graph()) {
        let first = Topology::of(&graph, "flow-");
        let second = Topology::of(&graph, "flow-");

        prop_assert_eq!(&first.diagnostics, &second.diagnostics);
        prop_assert_eq!(
            propagate_routes(&graph, &first.adjacency),
            propagate_routes(&graph, &second.adjacency)
        );
        prop_assert_eq!(
            propagate_modifiers(&graph, &first.adjacency),
            propagate_modifiers(&graph, &second.adjacency)
        );
    }

    #[test]
    fn prop_routers_never_badged(graph in arb_graph()) {
        let adjacency = graph.adjacency("flow-");
        let badges = propagate_routes(&graph, &adjacency);

        for node in graph.nodes().filter(|node| node.is_router()) {
            prop_assert!(!badges.contains_key(&node.id));
        }
    }

    #[test]
    fn prop_badges_unique_per_route(graph in arb_graph()) {
        let badges = propagate_routes(&graph, &graph.adjacency("flow-"));

        for list in badges.values() {
            let mut keys: Vec<_> = list.iter().map(|b| (&b.router_id, &b.route_id)).collect();
            let before = keys.len();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), before);
        }
    }
}
