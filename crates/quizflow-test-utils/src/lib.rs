//! Testing utilities for the quizflow workspace
//!
//! Shared graph fixtures, filter helpers and proptest strategies.

#![allow(missing_docs)]

use proptest::prelude::*;
use quizflow_allocation::{FilterKind, FilterSettings, Season, SeasonYear};
use quizflow_graph::{ConfigEdge, ConfigGraph, ConfigNode, Route, SongCount};

/// Season pinned for deterministic vintage tests
pub fn present() -> SeasonYear {
    SeasonYear::new(2026, Season::Fall)
}

/// Song types filter with fixed allocations
pub fn song_types(allocations: &[(&str, f64)]) -> FilterSettings {
    allocations
        .iter()
        .fold(FilterSettings::new(FilterKind::SongTypes), |filter, (label, value)| {
            filter.with_fixed(label, *value)
        })
}

/// Builder for configuration graphs; edge IDs are generated in order
#[derive(Debug, Default)]
pub struct GraphFixture {
    nodes: Vec<ConfigNode>,
    edges: Vec<ConfigEdge>,
}

impl GraphFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router whose routes are `(route_id, name)` pairs
    pub fn router(mut self, id: &str, routes: &[(&str, &str)]) -> Self {
        let routes = routes.iter().map(|(route, name)| Route::new(*route, *name)).collect();
        self.nodes.push(ConfigNode::router(id, routes));
        self
    }

    pub fn filter(mut self, id: &str, settings: FilterSettings) -> Self {
        self.nodes.push(ConfigNode::filter(id, settings));
        self
    }

    pub fn modifier(mut self, id: &str) -> Self {
        self.nodes.push(ConfigNode::modifier(id));
        self
    }

    pub fn song_count(mut self, id: &str, count: SongCount) -> Self {
        self.nodes.push(ConfigNode::song_count(id, count));
        self
    }

    pub fn edge(mut self, source: &str, target: &str) -> Self {
        let id = format!("e{}", self.edges.len() + 1);
        self.edges.push(ConfigEdge::new(id, source, target));
        self
    }

    pub fn route_edge(mut self, router: &str, route: &str, target: &str) -> Self {
        let id = format!("e{}", self.edges.len() + 1);
        self.edges.push(ConfigEdge::new(id, router, target).from_route(route));
        self
    }

    /// Edge carrying the default internal prefix
    pub fn internal_edge(mut self, source: &str, target: &str) -> Self {
        let id = format!("flow-{}", self.edges.len() + 1);
        self.edges.push(ConfigEdge::new(id, source, target));
        self
    }

    pub fn build(self) -> ConfigGraph {
        ConfigGraph::from_parts(self.nodes, self.edges).unwrap()
    }
}

fn arb_filter() -> impl Strategy<Value = FilterSettings> {
    let kinds = prop::sample::select(FilterKind::ALL.to_vec());
    let values = prop::collection::vec((0u32..=100, prop::option::of(0u32..=50)), 0..4);
    (kinds, values).prop_map(|(kind, values)| {
        values
            .into_iter()
            .enumerate()
            .fold(FilterSettings::new(kind), |filter, (i, (base, spread))| {
                let label = format!("c{i}");
                match spread {
                    Some(spread) => {
                        filter.with_range(&label, f64::from(base), f64::from(base + spread))
                    }
                    None => filter.with_fixed(&label, f64::from(base)),
                }
            })
    })
}

fn arb_node(id: String) -> impl Strategy<Value = ConfigNode> {
    let router_id = id.clone();
    let filter_id = id.clone();
    prop_oneof![
        (1usize..4).prop_map(move |count| {
            let routes = (1..=count)
                .map(|r| Route::new(format!("r{r}"), format!("Route {r}")))
                .collect();
            ConfigNode::router(router_id.as_str(), routes)
        }),
        arb_filter().prop_map(move |settings| ConfigNode::filter(filter_id.as_str(), settings)),
        Just(ConfigNode::modifier(id)),
    ]
}

/// Arbitrary graph: routers, filters and modifiers with random edges,
/// possibly cyclic and possibly dangling
pub fn arb_graph() -> impl Strategy<Value = ConfigGraph> {
    (1usize..8)
        .prop_flat_map(|count| {
            let nodes: Vec<_> = (0..count).map(|i| arb_node(format!("n{i}"))).collect();
            let endpoints = (0..count + 1, 0..count, prop::option::of(1usize..4));
            let edges = prop::collection::vec(endpoints, 0..12);
            (nodes, edges)
        })
        .prop_map(|(nodes, edges)| {
            let edges = edges
                .into_iter()
                .enumerate()
                .map(|(i, (source, target, route))| {
                    // Index `count` names a node that does not exist.
                    let edge =
                        ConfigEdge::new(format!("e{i}"), format!("n{source}"), format!("n{target}"));
                    match route {
                        Some(route) => edge.from_route(format!("r{route}")),
                        None => edge,
                    }
                })
                .collect();
            ConfigGraph::from_parts(nodes, edges).unwrap()
        })
}
