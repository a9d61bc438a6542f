//! Resolution output
//!
//! Everything here is derived. A fresh [`Resolution`] is built on every pass
//! and the input graph is never written to.

use crate::target::TargetTotal;
use quizflow_allocation::{AllocationMode, AllocationResult};
use quizflow_graph::{GraphDiagnostics, NodeId, RouteBadge};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Validation and prediction for one filter node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOutcome {
    /// Whether the filter can be sampled
    pub is_valid: bool,

    /// Reason the filter is invalid; empty when valid
    pub validation_message: String,

    /// Non-blocking remark on a valid filter
    pub warning: Option<String>,

    /// What each category is predicted to resolve to
    pub predicted_allocation: AllocationResult,

    /// Mode the filter was checked in
    pub mode: AllocationMode,

    /// Count mode was requested but a range total forced percentages
    pub percentage_mode_locked: bool,
}

/// Derived display annotations for one node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAnnotations {
    /// Router routes this node is downstream of, sorted by label
    pub route_badges: Vec<RouteBadge>,

    /// Whether a selection modifier applies to this node
    pub modified: bool,
}

/// Result of resolving one graph snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Target the graph was resolved against
    pub target: TargetTotal,

    /// Annotations for every node
    pub annotations: BTreeMap<NodeId, NodeAnnotations>,

    /// Outcome for every filter node
    pub filters: BTreeMap<NodeId, FilterOutcome>,

    /// Structural report
    pub diagnostics: GraphDiagnostics,
}

impl Resolution {
    /// Whether every filter is valid
    ///
    /// A graph with an infeasible filter must not be sampled.
    #[must_use]
    pub fn is_sampleable(&self) -> bool {
        self.filters.values().all(|outcome| outcome.is_valid)
    }

    /// Filters that failed validation, in ID order
    pub fn invalid_filters(&self) -> impl Iterator<Item = (&NodeId, &FilterOutcome)> {
        self.filters.iter().filter(|(_, outcome)| !outcome.is_valid)
    }

    /// Outcome for a filter node
    #[inline]
    #[must_use]
    pub fn filter(&self, id: &NodeId) -> Option<&FilterOutcome> {
        self.filters.get(id)
    }

    /// Annotations for a node
    #[inline]
    #[must_use]
    pub fn annotations(&self, id: &NodeId) -> Option<&NodeAnnotations> {
        self.annotations.get(id)
    }
}
