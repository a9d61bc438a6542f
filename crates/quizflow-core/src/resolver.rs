//! Graph resolution
//!
//! [`Resolver::resolve`] turns one graph snapshot into a [`Resolution`]:
//! 1. Split edges and build adjacency ([`Topology`])
//! 2. Propagate route badges and modifier flags
//! 3. Validate and predict every filter, memoized by content hash
//!
//! Infeasible filters are reported per node and never abort the pass.

use crate::cache::{AllocationCache, CacheStats, ContentHash};
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::outcome::{FilterOutcome, NodeAnnotations, Resolution};
use crate::target::{EffectiveTarget, TargetTotal};
use quizflow_allocation::{
    quick_fix, FilterSettings, FilterValidator, QuickFix, RuleRegistry, SeasonYear,
};
use quizflow_graph::{
    propagate_modifiers, propagate_routes, ConfigGraph, NodeCategory, NodeId, NodeSettings,
    Topology,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything a filter outcome depends on
#[derive(Serialize)]
struct OutcomeKey<'a> {
    settings: &'a FilterSettings,
    target: &'a EffectiveTarget,
    epsilon: f64,
    loose_range_ratio: f64,
}

/// Resolves configuration graphs
#[derive(Debug)]
pub struct Resolver {
    config: ResolverConfig,
    validator: FilterValidator,
    cache: AllocationCache,
    present: SeasonYear,
}

impl Resolver {
    /// Create resolver
    ///
    /// The present season is pinned here, from the config or the clock.
    ///
    /// # Errors
    /// Returns [`ResolveError::Config`] if the configuration is invalid.
    pub fn new(config: ResolverConfig) -> Result<Self, ResolveError> {
        config.validate()?;
        let present = config.present.unwrap_or_else(SeasonYear::current);
        tracing::info!("Resolver ready (present season {})", present);

        Ok(Self {
            validator: FilterValidator::with_params(config.rule_params()),
            cache: AllocationCache::new(config.cache_capacity),
            present,
            config,
        })
    }

    /// Replace the rule registry
    ///
    /// Clears the cache, since cached outcomes came from the old rules.
    #[must_use]
    pub fn with_registry(mut self, registry: RuleRegistry) -> Self {
        self.validator = self.validator.with_registry(registry);
        self.cache.invalidate_all();
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Season treated as "now"
    #[inline]
    #[must_use]
    pub fn present(&self) -> SeasonYear {
        self.present
    }

    /// Resolve a graph against a target total
    ///
    /// # Errors
    /// Returns [`ResolveError`] only for an invalid target.
    pub fn resolve(
        &self,
        graph: &ConfigGraph,
        target: TargetTotal,
    ) -> Result<Resolution, ResolveError> {
        target.validate()?;

        let topology = Topology::of(graph, &self.config.internal_edge_prefix);
        let mut badges = propagate_routes(graph, &topology.adjacency);
        let modifiers = propagate_modifiers(graph, &topology.adjacency);

        let annotations = graph
            .nodes()
            .map(|node| {
                let annotations = NodeAnnotations {
                    route_badges: badges.remove(&node.id).unwrap_or_default(),
                    modified: modifiers.is_modified(&node.id),
                };
                (node.id.clone(), annotations)
            })
            .collect();

        let filters = self.evaluate_filters(graph, target);
        let resolution = Resolution {
            target,
            annotations,
            filters,
            diagnostics: topology.diagnostics,
        };

        tracing::info!(
            "Resolved {} nodes: {} filters, {} invalid",
            graph.node_count(),
            resolution.filters.len(),
            resolution.invalid_filters().count()
        );
        Ok(resolution)
    }

    /// Resolve a graph against its own song count node
    ///
    /// # Errors
    /// Returns [`ResolveError::MissingSongCount`] if the graph has none.
    pub fn resolve_from_graph(&self, graph: &ConfigGraph) -> Result<Resolution, ResolveError> {
        let target = TargetTotal::from_graph(graph).ok_or(ResolveError::MissingSongCount)?;
        self.resolve(graph, target)
    }

    /// Propose a repair for one filter node
    ///
    /// The graph is not modified; see [`Resolver::apply_quick_fix`].
    ///
    /// # Errors
    /// Returns [`ResolveError::QuickFix`] if the filter is already valid or
    /// cannot be repaired, and [`ResolveError::NotAFilter`] or
    /// [`ResolveError::Graph`] for a bad node ID.
    pub fn quick_fix(
        &self,
        graph: &ConfigGraph,
        id: &NodeId,
        target: TargetTotal,
    ) -> Result<QuickFix, ResolveError> {
        target.validate()?;
        let settings = Self::filter_settings(graph, id)?;
        let effective = target.effective(settings.mode, self.config.percentage_total);

        let fix = quick_fix(&self.validator, settings, effective.target, self.present)?;
        tracing::info!("Quick-fix for {} proposes {} changes", id, fix.actions.len());
        Ok(fix)
    }

    /// Repair one filter node in place
    ///
    /// # Errors
    /// Same as [`Resolver::quick_fix`]; the graph is untouched on error.
    pub fn apply_quick_fix(
        &self,
        graph: &mut ConfigGraph,
        id: &NodeId,
        target: TargetTotal,
    ) -> Result<QuickFix, ResolveError> {
        let fix = self.quick_fix(graph, id, target)?;
        if let Some(node) = graph.node_mut(id) {
            node.settings = NodeSettings::Filter(fix.settings.clone());
        }
        Ok(fix)
    }

    /// Drop every memoized outcome
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
        tracing::debug!("Outcome cache cleared");
    }

    /// Cache statistics
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn filter_settings<'g>(
        graph: &'g ConfigGraph,
        id: &NodeId,
    ) -> Result<&'g FilterSettings, ResolveError> {
        let node = graph
            .node(id)
            .ok_or_else(|| quizflow_graph::GraphError::unknown_node(id))?;
        node.as_filter().ok_or_else(|| ResolveError::not_a_filter(id))
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_filters(
        &self,
        graph: &ConfigGraph,
        target: TargetTotal,
    ) -> BTreeMap<NodeId, FilterOutcome> {
        graph
            .nodes_of(NodeCategory::Filter)
            .filter_map(|node| Some((node.id.clone(), node.as_filter()?)))
            .map(|(id, settings)| {
                let outcome = self.evaluate(&id, settings, target);
                (id, outcome)
            })
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn evaluate_filters(
        &self,
        graph: &ConfigGraph,
        target: TargetTotal,
    ) -> BTreeMap<NodeId, FilterOutcome> {
        use rayon::prelude::*;

        let filters: Vec<(&NodeId, &FilterSettings)> = graph
            .nodes_of(NodeCategory::Filter)
            .filter_map(|node| Some((&node.id, node.as_filter()?)))
            .collect();

        filters
            .into_par_iter()
            .map(|(id, settings)| (id.clone(), self.evaluate(id, settings, target)))
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    fn evaluate(
        &self,
        id: &NodeId,
        settings: &FilterSettings,
        target: TargetTotal,
    ) -> FilterOutcome {
        let effective = target.effective(settings.mode, self.config.percentage_total);
        let params = self.validator.params();
        let key = OutcomeKey {
            settings,
            target: &effective,
            epsilon: params.epsilon,
            loose_range_ratio: params.loose_range_ratio,
        };

        let outcome = match ContentHash::compute_serializable(&key) {
            Ok(hash) => self
                .cache
                .get_or_insert_with(hash, || self.compute(settings, &effective)),
            Err(e) => {
                tracing::warn!("Cannot hash filter {}, evaluating uncached: {}", id, e);
                Arc::new(self.compute(settings, &effective))
            }
        };

        if !outcome.is_valid {
            tracing::debug!("Filter {} invalid: {}", id, outcome.validation_message);
        }
        FilterOutcome::clone(&outcome)
    }

    fn compute(&self, settings: &FilterSettings, effective: &EffectiveTarget) -> FilterOutcome {
        let validation = self.validator.validate(settings, effective.target);
        let predicted = self.validator.analyze(settings, effective.target);

        FilterOutcome {
            is_valid: validation.is_valid,
            validation_message: validation.message,
            warning: validation.warning,
            predicted_allocation: predicted,
            mode: effective.target.mode,
            percentage_mode_locked: effective.percentage_mode_locked,
        }
    }
}
