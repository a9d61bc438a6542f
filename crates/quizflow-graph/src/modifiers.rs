//! Selection modifier propagation
//!
//! A modifier claims the node types it points at directly and flags every
//! reachable node of those types. Claims are global: the first enabled
//! modifier in array order owns a type, later ones skip it even for nodes the
//! first cannot reach.

use crate::adjacency::Adjacency;
use crate::graph::ConfigGraph;
use crate::node::{NodeCategory, NodeId, NodeTypeKey};
use indexmap::IndexSet;
use std::collections::{BTreeMap, BTreeSet};

/// Result of modifier propagation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierOutcome {
    /// Nodes flagged as modified
    pub modified: BTreeSet<NodeId>,

    /// Which modifier owns each claimed type
    pub claims: BTreeMap<NodeTypeKey, NodeId>,
}

impl ModifierOutcome {
    /// Whether a node was flagged
    #[inline]
    #[must_use]
    pub fn is_modified(&self, id: &NodeId) -> bool {
        self.modified.contains(id)
    }
}

/// Flag nodes affected by selection modifiers
#[must_use]
pub fn propagate_modifiers(graph: &ConfigGraph, adjacency: &Adjacency) -> ModifierOutcome {
    let mut outcome = ModifierOutcome::default();

    for modifier in graph.nodes_of(NodeCategory::SelectionModifier) {
        if !modifier.as_modifier().is_some_and(|settings| settings.enabled) {
            continue;
        }

        let candidates: IndexSet<NodeTypeKey> = adjacency
            .targets(&modifier.id)
            .filter_map(|id| graph.node(id))
            .filter(|node| !node.is_modifier())
            .map(|node| node.type_key())
            .collect();

        let unclaimed: Vec<NodeTypeKey> = candidates
            .into_iter()
            .filter(|key| !outcome.claims.contains_key(key))
            .collect();
        if unclaimed.is_empty() {
            continue;
        }

        let reachable = adjacency.reachable(&modifier.id);
        for key in unclaimed {
            outcome.claims.insert(key, modifier.id.clone());
            let flagged = reachable
                .iter()
                .filter(|id| graph.node(id).is_some_and(|node| node.type_key() == key));
            outcome.modified.extend(flagged.cloned());
            tracing::debug!("Modifier {} claimed {}", modifier.id, key);
        }
    }
    outcome
}
