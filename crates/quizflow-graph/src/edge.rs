//! Configuration edges

use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// Directed edge between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigEdge {
    /// Unique ID; internal flow edges carry a reserved prefix
    pub id: String,

    /// Upstream node
    pub source: NodeId,

    /// Downstream node
    pub target: NodeId,

    /// Router route the edge leaves from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,

    /// Input port on the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl ConfigEdge {
    /// Create edge without handles
    #[must_use]
    pub fn new(id: impl Into<String>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// Attach the router route this edge leaves from
    #[inline]
    #[must_use]
    pub fn from_route(mut self, route_id: impl Into<String>) -> Self {
        self.source_handle = Some(route_id.into());
        self
    }

    /// Attach a target handle
    #[inline]
    #[must_use]
    pub fn with_target_handle(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }

    /// Whether the edge is an internal flow edge
    #[inline]
    #[must_use]
    pub fn is_internal(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.id.starts_with(prefix)
    }

    /// Whether the edge leaves `router` through `route_id`
    #[inline]
    #[must_use]
    pub fn leaves_route(&self, router: &NodeId, route_id: &str) -> bool {
        &self.source == router && self.source_handle.as_deref() == Some(route_id)
    }
}
