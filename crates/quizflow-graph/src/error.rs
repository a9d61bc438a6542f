//! Graph editing errors

use crate::node::NodeId;

/// Errors raised by [`ConfigGraph`](crate::ConfigGraph) editing operations
///
/// Resolution never fails on a malformed graph; these only guard edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A node with this ID already exists
    #[error("node '{0}' already exists")]
    DuplicateNode(NodeId),

    /// Referenced node does not exist
    #[error("node '{0}' not found")]
    UnknownNode(NodeId),

    /// An edge with this ID already exists
    #[error("edge '{0}' already exists")]
    DuplicateEdge(String),

    /// Referenced edge does not exist
    #[error("edge '{0}' not found")]
    UnknownEdge(String),
}

impl GraphError {
    /// Create unknown node error
    #[inline]
    #[must_use]
    pub fn unknown_node(id: &NodeId) -> Self {
        Self::UnknownNode(id.clone())
    }
}
