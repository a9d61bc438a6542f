//! Configuration graph snapshot and editing operations

use crate::adjacency::Adjacency;
use crate::edge::ConfigEdge;
use crate::error::GraphError;
use crate::node::{ConfigNode, NodeCategory, NodeId};
use crate::topology::Topology;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Wire shape of a graph: plain node and edge arrays
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GraphParts {
    #[serde(default)]
    nodes: Vec<ConfigNode>,
    #[serde(default)]
    edges: Vec<ConfigEdge>,
}

/// Nodes and edges of a quiz configuration
///
/// Node order is the editor's array order and is preserved by every
/// operation. Edges may be dangling; they are dropped when adjacency is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphParts", into = "GraphParts")]
pub struct ConfigGraph {
    nodes: IndexMap<NodeId, ConfigNode>,
    edges: Vec<ConfigEdge>,
}

impl TryFrom<GraphParts> for ConfigGraph {
    type Error = GraphError;

    fn try_from(parts: GraphParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts.nodes, parts.edges)
    }
}

impl From<ConfigGraph> for GraphParts {
    fn from(graph: ConfigGraph) -> Self {
        Self {
            nodes: graph.nodes.into_values().collect(),
            edges: graph.edges,
        }
    }
}

impl ConfigGraph {
    /// Create empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw arrays
    ///
    /// Edges are taken as-is, dangling or not.
    ///
    /// # Errors
    /// Returns [`GraphError::DuplicateNode`] if two nodes share an ID.
    pub fn from_parts(nodes: Vec<ConfigNode>, edges: Vec<ConfigEdge>) -> Result<Self, GraphError> {
        let mut graph = Self {
            nodes: IndexMap::with_capacity(nodes.len()),
            edges,
        };
        for node in nodes {
            graph.add_node(node)?;
        }
        Ok(graph)
    }

    /// Add a node
    ///
    /// # Errors
    /// Returns [`GraphError::DuplicateNode`] if the ID is taken.
    pub fn add_node(&mut self, node: ConfigNode) -> Result<(), GraphError> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Remove a node and every edge touching it
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownNode`] if the node does not exist.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<ConfigNode, GraphError> {
        let node = self
            .nodes
            .shift_remove(id)
            .ok_or_else(|| GraphError::unknown_node(id))?;

        let before = self.edges.len();
        self.edges.retain(|edge| &edge.source != id && &edge.target != id);
        tracing::debug!(
            "Removed node {} and {} incident edges",
            id,
            before - self.edges.len()
        );
        Ok(node)
    }

    /// Add an edge between existing nodes
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownNode`] for a missing endpoint, or
    /// [`GraphError::DuplicateEdge`] if the edge ID is taken.
    pub fn add_edge(&mut self, edge: ConfigEdge) -> Result<(), GraphError> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphError::unknown_node(endpoint));
            }
        }
        if self.edges.iter().any(|existing| existing.id == edge.id) {
            return Err(GraphError::DuplicateEdge(edge.id));
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Remove an edge by ID
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownEdge`] if no edge has this ID.
    pub fn remove_edge(&mut self, id: &str) -> Result<ConfigEdge, GraphError> {
        let index = self
            .edges
            .iter()
            .position(|edge| edge.id == id)
            .ok_or_else(|| GraphError::UnknownEdge(id.to_string()))?;
        Ok(self.edges.remove(index))
    }

    /// Look up a node
    #[inline]
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&ConfigNode> {
        self.nodes.get(id)
    }

    /// Look up a node for editing
    #[inline]
    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut ConfigNode> {
        self.nodes.get_mut(id)
    }

    /// Whether a node exists
    #[inline]
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Array position of a node
    #[inline]
    #[must_use]
    pub fn position(&self, id: &NodeId) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Nodes in array order
    pub fn nodes(&self) -> impl Iterator<Item = &ConfigNode> {
        self.nodes.values()
    }

    /// Nodes of one category, in array order
    pub fn nodes_of(&self, category: NodeCategory) -> impl Iterator<Item = &ConfigNode> {
        self.nodes().filter(move |node| node.category() == category)
    }

    /// Edges in insertion order
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &[ConfigEdge] {
        &self.edges
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adjacency over live edges
    ///
    /// Internal edges (IDs starting with `internal_prefix`) and dangling
    /// edges are left out.
    #[must_use]
    pub fn adjacency(&self, internal_prefix: &str) -> Adjacency {
        Topology::of(self, internal_prefix).adjacency
    }
}
