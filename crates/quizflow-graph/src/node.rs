//! Configuration nodes
//!
//! A node's category is carried by its settings variant, so a router always
//! has routes and a filter always has filter settings.

use quizflow_allocation::{FilterKind, FilterSettings};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique node identifier, assigned by the editor
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create node ID
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Node categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    /// Splits flow into named routes
    Router,
    /// Numeric category filter
    Filter,
    /// Song count for the quiz
    NumberOfSongs,
    /// Alters how downstream same-type nodes are interpreted
    SelectionModifier,
    /// Chooses where songs come from
    SourceSelector,
    /// Room-level settings
    BasicSettings,
    /// Per-user list import
    ListSource,
}

/// Granularity at which selection modifiers claim nodes
///
/// Filters are told apart by kind; every other node by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeTypeKey {
    /// Non-filter node
    Category(NodeCategory),
    /// Filter node of a given kind
    Filter(FilterKind),
}

impl fmt::Display for NodeTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(category) => write!(f, "{category:?}"),
            Self::Filter(kind) => write!(f, "Filter({kind})"),
        }
    }
}

/// One named outgoing route of a router
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    /// Matches `ConfigEdge::source_handle`
    pub id: String,

    /// Display name
    pub name: String,

    /// Disabled routes produce no badges
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl Route {
    /// Enabled route
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: true,
        }
    }

    /// Disable the route
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Router settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterSettings {
    /// Routes in display order; position `n` is labelled `R<n+1>`
    pub routes: Vec<Route>,
}

/// Selection modifier settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierSettings {
    /// Disabled modifiers neither flag nor claim
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    /// Free-form editor label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Default for ModifierSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            label: None,
        }
    }
}

/// Number of songs in the quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SongCount {
    /// Exact count
    Fixed {
        /// Songs in the quiz
        count: u32,
    },
    /// Count picked at sampling time
    Range {
        /// Fewest songs
        min: u32,
        /// Most songs
        max: u32,
    },
}

fn enabled_by_default() -> bool {
    true
}

/// Category-specific node settings
///
/// Settings the resolver does not interpret are kept as opaque JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", content = "settings", rename_all = "snake_case")]
pub enum NodeSettings {
    /// Router with named routes
    Router(RouterSettings),
    /// Numeric filter
    Filter(FilterSettings),
    /// Song count
    NumberOfSongs(SongCount),
    /// Selection modifier
    SelectionModifier(ModifierSettings),
    /// Source selector (opaque)
    SourceSelector(serde_json::Value),
    /// Basic room settings (opaque)
    BasicSettings(serde_json::Value),
    /// List source (opaque)
    ListSource(serde_json::Value),
}

impl NodeSettings {
    /// Category of these settings
    #[must_use]
    pub const fn category(&self) -> NodeCategory {
        match self {
            Self::Router(_) => NodeCategory::Router,
            Self::Filter(_) => NodeCategory::Filter,
            Self::NumberOfSongs(_) => NodeCategory::NumberOfSongs,
            Self::SelectionModifier(_) => NodeCategory::SelectionModifier,
            Self::SourceSelector(_) => NodeCategory::SourceSelector,
            Self::BasicSettings(_) => NodeCategory::BasicSettings,
            Self::ListSource(_) => NodeCategory::ListSource,
        }
    }
}

/// A node in the configuration graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigNode {
    /// Unique ID
    pub id: NodeId,

    /// Category and its settings
    #[serde(flatten)]
    pub settings: NodeSettings,
}

impl ConfigNode {
    /// Create node
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<NodeId>, settings: NodeSettings) -> Self {
        Self {
            id: id.into(),
            settings,
        }
    }

    /// Router node
    #[must_use]
    pub fn router(id: impl Into<NodeId>, routes: Vec<Route>) -> Self {
        Self::new(id, NodeSettings::Router(RouterSettings { routes }))
    }

    /// Filter node
    #[must_use]
    pub fn filter(id: impl Into<NodeId>, settings: FilterSettings) -> Self {
        Self::new(id, NodeSettings::Filter(settings))
    }

    /// Enabled selection modifier node
    #[must_use]
    pub fn modifier(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeSettings::SelectionModifier(ModifierSettings::default()))
    }

    /// Song count node
    #[must_use]
    pub fn song_count(id: impl Into<NodeId>, count: SongCount) -> Self {
        Self::new(id, NodeSettings::NumberOfSongs(count))
    }

    /// Category of the node
    #[inline]
    #[must_use]
    pub fn category(&self) -> NodeCategory {
        self.settings.category()
    }

    /// Type key used for modifier claims
    #[must_use]
    pub fn type_key(&self) -> NodeTypeKey {
        match &self.settings {
            NodeSettings::Filter(filter) => NodeTypeKey::Filter(filter.kind),
            other => NodeTypeKey::Category(other.category()),
        }
    }

    /// Router settings, if this is a router
    #[must_use]
    pub fn as_router(&self) -> Option<&RouterSettings> {
        match &self.settings {
            NodeSettings::Router(router) => Some(router),
            _ => None,
        }
    }

    /// Filter settings, if this is a filter
    #[must_use]
    pub fn as_filter(&self) -> Option<&FilterSettings> {
        match &self.settings {
            NodeSettings::Filter(filter) => Some(filter),
            _ => None,
        }
    }

    /// Modifier settings, if this is a selection modifier
    #[must_use]
    pub fn as_modifier(&self) -> Option<&ModifierSettings> {
        match &self.settings {
            NodeSettings::SelectionModifier(modifier) => Some(modifier),
            _ => None,
        }
    }

    /// Whether this is a router
    #[inline]
    #[must_use]
    pub fn is_router(&self) -> bool {
        self.category() == NodeCategory::Router
    }

    /// Whether this is a selection modifier
    #[inline]
    #[must_use]
    pub fn is_modifier(&self) -> bool {
        self.category() == NodeCategory::SelectionModifier
    }
}
