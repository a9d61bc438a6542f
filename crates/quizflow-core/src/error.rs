//! Error types for resolution
//!
//! Infeasible filters are not errors here; they are reported per node in the
//! [`Resolution`](crate::Resolution). These cover invalid caller input only.

use quizflow_allocation::QuickFixError;
use quizflow_graph::{GraphError, NodeId};

/// Invalid resolver configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("failed to parse resolver config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Epsilon must be finite and non-negative
    #[error("epsilon must be finite and non-negative, got {0}")]
    InvalidEpsilon(f64),

    /// Percentage total must be finite and positive
    #[error("percentage total must be finite and positive, got {0}")]
    InvalidPercentageTotal(f64),

    /// Loose-range ratio must be finite and non-negative
    #[error("loose range ratio must be finite and non-negative, got {0}")]
    InvalidLooseRangeRatio(f64),
}

/// Errors raised by [`Resolver`](crate::Resolver) operations
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Target total is negative or non-finite
    #[error("invalid target total {0}")]
    InvalidTarget(f64),

    /// Target range has `min > max`
    #[error("target range is inverted: min {min} > max {max}")]
    InvertedTarget {
        /// Range minimum
        min: f64,
        /// Range maximum
        max: f64,
    },

    /// Graph has no song count node to read the target from
    #[error("graph has no number-of-songs node")]
    MissingSongCount,

    /// Node is not a filter
    #[error("node '{0}' is not a filter")]
    NotAFilter(NodeId),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Graph editing error
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Quick-fix could not be applied
    #[error(transparent)]
    QuickFix(#[from] QuickFixError),
}

impl ResolveError {
    /// Create not-a-filter error
    #[inline]
    #[must_use]
    pub fn not_a_filter(id: &NodeId) -> Self {
        Self::NotAFilter(id.clone())
    }
}
