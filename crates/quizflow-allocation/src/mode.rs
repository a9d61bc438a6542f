//! Allocation units and total-matching policies

use serde::{Deserialize, Serialize};

/// Unit in which a filter expresses its allocations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    /// Shares of the whole quiz, totalling 100
    #[default]
    Percentage,

    /// Absolute song counts, totalling the song count
    Count,
}

/// How a filter's total must relate to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Totals must equal the target (within epsilon)
    #[default]
    Exact,

    /// Totals may fall short of the target but never exceed it
    AtMost,
}

impl MatchPolicy {
    /// Whether a shortfall is an error under this policy
    #[inline]
    #[must_use]
    pub const fn requires_exact(&self) -> bool {
        matches!(self, Self::Exact)
    }
}

/// Target a filter resolves against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Required total
    pub total: f64,

    /// Unit of the total
    pub mode: AllocationMode,
}

impl Target {
    /// Percentage target
    #[inline]
    #[must_use]
    pub const fn percent(total: f64) -> Self {
        Self {
            total,
            mode: AllocationMode::Percentage,
        }
    }

    /// Song-count target
    #[inline]
    #[must_use]
    pub const fn count(total: f64) -> Self {
        Self {
            total,
            mode: AllocationMode::Count,
        }
    }
}
