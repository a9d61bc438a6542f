//! Allocation entries and their aggregate totals
//!
//! An [`AllocationEntry`] is one enabled category inside a filter node, either
//! a fixed amount or a `[min, max]` range resolved at sampling time.

use crate::error::AllocationError;
use serde::{Deserialize, Serialize};

/// Configured amount for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationValue {
    /// Fixed amount
    Static {
        /// Percentage points or song count
        value: f64,
    },

    /// Amount picked at sampling time within the bounds
    Range {
        /// Lower bound (inclusive)
        min: f64,
        /// Upper bound (inclusive)
        max: f64,
    },
}

impl AllocationValue {
    /// Fixed amount
    #[inline]
    #[must_use]
    pub const fn fixed(value: f64) -> Self {
        Self::Static { value }
    }

    /// Ranged amount
    #[inline]
    #[must_use]
    pub const fn range(min: f64, max: f64) -> Self {
        Self::Range { min, max }
    }

    /// Whether this amount is randomized
    #[inline]
    #[must_use]
    pub const fn is_random(&self) -> bool {
        matches!(self, Self::Range { .. })
    }

    /// Smallest amount this value can contribute
    #[inline]
    #[must_use]
    pub const fn floor(&self) -> f64 {
        match *self {
            Self::Static { value } => value,
            Self::Range { min, .. } => min,
        }
    }

    /// Largest amount this value can contribute
    #[inline]
    #[must_use]
    pub const fn ceiling(&self) -> f64 {
        match *self {
            Self::Static { value } => value,
            Self::Range { max, .. } => max,
        }
    }

    /// Check the numeric invariants (finite, non-negative, `min <= max`)
    ///
    /// # Errors
    /// Returns [`AllocationError`] naming the first broken invariant.
    pub fn check(&self, label: &str) -> Result<(), AllocationError> {
        match *self {
            Self::Static { value } => {
                if !value.is_finite() || value < 0.0 {
                    return Err(AllocationError::invalid_amount(label, value));
                }
            }
            Self::Range { min, max } => {
                for bound in [min, max] {
                    if !bound.is_finite() || bound < 0.0 {
                        return Err(AllocationError::invalid_amount(label, bound));
                    }
                }
                if min > max {
                    return Err(AllocationError::InvertedRange {
                        label: label.to_string(),
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }
}

/// One enabled category inside a filter node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// Category key, unique within its group
    pub label: String,

    /// Configured amount
    pub value: AllocationValue,
}

impl AllocationEntry {
    /// Create a checked entry
    ///
    /// # Errors
    /// Returns [`AllocationError`] if the value breaks a numeric invariant.
    pub fn new(label: impl Into<String>, value: AllocationValue) -> Result<Self, AllocationError> {
        let label = label.into();
        value.check(&label)?;
        Ok(Self { label, value })
    }

    /// Create a fixed entry
    ///
    /// # Errors
    /// Returns [`AllocationError`] for negative or non-finite values.
    pub fn fixed(label: impl Into<String>, value: f64) -> Result<Self, AllocationError> {
        Self::new(label, AllocationValue::fixed(value))
    }

    /// Create a ranged entry
    ///
    /// # Errors
    /// Returns [`AllocationError`] for negative bounds or `min > max`.
    pub fn range(label: impl Into<String>, min: f64, max: f64) -> Result<Self, AllocationError> {
        Self::new(label, AllocationValue::range(min, max))
    }
}

/// Aggregate sums over a group of entries
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// Sum of fixed values
    pub static_sum: f64,
    /// Sum of range minimums
    pub min_sum: f64,
    /// Sum of range maximums
    pub max_sum: f64,
    /// Number of fixed entries
    pub static_count: usize,
    /// Number of ranged entries
    pub range_count: usize,
}

impl Totals {
    /// Sum a group of entries
    #[must_use]
    pub fn of(entries: &[AllocationEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, entry| {
            match entry.value {
                AllocationValue::Static { value } => {
                    acc.static_sum += value;
                    acc.static_count += 1;
                }
                AllocationValue::Range { min, max } => {
                    acc.min_sum += min;
                    acc.max_sum += max;
                    acc.range_count += 1;
                }
            }
            acc
        })
    }

    /// Smallest total the group can produce
    #[inline]
    #[must_use]
    pub fn committed(&self) -> f64 {
        self.static_sum + self.min_sum
    }

    /// Largest total the group can produce
    #[inline]
    #[must_use]
    pub fn reachable(&self) -> f64 {
        self.static_sum + self.max_sum
    }

    /// Shape of the group
    #[inline]
    #[must_use]
    pub fn shape(&self) -> Shape {
        match (self.static_count, self.range_count) {
            (0, 0) => Shape::Empty,
            (_, 0) => Shape::AllStatic,
            (0, _) => Shape::AllRange,
            _ => Shape::Mixed,
        }
    }
}

/// Which kinds of entries a group contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// No enabled entries
    Empty,
    /// Only fixed entries
    AllStatic,
    /// Only ranged entries
    AllRange,
    /// Both kinds
    Mixed,
}
