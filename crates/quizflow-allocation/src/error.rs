//! Error types for allocation analysis
//!
//! - [`AllocationError`]: an entry breaks a numeric invariant (caller bug)
//! - [`Infeasible`]: a filter's entries cannot meet its target total
//! - [`QuickFixError`]: quick-fix was asked to repair something it cannot

use crate::mode::AllocationMode;

/// Invariant violations on individual entries
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    /// Negative or non-finite amount
    #[error("invalid amount {value} for '{label}'")]
    InvalidAmount {
        /// Offending entry
        label: String,
        /// Offending amount
        value: f64,
    },

    /// Range with `min > max`
    #[error("range for '{label}' is inverted: min {min} > max {max}")]
    InvertedRange {
        /// Offending entry
        label: String,
        /// Configured minimum
        min: f64,
        /// Configured maximum
        max: f64,
    },

    /// Two entries share a label
    #[error("duplicate category '{0}'")]
    DuplicateLabel(String),

    /// Target total is negative or non-finite
    #[error("invalid target total {0}")]
    InvalidTarget(f64),
}

impl AllocationError {
    /// Create invalid amount error
    #[inline]
    #[must_use]
    pub fn invalid_amount(label: &str, value: f64) -> Self {
        Self::InvalidAmount {
            label: label.to_string(),
            value,
        }
    }
}

/// Reasons a filter's allocation cannot meet its target
///
/// The display strings are the per-node validation messages shown to users.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Infeasible {
    /// Nothing enabled
    #[error("enable at least one category")]
    NothingEnabled,

    /// Entries are not valid numbers
    #[error("{0}")]
    InvalidEntry(#[from] AllocationError),

    /// A vintage window ends before it starts
    #[error("vintage window '{label}' starts after it ends")]
    InvertedWindow {
        /// Offending window
        label: String,
    },

    /// Fixed allocations do not add up to the target
    #[error("fixed allocations total {total} but must equal {target}; {gap}")]
    StaticMismatch {
        /// Sum of fixed values
        total: Amount,
        /// Required total
        target: Amount,
        /// Distance from the target
        gap: Gap,
    },

    /// Allocations exceed an "at most" target
    #[error("allocations total {total} which exceeds the limit of {target}")]
    ExceedsCeiling {
        /// Smallest possible total
        total: Amount,
        /// Upper limit
        target: Amount,
    },

    /// Range minimums alone overshoot the target
    #[error("combined minimums exceed target: {committed} > {target}")]
    MinimumsExceedTarget {
        /// Fixed values plus range minimums
        committed: Amount,
        /// Required total
        target: Amount,
    },

    /// Range maximums cannot reach the target
    #[error("combined maximums are less than target: {reachable} < {target}")]
    MaximumsBelowTarget {
        /// Fixed values plus range maximums
        reachable: Amount,
        /// Required total
        target: Amount,
    },
}

impl Infeasible {
    /// Amount by which the smallest possible total overshoots the target
    #[must_use]
    pub fn excess(&self) -> Option<f64> {
        match self {
            Self::StaticMismatch { gap, .. } if gap.over => Some(gap.amount.value),
            Self::ExceedsCeiling { total, target } => Some(total.value - target.value),
            Self::MinimumsExceedTarget { committed, target } => {
                Some(committed.value - target.value)
            }
            _ => None,
        }
    }

    /// Amount by which the largest possible total falls short of the target
    #[must_use]
    pub fn shortfall(&self) -> Option<f64> {
        match self {
            Self::StaticMismatch { gap, .. } if !gap.over => Some(gap.amount.value),
            Self::MaximumsBelowTarget { reachable, target } => {
                Some(target.value - reachable.value)
            }
            _ => None,
        }
    }
}

/// An amount tagged with its unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount {
    /// Percentage points or song count
    pub value: f64,
    /// Unit of the value
    pub mode: AllocationMode,
}

impl Amount {
    /// Create amount
    #[inline]
    #[must_use]
    pub const fn new(value: f64, mode: AllocationMode) -> Self {
        Self { value, mode }
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&fmt_amount(self.value, self.mode))
    }
}

/// Signed distance between a total and its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    /// Absolute distance
    pub amount: Amount,
    /// Whether the total overshoots
    pub over: bool,
}

impl Gap {
    /// Gap of `total - target`
    #[must_use]
    pub fn between(total: f64, target: f64, mode: AllocationMode) -> Self {
        Self {
            amount: Amount::new((total - target).abs(), mode),
            over: total > target,
        }
    }
}

impl std::fmt::Display for Gap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let direction = if self.over { "over" } else { "short" };
        write!(f, "{} {direction}", self.amount)
    }
}

/// Quick-fix failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuickFixError {
    /// The filter already validates
    #[error("nothing to fix: allocation is already valid")]
    AlreadyValid,

    /// Repairs were applied but the filter still does not validate
    #[error("quick-fix could not resolve: {0}")]
    Unresolved(Infeasible),
}

/// Format an amount in the unit of its mode
///
/// Values are rounded to two decimals and trailing zeros dropped.
#[must_use]
pub fn fmt_amount(value: f64, mode: AllocationMode) -> String {
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    match mode {
        AllocationMode::Percentage => format!("{trimmed}%"),
        AllocationMode::Count => {
            let unit = if trimmed == "1" { "song" } else { "songs" };
            format!("{trimmed} {unit}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_formatting() {
        assert_eq!(fmt_amount(10.0, AllocationMode::Percentage), "10%");
        assert_eq!(fmt_amount(33.333_333, AllocationMode::Percentage), "33.33%");
        assert_eq!(fmt_amount(1.0, AllocationMode::Count), "1 song");
        assert_eq!(fmt_amount(12.5, AllocationMode::Count), "12.5 songs");
    }

    #[test]
    fn static_mismatch_names_delta() {
        let mode = AllocationMode::Percentage;
        let err = Infeasible::StaticMismatch {
            total: Amount::new(100.0, mode),
            target: Amount::new(90.0, mode),
            gap: Gap::between(100.0, 90.0, mode),
        };
        assert_eq!(
            err.to_string(),
            "fixed allocations total 100% but must equal 90%; 10% over"
        );
        assert_eq!(err.excess(), Some(10.0));
        assert_eq!(err.shortfall(), None);
    }

    #[test]
    fn maximums_below_target_reports_shortfall() {
        let mode = AllocationMode::Percentage;
        let err = Infeasible::MaximumsBelowTarget {
            reachable: Amount::new(80.0, mode),
            target: Amount::new(100.0, mode),
        };
        assert!(err.to_string().starts_with("combined maximums are less than target"));
        assert_eq!(err.shortfall(), Some(20.0));
    }

    #[test]
    fn nothing_enabled_message() {
        assert_eq!(
            Infeasible::NothingEnabled.to_string(),
            "enable at least one category"
        );
    }
}
