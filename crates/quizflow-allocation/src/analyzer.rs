//! Allocation analyzer
//!
//! Predicts the value each entry will resolve to, for display. The analyzer
//! only reports: it never clamps or rewrites configured values, and division
//! of a shared remainder among several random entries is left to sampling.

use crate::entry::{AllocationEntry, AllocationValue, Shape, Totals};
use serde::{Deserialize, Serialize};

/// Predicted value for one entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAllocation {
    /// Category key
    pub label: String,

    /// Predicted amount; a single value or the range still open at sampling
    pub display: AllocationValue,

    /// Whether this entry splits [`AllocationResult::remaining`] with other
    /// random entries at sampling time
    pub shares_remaining: bool,
}

/// Predicted allocation for a whole filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// One prediction per input entry, in input order
    pub entries: Vec<ResolvedAllocation>,

    /// Whether any input entry is a range
    pub has_random: bool,

    /// Whether the totals can meet the target
    pub feasible: bool,

    /// Target left over after fixed entries (mixed groups only)
    pub remaining: Option<f64>,
}

impl AllocationResult {
    /// Look up the prediction for a label
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&ResolvedAllocation> {
        self.entries.iter().find(|e| e.label == label)
    }
}

/// Analyze a group of entries against a target total
///
/// `feasible` uses the same bracket test as exact-match validation:
/// `committed <= target + epsilon` and `reachable >= target - epsilon`.
#[must_use]
pub fn analyze(entries: &[AllocationEntry], target: f64, epsilon: f64) -> AllocationResult {
    let totals = Totals::of(entries);
    let shape = totals.shape();

    let remaining = match shape {
        Shape::Mixed => Some(target - totals.static_sum),
        _ => None,
    };
    let lone_random = shape == Shape::Mixed && totals.range_count == 1;

    let resolved = entries
        .iter()
        .map(|entry| {
            let (display, shares_remaining) = match entry.value {
                AllocationValue::Static { value } => (AllocationValue::fixed(value), false),
                AllocationValue::Range { .. } if lone_random => {
                    let forced = remaining.unwrap_or_default().max(0.0);
                    (AllocationValue::fixed(forced), false)
                }
                AllocationValue::Range { min, max } => {
                    (collapse(min, max), shape == Shape::Mixed)
                }
            };
            ResolvedAllocation {
                label: entry.label.clone(),
                display,
                shares_remaining,
            }
        })
        .collect();

    let feasible = shape != Shape::Empty
        && totals.committed() <= target + epsilon
        && totals.reachable() >= target - epsilon;

    AllocationResult {
        entries: resolved,
        has_random: totals.range_count > 0,
        feasible,
        remaining,
    }
}

#[allow(clippy::float_cmp)]
fn collapse(min: f64, max: f64) -> AllocationValue {
    if min == max {
        AllocationValue::fixed(min)
    } else {
        AllocationValue::range(min, max)
    }
}
