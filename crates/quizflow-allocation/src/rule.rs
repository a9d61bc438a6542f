//! Total rules
//!
//! A [`TotalRule`] decides whether a filter's entries can meet its target.
//! Rules evaluate in a fixed order and the first failure wins.

use crate::entry::{AllocationEntry, Shape, Totals};
use crate::error::{AllocationError, Amount, Gap, Infeasible};
use crate::mode::{MatchPolicy, Target};
use std::collections::HashSet;

/// Tunables shared by every rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleParams {
    /// Tolerance when comparing totals
    pub epsilon: f64,

    /// Range spread (as a share of the target) above which ranges are "loose"
    pub loose_range_ratio: f64,
}

impl Default for RuleParams {
    fn default() -> Self {
        Self {
            epsilon: 0.01,
            loose_range_ratio: 0.5,
        }
    }
}

/// Decides whether entries meet a target total
///
/// # Contract
/// `check()` must be deterministic and must not depend on entry order except
/// for which offending entry an error names.
pub trait TotalRule: Send + Sync + std::fmt::Debug {
    /// Check entries against the target
    ///
    /// # Errors
    /// Returns [`Infeasible`] describing the first failed rule.
    fn check(
        &self,
        entries: &[AllocationEntry],
        target: Target,
        params: &RuleParams,
    ) -> Result<Verdict, Infeasible>;

    /// Policy this rule implements
    fn policy(&self) -> MatchPolicy;

    /// Rule name (for logs)
    fn name(&self) -> &'static str;
}

/// Successful check with optional advice
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Aggregate sums of the checked entries
    pub totals: Totals,

    /// Non-blocking remark for the user
    pub advisory: Option<Advisory>,
}

/// Non-blocking remarks on a valid allocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advisory {
    /// Ranges leave a lot of room
    LooseRanges {
        /// `Σmax - Σmin`
        spread: Amount,
    },

    /// Fixed and random entries coexist
    ConstrainedByFixed,

    /// Under an at-most policy the entries cannot fill the target
    Underfilled {
        /// Largest possible total
        reachable: Amount,
        /// Target total
        target: Amount,
    },
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LooseRanges { spread } => write!(
                f,
                "ranges are loose: results may vary by up to {spread} between quizzes"
            ),
            Self::ConstrainedByFixed => f.write_str("randomization is constrained by fixed values"),
            Self::Underfilled { reachable, target } => {
                write!(f, "allocations can reach at most {reachable} of {target}")
            }
        }
    }
}

/// Totals must equal the target
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactTotalRule;

impl ExactTotalRule {
    /// Create new exact rule
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TotalRule for ExactTotalRule {
    fn check(
        &self,
        entries: &[AllocationEntry],
        target: Target,
        params: &RuleParams,
    ) -> Result<Verdict, Infeasible> {
        let totals = precheck(entries)?;
        let eps = params.epsilon;
        let amount = |value| Amount::new(value, target.mode);

        let advisory = match totals.shape() {
            Shape::Empty => return Err(Infeasible::NothingEnabled),
            Shape::AllStatic => {
                if (totals.static_sum - target.total).abs() > eps {
                    return Err(Infeasible::StaticMismatch {
                        total: amount(totals.static_sum),
                        target: amount(target.total),
                        gap: Gap::between(totals.static_sum, target.total, target.mode),
                    });
                }
                None
            }
            Shape::AllRange | Shape::Mixed => {
                check_bracket(&totals, target, eps)?;
                if totals.shape() == Shape::Mixed {
                    Some(Advisory::ConstrainedByFixed)
                } else {
                    loose_ranges(&totals, target, params)
                }
            }
        };

        Ok(Verdict { totals, advisory })
    }

    fn policy(&self) -> MatchPolicy {
        MatchPolicy::Exact
    }

    fn name(&self) -> &'static str {
        "ExactTotal"
    }
}

/// Totals may fall short of the target but never exceed it
#[derive(Debug, Clone, Copy, Default)]
pub struct CeilingTotalRule;

impl CeilingTotalRule {
    /// Create new ceiling rule
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TotalRule for CeilingTotalRule {
    fn check(
        &self,
        entries: &[AllocationEntry],
        target: Target,
        params: &RuleParams,
    ) -> Result<Verdict, Infeasible> {
        let totals = precheck(entries)?;
        let eps = params.epsilon;
        let amount = |value| Amount::new(value, target.mode);

        let shape = totals.shape();
        if shape == Shape::Empty {
            return Err(Infeasible::NothingEnabled);
        }

        if totals.committed() > target.total + eps {
            return Err(if shape == Shape::AllStatic {
                Infeasible::ExceedsCeiling {
                    total: amount(totals.committed()),
                    target: amount(target.total),
                }
            } else {
                Infeasible::MinimumsExceedTarget {
                    committed: amount(totals.committed()),
                    target: amount(target.total),
                }
            });
        }

        let advisory = if totals.reachable() < target.total - eps {
            Some(Advisory::Underfilled {
                reachable: amount(totals.reachable()),
                target: amount(target.total),
            })
        } else if shape == Shape::Mixed {
            Some(Advisory::ConstrainedByFixed)
        } else if shape == Shape::AllRange {
            loose_ranges(&totals, target, params)
        } else {
            None
        };

        Ok(Verdict { totals, advisory })
    }

    fn policy(&self) -> MatchPolicy {
        MatchPolicy::AtMost
    }

    fn name(&self) -> &'static str {
        "CeilingTotal"
    }
}

/// Entry-level invariants every rule relies on
fn precheck(entries: &[AllocationEntry]) -> Result<Totals, Infeasible> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        entry.value.check(&entry.label)?;
        if !seen.insert(entry.label.as_str()) {
            return Err(AllocationError::DuplicateLabel(entry.label.clone()).into());
        }
    }
    Ok(Totals::of(entries))
}

/// Committed minimums must not overshoot and reachable maximums must not fall short
fn check_bracket(totals: &Totals, target: Target, eps: f64) -> Result<(), Infeasible> {
    let amount = |value| Amount::new(value, target.mode);

    if totals.committed() > target.total + eps {
        return Err(Infeasible::MinimumsExceedTarget {
            committed: amount(totals.committed()),
            target: amount(target.total),
        });
    }
    if totals.reachable() < target.total - eps {
        return Err(Infeasible::MaximumsBelowTarget {
            reachable: amount(totals.reachable()),
            target: amount(target.total),
        });
    }
    Ok(())
}

fn loose_ranges(totals: &Totals, target: Target, params: &RuleParams) -> Option<Advisory> {
    let spread = totals.max_sum - totals.min_sum;
    (target.total > 0.0 && spread >= params.loose_range_ratio * target.total).then(|| {
        Advisory::LooseRanges {
            spread: Amount::new(spread, target.mode),
        }
    })
}
