//! Quizflow Allocation
//!
//! Reconciles the category allocations of a filter node against the quiz's
//! target total.
//!
//! # Core Concepts
//!
//! - [`analyze`]: display-only prediction of what each category resolves to
//! - [`TotalRule`]: pluggable feasibility rules ([`ExactTotalRule`], [`CeilingTotalRule`])
//! - [`RuleRegistry`]: rule selection by [`MatchPolicy`]
//! - [`FilterValidator`]: per-node validation status with a readable reason
//! - [`quick_fix`]: deterministic, user-triggered repair
//!
//! # Example
//!
//! ```rust
//! use quizflow_allocation::{FilterKind, FilterSettings, FilterValidator, Target};
//!
//! let filter = FilterSettings::new(FilterKind::SongTypes)
//!     .with_fixed("openings", 60.0)
//!     .with_range("endings", 0.0, 100.0);
//!
//! let validator = FilterValidator::new();
//! let status = validator.validate(&filter, Target::percent(100.0));
//! assert!(status.is_valid);
//!
//! let predicted = validator.analyze(&filter, Target::percent(100.0));
//! assert_eq!(predicted.get("endings").unwrap().display.floor(), 40.0);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod analyzer;
mod entry;
mod error;
mod filter;
mod mode;
mod quick_fix;
mod registry;
mod rule;
mod validation;
mod vintage;

pub use analyzer::{analyze, AllocationResult, ResolvedAllocation};
pub use entry::{AllocationEntry, AllocationValue, Shape, Totals};
pub use error::{fmt_amount, AllocationError, Amount, Gap, Infeasible, QuickFixError};
pub use filter::{CategorySetting, FilterKind, FilterSettings};
pub use mode::{AllocationMode, MatchPolicy, Target};
pub use quick_fix::{quick_fix, quick_fix_partial, FixAction, QuickFix};
pub use registry::RuleRegistry;
pub use rule::{Advisory, CeilingTotalRule, ExactTotalRule, RuleParams, TotalRule, Verdict};
pub use validation::{FilterValidation, FilterValidator};
pub use vintage::{Season, SeasonYear, VintageWindow};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
