//! Filter validation
//!
//! Applies window sanity checks and the policy's [`TotalRule`] to a filter's
//! enabled categories. Validation never mutates the settings it inspects.

use crate::analyzer::{analyze, AllocationResult};
use crate::error::Infeasible;
use crate::filter::FilterSettings;
use crate::mode::Target;
use crate::registry::RuleRegistry;
use crate::rule::{Advisory, RuleParams, Verdict};
use serde::{Deserialize, Serialize};

/// Validation status of one filter node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterValidation {
    /// Whether the filter can be sampled
    pub is_valid: bool,

    /// Reason the filter is invalid; empty when valid
    pub message: String,

    /// Non-blocking remark on a valid filter
    pub warning: Option<String>,
}

impl FilterValidation {
    /// Build from a rule outcome
    #[must_use]
    pub fn from_outcome(outcome: &Result<Verdict, Infeasible>) -> Self {
        match outcome {
            Ok(verdict) => Self {
                is_valid: true,
                message: String::new(),
                warning: verdict.advisory.as_ref().map(Advisory::to_string),
            },
            Err(reason) => Self {
                is_valid: false,
                message: reason.to_string(),
                warning: None,
            },
        }
    }
}

/// Validates filters against their targets
#[derive(Debug, Clone, Default)]
pub struct FilterValidator {
    registry: RuleRegistry,
    params: RuleParams,
}

impl FilterValidator {
    /// Create validator with the built-in rules and default parameters
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create validator with custom parameters
    #[inline]
    #[must_use]
    pub fn with_params(params: RuleParams) -> Self {
        Self {
            registry: RuleRegistry::with_defaults(),
            params,
        }
    }

    /// Replace the rule registry
    #[inline]
    #[must_use]
    pub fn with_registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Rule parameters in use
    #[inline]
    #[must_use]
    pub fn params(&self) -> &RuleParams {
        &self.params
    }

    /// Check a filter, first failure wins
    ///
    /// # Errors
    /// Returns [`Infeasible`] when the filter cannot meet its target.
    pub fn check(&self, settings: &FilterSettings, target: Target) -> Result<Verdict, Infeasible> {
        if let Some(category) = settings.first_inverted_window() {
            return Err(Infeasible::InvertedWindow {
                label: category.label.clone(),
            });
        }

        let rule = self.registry.select(settings.policy);
        let entries = settings.entries();
        let outcome = rule.check(&entries, target, &self.params);

        if let Err(reason) = &outcome {
            tracing::debug!(
                "{} filter failed {} rule: {}",
                settings.kind,
                rule.name(),
                reason
            );
        }
        outcome
    }

    /// Validation status for display
    #[must_use]
    pub fn validate(&self, settings: &FilterSettings, target: Target) -> FilterValidation {
        FilterValidation::from_outcome(&self.check(settings, target))
    }

    /// Predicted allocation for display
    ///
    /// `feasible` is the verdict of [`FilterValidator::check`], so it always
    /// matches [`FilterValidation::is_valid`] whatever the match policy.
    #[must_use]
    pub fn analyze(&self, settings: &FilterSettings, target: Target) -> AllocationResult {
        let mut result = analyze(&settings.entries(), target.total, self.params.epsilon);
        result.feasible = self.check(settings, target).is_ok();
        result
    }
}
