//! Rule registry
//!
//! Maps each [`MatchPolicy`] to the [`TotalRule`] that enforces it.

use crate::mode::MatchPolicy;
use crate::rule::{CeilingTotalRule, ExactTotalRule, TotalRule};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of total rules keyed by policy
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: HashMap<MatchPolicy, Arc<dyn TotalRule>>,
}

impl RuleRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Create registry with the built-in rules
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ExactTotalRule::new()));
        registry.register(Arc::new(CeilingTotalRule::new()));
        registry
    }

    /// Register a rule under its own policy, replacing any previous one
    pub fn register(&mut self, rule: Arc<dyn TotalRule>) {
        self.rules.insert(rule.policy(), rule);
    }

    /// Check if a policy has a rule
    #[inline]
    #[must_use]
    pub fn contains(&self, policy: MatchPolicy) -> bool {
        self.rules.contains_key(&policy)
    }

    /// Rule for a policy, falling back to exact match
    #[must_use]
    pub fn select(&self, policy: MatchPolicy) -> Arc<dyn TotalRule> {
        self.rules
            .get(&policy)
            .or_else(|| self.rules.get(&MatchPolicy::Exact))
            .cloned()
            .unwrap_or_else(|| Arc::new(ExactTotalRule::new()))
    }

    /// Get number of registered rules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
