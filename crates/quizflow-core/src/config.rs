//! Resolver configuration

use crate::error::ConfigError;
use quizflow_allocation::{RuleParams, SeasonYear};
use serde::{Deserialize, Serialize};

/// Resolver configuration
///
/// Every field has a default, so a partial TOML document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Tolerance when comparing totals
    pub epsilon: f64,

    /// Total every percentage-mode filter must reach
    pub percentage_total: f64,

    /// Edge ID prefix marking internal flow edges
    pub internal_edge_prefix: String,

    /// Maximum memoized filter outcomes
    pub cache_capacity: u64,

    /// Range spread, as a share of the target, that triggers a loose-range warning
    pub loose_range_ratio: f64,

    /// Season treated as "now"; read from the clock when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub present: Option<SeasonYear>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.01,
            percentage_total: 100.0,
            internal_edge_prefix: "flow-".to_string(),
            cache_capacity: 1024,
            loose_range_ratio: 0.5,
            present: None,
        }
    }
}

impl ResolverConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the document is malformed or a value is out
    /// of range.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns the first out-of-range value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::InvalidEpsilon(self.epsilon));
        }
        if !self.percentage_total.is_finite() || self.percentage_total <= 0.0 {
            return Err(ConfigError::InvalidPercentageTotal(self.percentage_total));
        }
        if !self.loose_range_ratio.is_finite() || self.loose_range_ratio < 0.0 {
            return Err(ConfigError::InvalidLooseRangeRatio(self.loose_range_ratio));
        }
        Ok(())
    }

    /// With epsilon
    #[inline]
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// With percentage total
    #[inline]
    #[must_use]
    pub fn with_percentage_total(mut self, total: f64) -> Self {
        self.percentage_total = total;
        self
    }

    /// With internal edge prefix
    #[inline]
    #[must_use]
    pub fn with_internal_edge_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.internal_edge_prefix = prefix.into();
        self
    }

    /// With cache capacity
    #[inline]
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// With loose-range ratio
    #[inline]
    #[must_use]
    pub fn with_loose_range_ratio(mut self, ratio: f64) -> Self {
        self.loose_range_ratio = ratio;
        self
    }

    /// With pinned present season
    #[inline]
    #[must_use]
    pub fn with_present(mut self, present: SeasonYear) -> Self {
        self.present = Some(present);
        self
    }

    /// Rule parameters derived from this configuration
    #[inline]
    #[must_use]
    pub fn rule_params(&self) -> RuleParams {
        RuleParams {
            epsilon: self.epsilon,
            loose_range_ratio: self.loose_range_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quizflow_allocation::Season;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ResolverConfig::from_toml_str("").unwrap();
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let config = ResolverConfig::from_toml_str(
            r#"
            epsilon = 0.5
            internal_edge_prefix = "internal:"

            [present]
            year = 2024
            season = "spring"
            "#,
        )
        .unwrap();

        assert_eq!(config.epsilon, 0.5);
        assert_eq!(config.internal_edge_prefix, "internal:");
        assert_eq!(config.present, Some(SeasonYear::new(2024, Season::Spring)));
        assert_eq!(config.cache_capacity, 1024);
    }

    #[test]
    fn negative_epsilon_rejected() {
        let err = ResolverConfig::from_toml_str("epsilon = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEpsilon(_)));
    }

    #[test]
    fn zero_percentage_total_rejected() {
        let err = ResolverConfig::new().with_percentage_total(0.0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPercentageTotal(_)));
    }

    #[test]
    fn malformed_toml_reported() {
        let err = ResolverConfig::from_toml_str("epsilon = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rule_params_follow_config() {
        let params = ResolverConfig::new().with_epsilon(0.1).rule_params();
        assert_eq!(params.epsilon, 0.1);
        assert_eq!(params.loose_range_ratio, 0.5);
    }
}
