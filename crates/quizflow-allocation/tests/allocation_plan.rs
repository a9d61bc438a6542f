//! Functional tests for filter allocation.
//!
//! These exercise the analyzer, validator and quick-fix together through the
//! public API, the way an editor drives them for a single filter node:
//! - Fixed allocations must add up to the target.
//! - Ranges must bracket the target.
//! - A lone random category has no freedom once fixed ones are placed.
//! - Quick-fix repairs deterministically and re-validates.

use proptest::prelude::*;
use quizflow_allocation::{
    analyze, quick_fix, AllocationEntry, AllocationValue, FilterKind, FilterSettings,
    FilterValidator, Infeasible, MatchPolicy, QuickFixError, Season, SeasonYear, Target,
};

const EPS: f64 = 0.01;

fn present() -> SeasonYear {
    SeasonYear::new(2026, Season::Fall)
}

/// Tenet: fixed allocations are valid exactly when they sum to the target.
#[test]
fn all_static_feasibility() {
    let validator = FilterValidator::new();
    let filter = FilterSettings::new(FilterKind::Genres)
        .with_fixed("a", 30.0)
        .with_fixed("b", 70.0);

    assert!(validator.validate(&filter, Target::percent(100.0)).is_valid);

    let status = validator.validate(&filter, Target::percent(90.0));
    assert!(!status.is_valid);
    assert!(status.message.contains("10%"), "message: {}", status.message);
}

/// Tenet: ranges are valid when their combined bounds bracket the target.
#[test]
fn all_range_feasibility() {
    let validator = FilterValidator::new();
    let filter = FilterSettings::new(FilterKind::Genres)
        .with_range("a", 10.0, 40.0)
        .with_range("b", 10.0, 40.0);

    let err = validator.check(&filter, Target::percent(100.0)).unwrap_err();
    assert!(matches!(err, Infeasible::MaximumsBelowTarget { .. }));

    assert!(validator.validate(&filter, Target::percent(50.0)).is_valid);
}

/// Tenet: a single random category next to fixed ones resolves to the remainder.
#[test]
fn mixed_single_random_collapse() {
    let entries = [
        AllocationEntry::fixed("a", 60.0).unwrap(),
        AllocationEntry::range("b", 0.0, 100.0).unwrap(),
    ];

    let result = analyze(&entries, 100.0, EPS);

    assert_eq!(result.get("b").unwrap().display, AllocationValue::fixed(40.0));
    assert!(result.has_random);
}

/// Tenet: quick-fix shaves the largest fixed value and leaves the node valid.
#[test]
fn quick_fix_excess_reduction() {
    let validator = FilterValidator::new();
    let filter = FilterSettings::new(FilterKind::Genres)
        .with_fixed("a", 70.0)
        .with_fixed("b", 50.0);

    let fixed = quick_fix(&validator, &filter, Target::percent(100.0), present()).unwrap();

    let entries = fixed.settings.entries();
    assert_eq!(entries[0].value, AllocationValue::fixed(50.0));
    assert_eq!(entries[1].value, AllocationValue::fixed(50.0));
    assert!(validator.validate(&fixed.settings, Target::percent(100.0)).is_valid);
}

/// Tenet: quick-fix refuses to "fix" a valid node.
#[test]
fn quick_fix_on_valid_node_is_reported() {
    let validator = FilterValidator::new();
    let filter = FilterSettings::new(FilterKind::SongTypes).with_fixed("openings", 100.0);

    let err = quick_fix(&validator, &filter, Target::percent(100.0), present()).unwrap_err();
    assert_eq!(err, QuickFixError::AlreadyValid);
}

fn fixed_values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0u32..=100, 1..6).prop_map(|v| v.into_iter().map(f64::from).collect())
}

fn filter_from(values: &[f64]) -> FilterSettings {
    values
        .iter()
        .enumerate()
        .fold(FilterSettings::new(FilterKind::Tags), |filter, (i, value)| {
            filter.with_fixed(&format!("tag{i}"), *value)
        })
}

proptest! {
    #[test]
    fn prop_analyzer_reports_static_values_verbatim(values in fixed_values(), target in 0u32..300) {
        let filter = filter_from(&values);
        let result = analyze(&filter.entries(), f64::from(target), EPS);

        for (entry, value) in result.entries.iter().zip(&values) {
            prop_assert_eq!(entry.display, AllocationValue::fixed(*value));
        }
    }

    #[test]
    fn prop_quick_fix_resolves_fixed_allocations(values in fixed_values(), target in 0u32..300) {
        let validator = FilterValidator::new();
        let filter = filter_from(&values);
        let target = Target::count(f64::from(target));

        match quick_fix(&validator, &filter, target, present()) {
            Ok(fixed) => {
                prop_assert!(fixed.is_resolved());
                let total: f64 = fixed.settings.entries().iter().map(|e| e.value.floor()).sum();
                prop_assert!((total - target.total).abs() <= EPS);
            }
            Err(QuickFixError::AlreadyValid) => {
                prop_assert!(validator.validate(&filter, target).is_valid);
            }
            Err(other) => prop_assert!(false, "unexpected: {other}"),
        }
    }

    #[test]
    fn prop_validation_is_deterministic(values in fixed_values(), target in 0u32..300) {
        let validator = FilterValidator::new();
        let filter = filter_from(&values);
        let target = Target::percent(f64::from(target));

        prop_assert_eq!(validator.validate(&filter, target), validator.validate(&filter, target));
        prop_assert_eq!(validator.analyze(&filter, target), validator.analyze(&filter, target));
    }

    #[test]
    fn prop_prediction_agrees_with_validation(
        values in fixed_values(),
        target in 0u32..300,
        at_most in any::<bool>(),
    ) {
        let validator = FilterValidator::new();
        let policy = if at_most { MatchPolicy::AtMost } else { MatchPolicy::Exact };
        let filter = filter_from(&values).with_policy(policy);
        let target = Target::count(f64::from(target));

        prop_assert_eq!(
            validator.validate(&filter, target).is_valid,
            validator.analyze(&filter, target).feasible
        );
    }
}
