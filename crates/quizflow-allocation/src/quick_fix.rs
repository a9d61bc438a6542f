//! Quick-fix reconciler
//!
//! User-triggered repair of an invalid filter. Repairs are deterministic:
//! - nothing enabled: enable the kind's default category at the full target
//! - excess: shave the largest committed amounts first (ties: first seen)
//! - shortfall under exact match: top up the first enabled category
//! - inverted vintage windows: end the window at the present season
//!
//! The result is re-validated; a repair that does not validate keeps the
//! validator's message instead of reporting success.

use crate::entry::AllocationValue;
use crate::error::QuickFixError;
use crate::filter::FilterSettings;
use crate::mode::Target;
use crate::validation::{FilterValidation, FilterValidator};
use crate::vintage::SeasonYear;
use serde::{Deserialize, Serialize};

/// One change made by quick-fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FixAction {
    /// A category was enabled at the full target
    EnabledDefault {
        /// Enabled category
        label: String,
        /// Amount assigned
        value: f64,
    },

    /// A fixed value or range minimum was lowered
    Reduced {
        /// Changed category
        label: String,
        /// Previous amount
        from: f64,
        /// New amount
        to: f64,
    },

    /// A fixed value or range maximum was raised
    ToppedUp {
        /// Changed category
        label: String,
        /// Previous amount
        from: f64,
        /// New amount
        to: f64,
    },

    /// A vintage window's end was moved to the present
    WindowEndReset {
        /// Changed category
        label: String,
        /// New end season
        to: SeasonYear,
    },
}

/// Outcome of a quick-fix attempt
#[derive(Debug, Clone, PartialEq)]
pub struct QuickFix {
    /// Repaired settings (a new value; the input is untouched)
    pub settings: FilterSettings,

    /// Changes applied, in order
    pub actions: Vec<FixAction>,

    /// Validation of the repaired settings
    pub validation: FilterValidation,
}

impl QuickFix {
    /// Whether the repaired settings validate
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.validation.is_valid
    }
}

/// Repair an invalid filter
///
/// # Errors
/// - [`QuickFixError::AlreadyValid`] if the filter already validates
/// - [`QuickFixError::Unresolved`] if repairs could not make it validate;
///   use [`quick_fix_partial`] to keep the partial repair
pub fn quick_fix(
    validator: &FilterValidator,
    settings: &FilterSettings,
    target: Target,
    present: SeasonYear,
) -> Result<QuickFix, QuickFixError> {
    let fix = quick_fix_partial(validator, settings, target, present)?;
    if fix.is_resolved() {
        return Ok(fix);
    }
    match validator.check(&fix.settings, target) {
        Err(reason) => Err(QuickFixError::Unresolved(reason)),
        Ok(_) => Ok(fix),
    }
}

/// Repair an invalid filter, returning the attempt even when it does not validate
///
/// # Errors
/// Returns [`QuickFixError::AlreadyValid`] if the filter already validates.
pub fn quick_fix_partial(
    validator: &FilterValidator,
    settings: &FilterSettings,
    target: Target,
    present: SeasonYear,
) -> Result<QuickFix, QuickFixError> {
    if validator.check(settings, target).is_ok() {
        return Err(QuickFixError::AlreadyValid);
    }

    let mut fixed = settings.clone();
    let mut actions = Vec::new();

    reset_inverted_windows(&mut fixed, present, &mut actions);

    if fixed.enabled().next().is_none() {
        enable_default(&mut fixed, target, present, &mut actions);
    }

    if let Err(reason) = validator.check(&fixed, target) {
        if let Some(excess) = reason.excess() {
            reduce_excess(&mut fixed, excess, &mut actions);
        } else if let Some(shortfall) = reason.shortfall() {
            if fixed.policy.requires_exact() {
                top_up(&mut fixed, shortfall, &mut actions);
            }
        }
    }

    let outcome = validator.check(&fixed, target);
    let validation = FilterValidation::from_outcome(&outcome);
    match &outcome {
        Ok(_) => tracing::info!(
            "Quick-fix resolved {} filter with {} change(s)",
            fixed.kind,
            actions.len()
        ),
        Err(reason) => tracing::warn!("Quick-fix left {} filter invalid: {}", fixed.kind, reason),
    }

    Ok(QuickFix {
        settings: fixed,
        actions,
        validation,
    })
}

fn reset_inverted_windows(
    settings: &mut FilterSettings,
    present: SeasonYear,
    actions: &mut Vec<FixAction>,
) {
    for category in settings.categories.iter_mut().filter(|c| c.enabled) {
        if let Some(window) = category.window.as_mut() {
            if window.is_inverted() {
                window.to = present;
                actions.push(FixAction::WindowEndReset {
                    label: category.label.clone(),
                    to: present,
                });
            }
        }
    }
}

fn enable_default(
    settings: &mut FilterSettings,
    target: Target,
    present: SeasonYear,
    actions: &mut Vec<FixAction>,
) {
    let default = settings.default_category(target.total, present);
    let label = default.label.clone();
    let category = settings.upsert(&label);
    category.enabled = true;
    category.value = default.value;
    // A kept window must be usable; disabled categories skip the window reset.
    if category.window.map_or(true, |window| window.is_inverted()) {
        category.window = default.window;
    }
    actions.push(FixAction::EnabledDefault {
        label,
        value: target.total,
    });
}

/// Lower the largest committed amounts until `excess` is absorbed
///
/// Committed amount is a fixed value or a range minimum. Amounts never drop
/// below zero; ties go to the category listed first.
fn reduce_excess(settings: &mut FilterSettings, excess: f64, actions: &mut Vec<FixAction>) {
    let mut outstanding = excess;

    while outstanding > f64::EPSILON {
        let mut largest: Option<(usize, f64)> = None;
        for (index, category) in settings.categories.iter().enumerate() {
            let amount = category.value.floor();
            if category.enabled && amount > 0.0 && largest.map_or(true, |(_, best)| amount > best) {
                largest = Some((index, amount));
            }
        }
        let Some((index, amount)) = largest else {
            break;
        };

        let cut = outstanding.min(amount);
        let reduced = amount - cut;
        let category = &mut settings.categories[index];
        category.value = match category.value {
            AllocationValue::Static { .. } => AllocationValue::fixed(reduced),
            AllocationValue::Range { max, .. } => AllocationValue::range(reduced, max),
        };
        outstanding -= cut;

        tracing::debug!("Quick-fix reduced '{}' from {} to {}", category.label, amount, reduced);
        actions.push(FixAction::Reduced {
            label: category.label.clone(),
            from: amount,
            to: reduced,
        });
    }
}

/// Raise the first enabled category by `shortfall`
fn top_up(settings: &mut FilterSettings, shortfall: f64, actions: &mut Vec<FixAction>) {
    let Some(category) = settings.categories.iter_mut().find(|c| c.enabled) else {
        return;
    };

    let from = category.value.ceiling();
    let to = from + shortfall;
    category.value = match category.value {
        AllocationValue::Static { .. } => AllocationValue::fixed(to),
        AllocationValue::Range { min, .. } => AllocationValue::range(min, to),
    };

    tracing::debug!("Quick-fix topped up '{}' from {} to {}", category.label, from, to);
    actions.push(FixAction::ToppedUp {
        label: category.label.clone(),
        from,
        to,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Infeasible;
    use crate::filter::{CategorySetting, FilterKind};
    use crate::mode::MatchPolicy;
    use crate::vintage::{Season, VintageWindow};
    use pretty_assertions::assert_eq;

    fn present() -> SeasonYear {
        SeasonYear::new(2026, Season::Fall)
    }

    fn fix(settings: &FilterSettings, target: Target) -> Result<QuickFix, QuickFixError> {
        quick_fix(&FilterValidator::new(), settings, target, present())
    }

    #[test]
    fn excess_shaves_largest_first() {
        let filter = FilterSettings::new(FilterKind::SongTypes)
            .with_fixed("openings", 70.0)
            .with_fixed("endings", 50.0);

        let fixed = fix(&filter, Target::percent(100.0)).unwrap();

        assert!(fixed.is_resolved());
        let entries = fixed.settings.entries();
        assert_eq!(entries[0].value, AllocationValue::fixed(50.0));
        assert_eq!(entries[1].value, AllocationValue::fixed(50.0));
        assert_eq!(
            fixed.actions,
            vec![FixAction::Reduced {
                label: "openings".to_string(),
                from: 70.0,
                to: 50.0,
            }]
        );
    }

    #[test]
    fn excess_spills_to_next_largest() {
        let filter = FilterSettings::new(FilterKind::SongDifficulty)
            .with_fixed("easy", 60.0)
            .with_fixed("medium", 50.0)
            .with_fixed("hard", 40.0);

        let fixed = fix(&filter, Target::percent(50.0)).unwrap();

        assert!(fixed.is_resolved());
        let values: Vec<_> = fixed.settings.entries().iter().map(|e| e.value.floor()).collect();
        // excess 100: easy absorbs 60, medium the remaining 40
        assert_eq!(values, vec![0.0, 10.0, 40.0]);
    }

    #[test]
    fn ties_go_to_first_seen() {
        let filter = FilterSettings::new(FilterKind::SongTypes)
            .with_fixed("openings", 60.0)
            .with_fixed("endings", 60.0);

        let fixed = fix(&filter, Target::percent(100.0)).unwrap();

        let values: Vec<_> = fixed.settings.entries().iter().map(|e| e.value.floor()).collect();
        assert_eq!(values, vec![40.0, 60.0]);
    }

    #[test]
    fn excess_lowers_range_minimum() {
        let filter = FilterSettings::new(FilterKind::AnimeType)
            .with_range("tv", 70.0, 90.0)
            .with_range("movie", 40.0, 50.0);

        let fixed = fix(&filter, Target::percent(100.0)).unwrap();

        assert!(fixed.is_resolved());
        assert_eq!(fixed.settings.entries()[0].value, AllocationValue::range(60.0, 90.0));
    }

    #[test]
    fn shortfall_tops_up_first_enabled() {
        let filter = FilterSettings::new(FilterKind::SongTypes)
            .with_fixed("endings", 20.0)
            .with_fixed("inserts", 30.0);

        let fixed = fix(&filter, Target::percent(100.0)).unwrap();

        assert!(fixed.is_resolved());
        assert_eq!(fixed.settings.entries()[0].value, AllocationValue::fixed(70.0));
    }

    #[test]
    fn shortfall_raises_range_maximum() {
        let filter = FilterSettings::new(FilterKind::SongTypes)
            .with_range("openings", 10.0, 40.0)
            .with_range("endings", 10.0, 40.0);

        let fixed = fix(&filter, Target::percent(100.0)).unwrap();

        assert!(fixed.is_resolved());
        assert_eq!(fixed.settings.entries()[0].value, AllocationValue::range(10.0, 60.0));
    }

    #[test]
    fn nothing_enabled_enables_default() {
        let filter = FilterSettings::new(FilterKind::SongDifficulty);

        let fixed = fix(&filter, Target::count(20.0)).unwrap();

        assert!(fixed.is_resolved());
        let entries = fixed.settings.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "easy");
        assert_eq!(entries[0].value, AllocationValue::fixed(20.0));
    }

    #[test]
    fn inverted_window_ends_at_present() {
        let window = VintageWindow::new(
            SeasonYear::new(2020, Season::Spring),
            SeasonYear::new(2001, Season::Winter),
        );
        let filter = FilterSettings::new(FilterKind::Vintage).with_window(
            "recent",
            window,
            AllocationValue::fixed(100.0),
        );

        let fixed = fix(&filter, Target::percent(100.0)).unwrap();

        assert!(fixed.is_resolved());
        assert_eq!(fixed.settings.categories[0].window.unwrap().to, present());
    }

    #[test]
    fn enabled_default_replaces_inverted_window() {
        let inverted = VintageWindow::new(
            SeasonYear::new(2030, Season::Spring),
            SeasonYear::new(2001, Season::Winter),
        );
        let mut filter = FilterSettings::new(FilterKind::Vintage);
        filter.categories.push(
            CategorySetting::disabled(FilterKind::Vintage.default_category()).with_window(inverted),
        );

        let fixed = fix(&filter, Target::percent(100.0)).unwrap();

        assert!(fixed.is_resolved());
        let category = &fixed.settings.categories[0];
        assert!(category.enabled);
        assert_eq!(category.window, Some(VintageWindow::all_time(present())));
    }

    #[test]
    fn enabled_default_keeps_valid_window() {
        let window = VintageWindow::new(
            SeasonYear::new(2010, Season::Spring),
            SeasonYear::new(2020, Season::Winter),
        );
        let mut filter = FilterSettings::new(FilterKind::Vintage);
        filter.categories.push(
            CategorySetting::disabled(FilterKind::Vintage.default_category()).with_window(window),
        );

        let fixed = fix(&filter, Target::percent(100.0)).unwrap();

        assert_eq!(fixed.settings.categories[0].window, Some(window));
    }

    #[test]
    fn window_starting_in_future_stays_unresolved() {
        let window = VintageWindow::new(
            SeasonYear::new(2030, Season::Spring),
            SeasonYear::new(2001, Season::Winter),
        );
        let filter = FilterSettings::new(FilterKind::Vintage).with_window(
            "future",
            window,
            AllocationValue::fixed(100.0),
        );

        let err = fix(&filter, Target::percent(100.0)).unwrap_err();
        assert!(matches!(
            err,
            QuickFixError::Unresolved(Infeasible::InvertedWindow { .. })
        ));

        let partial =
            quick_fix_partial(&FilterValidator::new(), &filter, Target::percent(100.0), present())
                .unwrap();
        assert!(!partial.is_resolved());
        assert_eq!(partial.validation.message, "vintage window 'future' starts after it ends");
    }

    #[test]
    fn valid_filter_is_not_touched() {
        let filter = FilterSettings::new(FilterKind::SongTypes).with_fixed("openings", 100.0);
        assert_eq!(
            fix(&filter, Target::percent(100.0)).unwrap_err(),
            QuickFixError::AlreadyValid
        );
    }

    #[test]
    fn ceiling_policy_does_not_top_up() {
        let filter = FilterSettings::new(FilterKind::SongTypes)
            .with_policy(MatchPolicy::AtMost)
            .with_fixed("openings", 120.0);

        let fixed = fix(&filter, Target::count(100.0)).unwrap();

        assert!(fixed.is_resolved());
        assert_eq!(fixed.settings.entries()[0].value, AllocationValue::fixed(100.0));
    }

    #[test]
    fn input_settings_are_not_mutated() {
        let filter = FilterSettings::new(FilterKind::SongTypes)
            .with_fixed("openings", 70.0)
            .with_fixed("endings", 50.0);
        let before = filter.clone();

        let _ = fix(&filter, Target::percent(100.0));

        assert_eq!(filter, before);
    }
}
