//! Filter node settings
//!
//! Every numeric filter (song types, difficulty, anime type, vintage, ...)
//! shares one shape: a list of categories, each enabled or not, each holding a
//! fixed amount or a range. The filter kind only decides the category catalog.

use crate::entry::{AllocationEntry, AllocationValue};
use crate::mode::{AllocationMode, MatchPolicy};
use crate::vintage::{SeasonYear, VintageWindow};
use serde::{Deserialize, Serialize};

/// Kind of numeric filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Openings, endings, inserts
    SongTypes,
    /// Easy, medium, hard
    SongDifficulty,
    /// TV, movie, OVA, ONA, special
    AnimeType,
    /// Standard, instrumental, chanting, character
    SongCategories,
    /// Broadcast season windows
    Vintage,
    /// User-chosen genres
    Genres,
    /// User-chosen tags
    Tags,
}

impl FilterKind {
    /// Every filter kind
    pub const ALL: [Self; 7] = [
        Self::SongTypes,
        Self::SongDifficulty,
        Self::AnimeType,
        Self::SongCategories,
        Self::Vintage,
        Self::Genres,
        Self::Tags,
    ];

    /// Fixed category labels; empty for kinds with user-defined labels
    #[must_use]
    pub const fn catalog(&self) -> &'static [&'static str] {
        match self {
            Self::SongTypes => &["openings", "endings", "inserts"],
            Self::SongDifficulty => &["easy", "medium", "hard"],
            Self::AnimeType => &["tv", "movie", "ova", "ona", "special"],
            Self::SongCategories => &["standard", "instrumental", "chanting", "character"],
            Self::Vintage | Self::Genres | Self::Tags => &[],
        }
    }

    /// Category enabled when a filter has nothing enabled at all
    #[must_use]
    pub const fn default_category(&self) -> &'static str {
        match self {
            Self::SongTypes => "openings",
            Self::SongDifficulty => "easy",
            Self::AnimeType => "tv",
            Self::SongCategories => "standard",
            Self::Vintage => "all time",
            Self::Genres => "action",
            Self::Tags => "idol",
        }
    }

    /// Stable lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SongTypes => "song_types",
            Self::SongDifficulty => "song_difficulty",
            Self::AnimeType => "anime_type",
            Self::SongCategories => "song_categories",
            Self::Vintage => "vintage",
            Self::Genres => "genres",
            Self::Tags => "tags",
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One category inside a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySetting {
    /// Category key
    pub label: String,

    /// Whether the category takes part in the allocation
    pub enabled: bool,

    /// Configured amount
    pub value: AllocationValue,

    /// Season window (vintage filters only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<VintageWindow>,
}

impl CategorySetting {
    /// Disabled category with a zero amount
    #[must_use]
    pub fn disabled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: false,
            value: AllocationValue::fixed(0.0),
            window: None,
        }
    }

    /// Enabled category
    #[must_use]
    pub fn enabled(label: impl Into<String>, value: AllocationValue) -> Self {
        Self {
            label: label.into(),
            enabled: true,
            value,
            window: None,
        }
    }

    /// Attach a season window
    #[must_use]
    pub fn with_window(mut self, window: VintageWindow) -> Self {
        self.window = Some(window);
        self
    }
}

/// Settings of a numeric filter node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Which filter this is
    pub kind: FilterKind,

    /// Unit the filter asks for
    #[serde(default)]
    pub mode: AllocationMode,

    /// How the total must relate to the target
    #[serde(default)]
    pub policy: MatchPolicy,

    /// Categories in display order
    #[serde(default)]
    pub categories: Vec<CategorySetting>,
}

impl FilterSettings {
    /// Filter with every catalog category present but disabled
    #[must_use]
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            mode: AllocationMode::default(),
            policy: MatchPolicy::default(),
            categories: kind
                .catalog()
                .iter()
                .map(|label| CategorySetting::disabled(*label))
                .collect(),
        }
    }

    /// Set the unit
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: AllocationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the match policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable a category with a fixed amount, adding it if absent
    #[must_use]
    pub fn with_fixed(self, label: &str, value: f64) -> Self {
        self.with_value(label, AllocationValue::fixed(value))
    }

    /// Enable a category with a range, adding it if absent
    #[must_use]
    pub fn with_range(self, label: &str, min: f64, max: f64) -> Self {
        self.with_value(label, AllocationValue::range(min, max))
    }

    /// Enable a vintage window with an amount, adding it if absent
    #[must_use]
    pub fn with_window(mut self, label: &str, window: VintageWindow, value: AllocationValue) -> Self {
        let category = self.upsert(label);
        category.enabled = true;
        category.value = value;
        category.window = Some(window);
        self
    }

    /// Enable a category with an amount, adding it if absent
    #[must_use]
    pub fn with_value(mut self, label: &str, value: AllocationValue) -> Self {
        let category = self.upsert(label);
        category.enabled = true;
        category.value = value;
        self
    }

    /// Mutable access to a category, inserting a disabled one if absent
    pub fn upsert(&mut self, label: &str) -> &mut CategorySetting {
        let index = match self.categories.iter().position(|c| c.label == label) {
            Some(index) => index,
            None => {
                self.categories.push(CategorySetting::disabled(label));
                self.categories.len() - 1
            }
        };
        &mut self.categories[index]
    }

    /// Enabled categories in display order
    pub fn enabled(&self) -> impl Iterator<Item = &CategorySetting> {
        self.categories.iter().filter(|c| c.enabled)
    }

    /// Allocation entries for the enabled categories
    ///
    /// Values are copied as configured; invariants are checked by the rules.
    #[must_use]
    pub fn entries(&self) -> Vec<AllocationEntry> {
        self.enabled()
            .map(|c| AllocationEntry {
                label: c.label.clone(),
                value: c.value,
            })
            .collect()
    }

    /// First enabled category whose window starts after it ends
    #[must_use]
    pub fn first_inverted_window(&self) -> Option<&CategorySetting> {
        self.enabled()
            .find(|c| c.window.is_some_and(|w| w.is_inverted()))
    }

    /// Default category for the kind, as enabled by quick-fix
    #[must_use]
    pub fn default_category(&self, total: f64, present: SeasonYear) -> CategorySetting {
        let category = CategorySetting::enabled(
            self.kind.default_category(),
            AllocationValue::fixed(total),
        );
        match self.kind {
            FilterKind::Vintage => category.with_window(VintageWindow::all_time(present)),
            _ => category,
        }
    }
}
