//! Quiz-level song totals and the per-filter targets derived from them

use crate::error::ResolveError;
use quizflow_allocation::{AllocationMode, Target};
use quizflow_graph::{ConfigGraph, NodeCategory, NodeSettings, SongCount};
use serde::{Deserialize, Serialize};

/// Number of songs the quiz will hold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetTotal {
    /// Exact song count
    Exact(f64),

    /// Song count picked at sampling time
    Range {
        /// Fewest songs
        min: f64,
        /// Most songs
        max: f64,
    },
}

impl TargetTotal {
    /// Target from the first song count node in array order
    #[must_use]
    pub fn from_graph(graph: &ConfigGraph) -> Option<Self> {
        graph
            .nodes_of(NodeCategory::NumberOfSongs)
            .find_map(|node| match node.settings {
                NodeSettings::NumberOfSongs(SongCount::Fixed { count }) => {
                    Some(Self::Exact(f64::from(count)))
                }
                NodeSettings::NumberOfSongs(SongCount::Range { min, max }) => Some(Self::Range {
                    min: f64::from(min),
                    max: f64::from(max),
                }),
                _ => None,
            })
    }

    /// Reject negative, non-finite or inverted totals
    ///
    /// # Errors
    /// Returns [`ResolveError::InvalidTarget`] or
    /// [`ResolveError::InvertedTarget`].
    pub fn validate(&self) -> Result<(), ResolveError> {
        let check = |value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ResolveError::InvalidTarget(value))
            }
        };
        match *self {
            Self::Exact(count) => check(count),
            Self::Range { min, max } => {
                check(min)?;
                check(max)?;
                if min > max {
                    return Err(ResolveError::InvertedTarget { min, max });
                }
                Ok(())
            }
        }
    }

    /// Whether the count is only known as a range
    #[inline]
    #[must_use]
    pub const fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }

    /// Songs used for count math: the exact count, or the range maximum
    #[inline]
    #[must_use]
    pub const fn song_total(&self) -> f64 {
        match *self {
            Self::Exact(count) => count,
            Self::Range { max, .. } => max,
        }
    }

    /// Target a filter in `requested` mode resolves against
    ///
    /// A range total forces percentage mode, since no single count exists.
    #[must_use]
    pub fn effective(&self, requested: AllocationMode, percentage_total: f64) -> EffectiveTarget {
        let locked = requested == AllocationMode::Count && self.is_range();
        let target = match requested {
            AllocationMode::Count if !locked => Target::count(self.song_total()),
            _ => Target::percent(percentage_total),
        };
        EffectiveTarget {
            target,
            percentage_mode_locked: locked,
        }
    }
}

/// Target one filter is checked against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveTarget {
    /// Total and unit the filter must meet
    pub target: Target,

    /// Count mode was requested but overridden by a range total
    pub percentage_mode_locked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizflow_graph::ConfigNode;

    #[test]
    fn range_total_locks_count_mode() {
        let target = TargetTotal::Range { min: 10.0, max: 40.0 };
        let effective = target.effective(AllocationMode::Count, 100.0);

        assert!(effective.percentage_mode_locked);
        assert_eq!(effective.target, Target::percent(100.0));
    }

    #[test]
    fn exact_total_keeps_count_mode() {
        let effective = TargetTotal::Exact(20.0).effective(AllocationMode::Count, 100.0);

        assert!(!effective.percentage_mode_locked);
        assert_eq!(effective.target, Target::count(20.0));
    }

    #[test]
    fn count_math_uses_range_maximum() {
        let target = TargetTotal::Range { min: 10.0, max: 40.0 };

        assert_eq!(target.song_total(), 40.0);
        assert_eq!(TargetTotal::Exact(25.0).song_total(), 25.0);
    }

    #[test]
    fn percentage_mode_never_locked() {
        let target = TargetTotal::Range { min: 10.0, max: 40.0 };
        let effective = target.effective(AllocationMode::Percentage, 100.0);

        assert!(!effective.percentage_mode_locked);
    }

    #[test]
    fn invalid_totals_rejected() {
        assert!(matches!(
            TargetTotal::Exact(-1.0).validate(),
            Err(ResolveError::InvalidTarget(_))
        ));
        assert!(matches!(
            TargetTotal::Exact(f64::NAN).validate(),
            Err(ResolveError::InvalidTarget(_))
        ));
        assert!(matches!(
            TargetTotal::Range { min: 30.0, max: 10.0 }.validate(),
            Err(ResolveError::InvertedTarget { .. })
        ));
        assert!(TargetTotal::Range { min: 10.0, max: 10.0 }.validate().is_ok());
    }

    #[test]
    fn from_graph_reads_first_song_count() {
        let graph = ConfigGraph::from_parts(
            vec![
                ConfigNode::modifier("m"),
                ConfigNode::song_count("a", SongCount::Range { min: 10, max: 30 }),
                ConfigNode::song_count("b", SongCount::Fixed { count: 50 }),
            ],
            Vec::new(),
        )
        .unwrap();

        assert_eq!(
            TargetTotal::from_graph(&graph),
            Some(TargetTotal::Range { min: 10.0, max: 30.0 })
        );
        assert_eq!(TargetTotal::from_graph(&ConfigGraph::new()), None);
    }
}
