//! Vintage windows over anime broadcast seasons

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broadcast season, in calendar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// January to March
    Winter,
    /// April to June
    Spring,
    /// July to September
    Summer,
    /// October to December
    Fall,
}

impl Season {
    /// Season containing a calendar month (1-12)
    #[must_use]
    pub fn of_month(month: u32) -> Self {
        match month {
            1..=3 => Self::Winter,
            4..=6 => Self::Spring,
            7..=9 => Self::Summer,
            _ => Self::Fall,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
        };
        f.write_str(name)
    }
}

/// A season of a given year; ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeasonYear {
    /// Calendar year
    pub year: i32,
    /// Season within the year
    pub season: Season,
}

impl SeasonYear {
    /// Earliest season the song pool covers
    pub const EARLIEST: Self = Self::new(1944, Season::Winter);

    /// Create season
    #[inline]
    #[must_use]
    pub const fn new(year: i32, season: Season) -> Self {
        Self { year, season }
    }

    /// Season containing a date
    #[must_use]
    pub fn of_date(date: NaiveDate) -> Self {
        Self::new(date.year(), Season::of_month(date.month()))
    }

    /// Season containing today (UTC)
    #[must_use]
    pub fn current() -> Self {
        Self::of_date(Utc::now().date_naive())
    }
}

impl fmt::Display for SeasonYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season, self.year)
    }
}

/// Inclusive range of seasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VintageWindow {
    /// First season (inclusive)
    pub from: SeasonYear,
    /// Last season (inclusive)
    pub to: SeasonYear,
}

impl VintageWindow {
    /// Create window
    #[inline]
    #[must_use]
    pub const fn new(from: SeasonYear, to: SeasonYear) -> Self {
        Self { from, to }
    }

    /// Window from the earliest season up to `present`
    #[must_use]
    pub const fn all_time(present: SeasonYear) -> Self {
        Self::new(SeasonYear::EARLIEST, present)
    }

    /// Whether the window starts after it ends
    #[inline]
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.from > self.to
    }
}

impl fmt::Display for VintageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasons_order_within_and_across_years() {
        let fall_2010 = SeasonYear::new(2010, Season::Fall);
        let winter_2011 = SeasonYear::new(2011, Season::Winter);
        let spring_2010 = SeasonYear::new(2010, Season::Spring);

        assert!(spring_2010 < fall_2010);
        assert!(fall_2010 < winter_2011);
    }

    #[test]
    fn season_of_date() {
        let date = NaiveDate::from_ymd_opt(2023, 8, 14).unwrap();
        assert_eq!(SeasonYear::of_date(date), SeasonYear::new(2023, Season::Summer));
    }

    #[test]
    fn inverted_window() {
        let window = VintageWindow::new(
            SeasonYear::new(2020, Season::Spring),
            SeasonYear::new(2019, Season::Fall),
        );
        assert!(window.is_inverted());
        assert_eq!(window.to_string(), "Spring 2020 - Fall 2019");
    }
}
