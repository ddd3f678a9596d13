//! Calendar week helpers.
//!
//! Weeks run Monday through Sunday everywhere in the crate. Slot indices
//! follow the same convention: Monday=0 .. Sunday=6.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of slots in a weekly completion vector.
pub const DAYS_PER_WEEK: usize = 7;

/// Inclusive Monday..=Sunday range containing a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekBounds {
    pub fn containing(day: NaiveDate) -> Self {
        let start = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }
}

/// Slot index of `day` within its week (Monday=0).
pub fn weekday_index(day: NaiveDate) -> usize {
    day.weekday().num_days_from_monday() as usize
}
