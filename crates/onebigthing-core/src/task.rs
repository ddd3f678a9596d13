//! The daily task record.
//!
//! A `DailyTask` is the user's one goal for a given calendar day. The
//! timestamp keeps the UTC offset it was recorded with, so the calendar day
//! a record belongs to does not shift when the device changes timezone.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTask {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub date: DateTime<FixedOffset>,
}

impl DailyTask {
    /// Create a new, incomplete task for the day containing `now`.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyTaskText`] if `text` is blank.
    pub fn new(text: &str, now: DateTime<FixedOffset>) -> Result<Self, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyTaskText);
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed: false,
            date: now,
        })
    }

    /// Calendar date this record belongs to. Time-of-day is ignored.
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.day() == day
    }

    /// Copy of this task with `completed` set.
    pub fn with_completed(&self, completed: bool) -> Self {
        Self {
            completed,
            ..self.clone()
        }
    }
}
