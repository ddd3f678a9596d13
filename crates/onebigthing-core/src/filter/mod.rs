//! Subscription-gated history filtering.
//!
//! Free (and expired) users see the current Monday..Sunday week of history;
//! premium users see everything. All functions here are pure: the caller
//! passes `today` explicitly.

mod cache;
mod pager;

pub use cache::{CacheStats, FilterCache, FilterCacheKey};
pub use pager::HistoryPager;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::subscription::SubscriptionStatus;
use crate::task::DailyTask;
use crate::week::WeekBounds;

/// Number of current-week entries at which a free user is "full".
pub const FREE_TIER_WEEK_LIMIT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// When false, non-premium users get the unrestricted list too.
    pub limit_to_current_week: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            limit_to_current_week: true,
        }
    }
}

/// Aggregate used for upgrade prompts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoricalPreview {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub oldest_task_date: Option<DateTime<FixedOffset>>,
    pub newest_task_date: Option<DateTime<FixedOffset>>,
}

pub fn is_in_current_week(task: &DailyTask, today: NaiveDate) -> bool {
    WeekBounds::containing(today).contains(task.day())
}

/// Narrow `tasks` to what `status` may see. Order is preserved.
pub fn filter_tasks_by_subscription(
    tasks: &[DailyTask],
    status: SubscriptionStatus,
    options: FilterOptions,
    today: NaiveDate,
) -> Vec<DailyTask> {
    if status.is_premium() || !options.limit_to_current_week {
        return tasks.to_vec();
    }

    let week = WeekBounds::containing(today);
    tasks
        .iter()
        .filter(|t| week.contains(t.day()))
        .cloned()
        .collect()
}

pub fn current_week_task_count(tasks: &[DailyTask], today: NaiveDate) -> usize {
    let week = WeekBounds::containing(today);
    tasks.iter().filter(|t| week.contains(t.day())).count()
}

/// True when a non-premium user has filled the current week.
///
/// Drives upgrade prompts; it never blocks writes.
pub fn has_reached_free_tier_limit(
    tasks: &[DailyTask],
    status: SubscriptionStatus,
    today: NaiveDate,
) -> bool {
    if status.is_premium() {
        return false;
    }
    current_week_task_count(tasks, today) >= FREE_TIER_WEEK_LIMIT
}

pub fn historical_data_preview(tasks: &[DailyTask]) -> HistoricalPreview {
    HistoricalPreview {
        total_tasks: tasks.len(),
        completed_tasks: tasks.iter().filter(|t| t.completed).count(),
        oldest_task_date: tasks.iter().map(|t| t.date).min(),
        newest_task_date: tasks.iter().map(|t| t.date).max(),
    }
}
