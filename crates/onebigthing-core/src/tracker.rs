//! Daily task workflow.
//!
//! `Tracker` ties the pieces together the way the app screens use them:
//! read today's task, toggle it, append to history, recompute the streak,
//! then narrow history for display by tier.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};
use crate::filter::{
    has_reached_free_tier_limit, historical_data_preview, FilterCache, FilterOptions,
    HistoricalPreview,
};
use crate::storage::{Config, KeyValueStore, TaskStore};
use crate::streak::{StreakEngine, StreakSnapshot};
use crate::subscription::SubscriptionStatus;
use crate::task::DailyTask;
use crate::week::WeekBounds;

/// Result of toggling today's task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub task: DailyTask,
    pub streak: StreakSnapshot,
}

pub struct Tracker<S> {
    store: TaskStore<S>,
    engine: StreakEngine,
    cache: FilterCache,
}

impl<S: KeyValueStore> Tracker<S> {
    pub fn new(store: TaskStore<S>) -> Self {
        Self::with_cache(store, FilterCache::default())
    }

    pub fn with_cache(store: TaskStore<S>, cache: FilterCache) -> Self {
        Self {
            store,
            engine: StreakEngine::new(),
            cache,
        }
    }

    pub fn from_config(kv: S, config: &Config) -> Self {
        Self::with_cache(
            TaskStore::with_history_limit(kv, config.history.limit),
            FilterCache::from_config(&config.cache),
        )
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn cache(&self) -> &FilterCache {
        &self.cache
    }

    pub fn current_task(&self, now: DateTime<FixedOffset>) -> Result<Option<DailyTask>, CoreError> {
        Ok(self.store.get_current_task(now.date_naive())?)
    }

    /// Start a fresh goal for today, replacing any current one.
    ///
    /// If today already has a history entry (the replaced task was toggled),
    /// that entry is overwritten by the new, incomplete task and the streak
    /// is recomputed, so today no longer counts as done.
    pub fn set_task(
        &mut self,
        text: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<DailyTask, CoreError> {
        let task = DailyTask::new(text, now)?;
        let today = task.day();
        self.store.save_current_task(&task)?;

        if self.store.has_history_for(today)? {
            self.store.add_to_history(&task)?;
            self.cache.clear();
            let history = self.store.load_history()?;
            let streak = self.engine.compute(&history, today);
            self.store.save_streak(streak.streak)?;
            tracing::debug!(day = %today, "replaced today's history entry");
        }

        tracing::debug!(id = %task.id, day = %today, "set current task");
        Ok(task)
    }

    /// Mark today's task done or not done.
    ///
    /// The new state is written to the current slot and replaces today's
    /// history entry. Cached filter results are dropped.
    ///
    /// Completing forces today's weekly slot without a full reload; undoing
    /// recomputes from history. The resulting streak is mirrored into the
    /// legacy counter.
    pub fn complete_task(
        &mut self,
        completed: bool,
        now: DateTime<FixedOffset>,
    ) -> Result<TaskUpdate, CoreError> {
        let today = now.date_naive();
        let current = self
            .store
            .get_current_task(today)?
            .ok_or(ValidationError::NoCurrentTask { date: today })?;

        let task = current.with_completed(completed);
        self.store.save_current_task(&task)?;
        self.store.add_to_history(&task)?;
        self.cache.clear();

        let week_start = WeekBounds::containing(today).start;
        let streak = if completed && self.engine.week_start() == Some(week_start) {
            self.engine.update_weekly_completion(today)
        } else {
            let history = self.store.load_history()?;
            self.engine.compute(&history, today)
        };

        self.store.save_streak(streak.streak)?;
        tracing::debug!(id = %task.id, completed, streak = streak.streak, "toggled current task");
        Ok(TaskUpdate { task, streak })
    }

    /// Recompute the weekly vector and streak from stored history.
    pub fn refresh_streak(
        &mut self,
        now: DateTime<FixedOffset>,
    ) -> Result<StreakSnapshot, CoreError> {
        let history = self.store.load_history()?;
        Ok(self.engine.compute(&history, now.date_naive()))
    }

    /// Last snapshot without touching storage.
    pub fn engine(&self) -> &StreakEngine {
        &self.engine
    }

    /// Deduplicated history, newest first.
    pub fn history(&self) -> Result<Vec<DailyTask>, CoreError> {
        Ok(self.store.load_history()?)
    }

    /// History as `status` is allowed to see it.
    pub fn visible_history(
        &mut self,
        status: SubscriptionStatus,
        options: FilterOptions,
        now: DateTime<FixedOffset>,
    ) -> Result<Vec<DailyTask>, CoreError> {
        let history = self.store.load_history()?;
        Ok(self.cache.filter(
            &history,
            status,
            options,
            now.date_naive(),
            now.with_timezone(&Utc),
        ))
    }

    pub fn free_tier_limit_reached(
        &self,
        status: SubscriptionStatus,
        now: DateTime<FixedOffset>,
    ) -> Result<bool, CoreError> {
        let history = self.store.load_history()?;
        Ok(has_reached_free_tier_limit(&history, status, now.date_naive()))
    }

    pub fn preview(&self) -> Result<HistoricalPreview, CoreError> {
        let history = self.store.load_history()?;
        Ok(historical_data_preview(&history))
    }

    /// Erase all task data and forget derived state.
    pub fn reset(&mut self) -> Result<(), CoreError> {
        self.store.clear_all()?;
        self.engine.reset();
        self.cache.clear();
        Ok(())
    }
}
