//! Persistence of the current task, task history and legacy streak counter.
//!
//! Layout inside the key-value store:
//! - `current_task`: JSON `DailyTask`
//! - `task_history`: JSON array of `DailyTask`, newest first, one per day
//! - `streak`: integer as text
//!
//! Records that fail to decode are treated as absent rather than fatal.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::KeyValueStore;
use crate::error::StorageError;
use crate::task::DailyTask;

pub const CURRENT_TASK_KEY: &str = "current_task";
pub const HISTORY_KEY: &str = "task_history";
pub const STREAK_KEY: &str = "streak";

/// Maximum number of history entries kept unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

pub struct TaskStore<S> {
    store: S,
    history_limit: usize,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_history_limit(store, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(store: S, history_limit: usize) -> Self {
        Self {
            store,
            history_limit: history_limit.max(1),
        }
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Returns the stored task only if it belongs to `today`.
    ///
    /// A task left over from a previous day is reported as absent; it is
    /// not migrated or deleted.
    pub fn get_current_task(&self, today: NaiveDate) -> Result<Option<DailyTask>, StorageError> {
        let Some(raw) = self.store.get(CURRENT_TASK_KEY)? else {
            return Ok(None);
        };
        let task = match serde_json::from_str::<DailyTask>(&raw) {
            Ok(task) => task,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed current task record");
                return Ok(None);
            }
        };
        if task.is_on(today) {
            Ok(Some(task))
        } else {
            tracing::debug!(stored = %task.day(), %today, "current task is stale");
            Ok(None)
        }
    }

    pub fn save_current_task(&self, task: &DailyTask) -> Result<(), StorageError> {
        let json = encode(CURRENT_TASK_KEY, task)?;
        self.store.set(CURRENT_TASK_KEY, &json)
    }

    pub fn clear_current_task(&self) -> Result<(), StorageError> {
        self.store.remove(CURRENT_TASK_KEY)
    }

    /// Prepends `task` and drops the oldest entries beyond the history limit.
    ///
    /// Any entry already recorded for the same calendar day is replaced, so
    /// toggling today's task repeatedly never evicts earlier days.
    pub fn add_to_history(&self, task: &DailyTask) -> Result<(), StorageError> {
        let mut history = self.get_history()?;
        let day = task.day();
        history.retain(|t| !t.is_on(day));
        history.insert(0, task.clone());
        if history.len() > self.history_limit {
            let evicted = history.len() - self.history_limit;
            history.truncate(self.history_limit);
            tracing::debug!(evicted, "history trimmed to limit");
        }
        let json = encode(HISTORY_KEY, &history)?;
        self.store.set(HISTORY_KEY, &json)
    }

    /// Raw history, newest first, exactly as stored.
    ///
    /// Callers that display or aggregate history should use
    /// [`TaskStore::load_history`] instead.
    pub fn get_history(&self) -> Result<Vec<DailyTask>, StorageError> {
        let Some(raw) = self.store.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<DailyTask>>(&raw) {
            Ok(history) => Ok(history),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed task history record");
                Ok(Vec::new())
            }
        }
    }

    /// Whether raw history holds an entry for `day`.
    pub fn has_history_for(&self, day: NaiveDate) -> Result<bool, StorageError> {
        Ok(self.get_history()?.iter().any(|t| t.is_on(day)))
    }

    /// History with at most one entry per calendar day.
    ///
    /// Writers already keep one entry per day; this also cleans up lists
    /// written by older versions.
    pub fn load_history(&self) -> Result<Vec<DailyTask>, StorageError> {
        Ok(dedupe_by_day(self.get_history()?))
    }

    /// Legacy all-time counter. Unreadable values read as 0.
    pub fn get_streak(&self) -> Result<u32, StorageError> {
        let Some(raw) = self.store.get(STREAK_KEY)? else {
            return Ok(0);
        };
        match raw.trim().parse::<u32>() {
            Ok(n) => Ok(n),
            Err(_) => {
                tracing::warn!(value = %raw, "ignoring malformed streak counter");
                Ok(0)
            }
        }
    }

    pub fn save_streak(&self, count: u32) -> Result<(), StorageError> {
        self.store.set(STREAK_KEY, &count.to_string())
    }

    /// Erase current task, history and streak counter. Irreversible.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        for key in [CURRENT_TASK_KEY, HISTORY_KEY, STREAK_KEY] {
            self.store.remove(key)?;
        }
        tracing::info!("cleared all task data");
        Ok(())
    }
}

/// Keep the first entry seen for each calendar day, preserving order.
pub fn dedupe_by_day(tasks: Vec<DailyTask>) -> Vec<DailyTask> {
    let mut seen = HashSet::new();
    tasks.into_iter().filter(|t| seen.insert(t.day())).collect()
}

fn encode<T: serde::Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::Encode {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{DateTime, Duration, FixedOffset};
    use std::sync::Arc;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn task(text: &str, date: &str, completed: bool) -> DailyTask {
        DailyTask::new(text, at(date)).unwrap().with_completed(completed)
    }

    #[test]
    fn current_task_only_returned_for_its_day() {
        let store = TaskStore::new(MemoryStore::new());
        let t = task("Write report", "2026-10-12T09:00:00+00:00", false);
        store.save_current_task(&t).unwrap();

        assert_eq!(store.get_current_task(t.day()).unwrap().as_ref(), Some(&t));
        let tomorrow = t.day() + Duration::days(1);
        assert!(store.get_current_task(tomorrow).unwrap().is_none());
    }

    #[test]
    fn clear_current_task_removes_slot() {
        let store = TaskStore::new(MemoryStore::new());
        let t = task("Write report", "2026-10-12T09:00:00+00:00", false);
        store.save_current_task(&t).unwrap();
        store.clear_current_task().unwrap();
        assert!(store.get_current_task(t.day()).unwrap().is_none());
    }

    #[test]
    fn history_is_newest_first_and_capped() {
        let store = TaskStore::new(MemoryStore::new());
        let start = at("2026-09-01T08:00:00+00:00");
        for i in 0..30 {
            let t = DailyTask::new(&format!("day {i}"), start + Duration::days(i)).unwrap();
            store.add_to_history(&t).unwrap();
        }
        assert_eq!(store.get_history().unwrap().len(), 30);

        let newest = DailyTask::new("day 30", start + Duration::days(30)).unwrap();
        store.add_to_history(&newest).unwrap();

        let history = store.get_history().unwrap();
        assert_eq!(history.len(), 30);
        assert_eq!(history[0].text, "day 30");
        assert_eq!(history[29].text, "day 1");
        assert!(history.iter().all(|t| t.text != "day 0"));
    }

    #[test]
    fn load_history_keeps_first_entry_per_day() {
        let kv = Arc::new(MemoryStore::new());
        let raw = vec![
            task("Tuesday", "2026-10-13T09:00:00+00:00", true),
            task("Evening", "2026-10-12T20:00:00+00:00", true),
            task("Morning", "2026-10-12T07:00:00+00:00", false),
        ];
        kv.set(HISTORY_KEY, &serde_json::to_string(&raw).unwrap()).unwrap();
        let store = TaskStore::new(kv);

        assert_eq!(store.get_history().unwrap().len(), 3);
        let history = store.load_history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text, "Tuesday");
        assert_eq!(history[1].text, "Evening");
    }

    #[test]
    fn add_to_history_replaces_same_day_entry() {
        let store = TaskStore::new(MemoryStore::new());
        let monday = task("Write report", "2026-10-12T09:00:00+00:00", true);
        store.add_to_history(&monday).unwrap();

        let tuesday = task("Call the bank", "2026-10-13T09:00:00+00:00", false);
        for completed in [true, false, true] {
            store.add_to_history(&tuesday.with_completed(completed)).unwrap();
        }

        let history = store.get_history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, tuesday.id);
        assert!(history[0].completed);
        assert_eq!(history[1], monday);
        assert!(store.has_history_for(monday.day()).unwrap());
        assert!(!store.has_history_for(monday.day() - Duration::days(1)).unwrap());
    }

    #[test]
    fn toggling_today_keeps_past_days_under_cap() {
        let store = TaskStore::new(MemoryStore::new());
        let start = at("2026-10-01T08:00:00+00:00");
        for i in 0..10 {
            let t = DailyTask::new(&format!("day {i}"), start + Duration::days(i)).unwrap();
            store.add_to_history(&t.with_completed(true)).unwrap();
        }

        let today = DailyTask::new("today", start + Duration::days(10)).unwrap();
        for i in 0..30 {
            store.add_to_history(&today.with_completed(i % 2 == 0)).unwrap();
        }

        let history = store.get_history().unwrap();
        assert_eq!(history.len(), 11);
        assert_eq!(history[0].id, today.id);
        assert_eq!(history[10].text, "day 0");
    }

    #[test]
    fn malformed_records_read_as_empty() {
        let kv = MemoryStore::new();
        kv.set(CURRENT_TASK_KEY, "{not json").unwrap();
        kv.set(HISTORY_KEY, "[1, 2").unwrap();
        kv.set(STREAK_KEY, "many").unwrap();
        let store = TaskStore::new(kv);

        let today = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        assert!(store.get_current_task(today).unwrap().is_none());
        assert!(store.get_history().unwrap().is_empty());
        assert_eq!(store.get_streak().unwrap(), 0);
    }

    #[test]
    fn streak_counter_round_trips() {
        let store = TaskStore::new(MemoryStore::new());
        assert_eq!(store.get_streak().unwrap(), 0);
        store.save_streak(5).unwrap();
        assert_eq!(store.get_streak().unwrap(), 5);
    }

    #[test]
    fn clear_all_erases_everything() {
        let store = TaskStore::new(MemoryStore::new());
        let t = task("Write report", "2026-10-12T09:00:00+00:00", true);
        store.save_current_task(&t).unwrap();
        store.add_to_history(&t).unwrap();
        store.save_streak(1).unwrap();

        store.clear_all().unwrap();

        assert!(store.get_current_task(t.day()).unwrap().is_none());
        assert!(store.get_history().unwrap().is_empty());
        assert_eq!(store.get_streak().unwrap(), 0);
    }

    #[test]
    fn custom_history_limit() {
        let store = TaskStore::with_history_limit(MemoryStore::new(), 2);
        let start = at("2026-10-01T08:00:00+00:00");
        for i in 0..5 {
            let t = DailyTask::new(&format!("day {i}"), start + Duration::days(i)).unwrap();
            store.add_to_history(&t).unwrap();
        }
        let history = store.get_history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text, "day 4");
    }
}
