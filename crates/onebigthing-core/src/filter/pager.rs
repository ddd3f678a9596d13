//! Incremental loading of long histories.

use crate::task::DailyTask;

/// Hands out a history list in fixed-size batches.
#[derive(Debug, Clone)]
pub struct HistoryPager {
    batch_size: usize,
    loaded: Vec<DailyTask>,
    has_more: bool,
}

impl HistoryPager {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            loaded: Vec::new(),
            has_more: true,
        }
    }

    pub fn loaded(&self) -> &[DailyTask] {
        &self.loaded
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Load the first batch of `all` immediately, discarding prior state.
    pub fn preload(&mut self, all: &[DailyTask]) {
        self.loaded = all.iter().take(self.batch_size).cloned().collect();
        self.has_more = all.len() > self.batch_size;
    }

    /// Append the next batch. Returns how many entries were added.
    pub fn load_more(&mut self, all: &[DailyTask]) -> usize {
        if !self.has_more {
            return 0;
        }
        let start = self.loaded.len().min(all.len());
        let end = (start + self.batch_size).min(all.len());
        let batch = &all[start..end];
        self.loaded.extend_from_slice(batch);
        if end >= all.len() {
            self.has_more = false;
        }
        batch.len()
    }

    pub fn reset(&mut self) {
        self.loaded.clear();
        self.has_more = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};

    fn history(len: i64) -> Vec<DailyTask> {
        let start = DateTime::parse_from_rfc3339("2026-10-18T09:00:00+00:00").unwrap();
        (0..len)
            .map(|i| DailyTask::new(&format!("day {i}"), start - Duration::days(i)).unwrap())
            .collect()
    }

    #[test]
    fn loads_in_batches_until_exhausted() {
        let all = history(45);
        let mut pager = HistoryPager::new(20);

        assert_eq!(pager.load_more(&all), 20);
        assert!(pager.has_more());
        assert_eq!(pager.load_more(&all), 20);
        assert_eq!(pager.load_more(&all), 5);
        assert!(!pager.has_more());
        assert_eq!(pager.load_more(&all), 0);
        assert_eq!(pager.loaded().len(), 45);
        assert_eq!(pager.loaded()[44].text, "day 44");
    }

    #[test]
    fn preload_takes_first_batch() {
        let all = history(25);
        let mut pager = HistoryPager::new(20);
        pager.preload(&all);
        assert_eq!(pager.loaded().len(), 20);
        assert!(pager.has_more());

        let mut pager = HistoryPager::new(20);
        pager.preload(&history(3));
        assert_eq!(pager.loaded().len(), 3);
        assert!(!pager.has_more());
    }

    #[test]
    fn reset_starts_over() {
        let all = history(5);
        let mut pager = HistoryPager::new(2);
        pager.load_more(&all);
        pager.reset();
        assert!(pager.loaded().is_empty());
        assert!(pager.has_more());
        assert_eq!(pager.load_more(&all), 2);
    }
}
