//! Bounded cache of filtered history lists.
//!
//! Entries are keyed by a cheap fingerprint of the input list rather than
//! its contents, so a miss is always a safe fallback: the caller simply
//! recomputes. Expired entries count as misses. When full, the entry with
//! the oldest insertion time is evicted.

use std::collections::HashMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{filter_tasks_by_subscription, FilterOptions};
use crate::storage::CacheConfig;
use crate::subscription::SubscriptionStatus;
use crate::task::DailyTask;
use crate::week::WeekBounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterCacheKey {
    pub status: SubscriptionStatus,
    pub limit_to_current_week: bool,
    pub len: usize,
    pub first_date: Option<DateTime<FixedOffset>>,
    pub week_start: NaiveDate,
}

impl FilterCacheKey {
    pub fn new(
        tasks: &[DailyTask],
        status: SubscriptionStatus,
        options: FilterOptions,
        today: NaiveDate,
    ) -> Self {
        Self {
            status,
            limit_to_current_week: options.limit_to_current_week,
            len: tasks.len(),
            first_date: tasks.first().map(|t| t.date),
            week_start: WeekBounds::containing(today).start,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedEntry {
    tasks: Vec<DailyTask>,
    inserted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterCache {
    entries: HashMap<FilterCacheKey, CachedEntry>,
    capacity: usize,
    ttl: Duration,
    enabled: bool,
    hits: u64,
    misses: u64,
}

impl FilterCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            ttl,
            enabled: true,
            hits: 0,
            misses: 0,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        let ttl_secs = config.ttl_secs.min(u64::from(u32::MAX)) as i64;
        let mut cache = Self::new(config.capacity, Duration::seconds(ttl_secs));
        cache.enabled = config.enabled;
        cache
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        let mut cache = Self::new(1, Duration::zero());
        cache.enabled = false;
        cache
    }

    pub fn get(&mut self, key: &FilterCacheKey, now: DateTime<Utc>) -> Option<Vec<DailyTask>> {
        if !self.enabled {
            return None;
        }
        let fresh = self
            .entries
            .get(key)
            .map(|entry| now - entry.inserted_at < self.ttl);
        match fresh {
            Some(true) => {
                self.hits += 1;
                self.entries.get(key).map(|entry| entry.tasks.clone())
            }
            Some(false) => {
                self.entries.remove(key);
                self.misses += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: FilterCacheKey, tasks: Vec<DailyTask>, now: DateTime<Utc>) {
        if !self.enabled {
            return;
        }
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                if !self.evict_oldest() {
                    break;
                }
            }
        }
        self.entries.insert(
            key,
            CachedEntry {
                tasks,
                inserted_at: now,
            },
        );
    }

    /// Cached equivalent of [`filter_tasks_by_subscription`].
    pub fn filter(
        &mut self,
        tasks: &[DailyTask],
        status: SubscriptionStatus,
        options: FilterOptions,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Vec<DailyTask> {
        let key = FilterCacheKey::new(tasks, status, options, today);
        if let Some(cached) = self.get(&key, now) {
            return cached;
        }
        let filtered = filter_tasks_by_subscription(tasks, status, options, today);
        self.insert(key, filtered.clone(), now);
        filtered
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }

    fn evict_oldest(&mut self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted_at)
            .map(|(key, _)| *key);
        match oldest {
            Some(key) => {
                self.entries.remove(&key);
                true
            }
            None => false,
        }
    }
}

impl Default for FilterCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime, TimeZone};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    fn entry(day: NaiveDate) -> DailyTask {
        let date = day
            .and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap())
            .and_local_timezone(FixedOffset::east_opt(0).unwrap())
            .unwrap();
        DailyTask::new("goal", date).unwrap()
    }

    fn history(len: i64) -> Vec<DailyTask> {
        (0..len)
            .map(|i| entry(monday() + Duration::days(6) - Duration::days(i)))
            .collect()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 12, 12, 0, 0).unwrap()
    }

    fn key(tasks: &[DailyTask], status: SubscriptionStatus, today: NaiveDate) -> FilterCacheKey {
        FilterCacheKey::new(tasks, status, FilterOptions::default(), today)
    }

    fn filter_free(cache: &mut FilterCache, tasks: &[DailyTask]) -> Vec<DailyTask> {
        let options = FilterOptions::default();
        cache.filter(tasks, SubscriptionStatus::Free, options, monday(), t0())
    }

    #[test]
    fn second_lookup_hits() {
        let mut cache = FilterCache::new(10, Duration::minutes(5));
        let tasks = history(10);

        let first = filter_free(&mut cache, &tasks);
        let second = filter_free(&mut cache, &tasks);

        assert_eq!(first, second);
        assert_eq!(first.len(), 7);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn expired_entries_miss() {
        let mut cache = FilterCache::new(10, Duration::minutes(5));
        let tasks = history(3);
        let key = key(&tasks, SubscriptionStatus::Free, monday());
        cache.insert(key, tasks.clone(), t0());

        assert!(cache.get(&key, t0() + Duration::minutes(4)).is_some());
        assert!(cache.get(&key, t0() + Duration::minutes(5)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut cache = FilterCache::new(2, Duration::minutes(5));
        let keys: Vec<FilterCacheKey> = (1..=3)
            .map(|n| key(&history(n), SubscriptionStatus::Premium, monday()))
            .collect();

        cache.insert(keys[0], Vec::new(), t0());
        cache.insert(keys[1], Vec::new(), t0() + Duration::seconds(1));
        cache.insert(keys[2], Vec::new(), t0() + Duration::seconds(2));

        assert_eq!(cache.len(), 2);
        let now = t0() + Duration::seconds(3);
        assert!(cache.get(&keys[0], now).is_none());
        assert!(cache.get(&keys[1], now).is_some());
        assert!(cache.get(&keys[2], now).is_some());
    }

    #[test]
    fn status_and_week_are_part_of_the_key() {
        let tasks = history(5);
        let free = key(&tasks, SubscriptionStatus::Free, monday());
        let premium = key(&tasks, SubscriptionStatus::Premium, monday());
        let next_week = key(&tasks, SubscriptionStatus::Free, monday() + Duration::days(7));
        assert_ne!(free, premium);
        assert_ne!(free, next_week);
    }

    #[test]
    fn disabled_cache_always_recomputes() {
        let mut cache = FilterCache::disabled();
        let tasks = history(10);
        let a = filter_free(&mut cache, &tasks);
        let b = filter_free(&mut cache, &tasks);
        assert_eq!(a, b);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits, 0);
    }
}
