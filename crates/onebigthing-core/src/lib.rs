//! # One Big Thing Core Library
//!
//! Business logic for a "one big thing per day" habit tracker: the user sets
//! a single goal each day, ticks it off, and watches a weekly streak grow.
//! The CLI binary and any GUI shell are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Storage**: a string key-value store (SQLite or in-memory) holding the
//!   current task, a capped history and a legacy streak counter, plus a
//!   TOML configuration file
//! - **Streak Engine**: within-week completion vector and backward streak,
//!   with week-rollover memory
//! - **Data Filter**: tier-based history visibility, a bounded result cache
//!   and batch paging
//! - **Subscription**: entitlement cache refreshed from an external source,
//!   with change notifications
//!
//! ## Key Components
//!
//! - [`Tracker`]: daily task workflow
//! - [`TaskStore`]: persistence contract
//! - [`StreakEngine`]: streak computation
//! - [`SubscriptionManager`]: tier state machine

pub mod error;
pub mod filter;
pub mod storage;
pub mod streak;
pub mod subscription;
pub mod task;
pub mod tracker;
pub mod week;

pub use error::{ConfigError, CoreError, EntitlementError, StorageError, ValidationError};
pub use filter::{
    current_week_task_count, filter_tasks_by_subscription, has_reached_free_tier_limit,
    historical_data_preview, FilterCache, FilterOptions, HistoricalPreview, HistoryPager,
    FREE_TIER_WEEK_LIMIT,
};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore, TaskStore};
pub use streak::{StreakEngine, StreakSnapshot};
pub use subscription::{
    CustomerInfo, EntitlementSource, LocalEntitlementSource, SubscriptionManager,
    SubscriptionState, SubscriptionStatus, UpgradeOutcome,
};
pub use task::DailyTask;
pub use tracker::{TaskUpdate, Tracker};
pub use week::WeekBounds;
