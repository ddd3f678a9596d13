//! Integration tests for tier gating across the tracker and subscription
//! manager sharing one store.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset};
use onebigthing_core::{
    FilterOptions, LocalEntitlementSource, SqliteStore, SubscriptionManager, SubscriptionStatus,
    TaskStore, Tracker, UpgradeOutcome,
};

fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

/// Two full weeks of completed goals ending on Sunday 2026-10-18.
fn seed(tracker: &mut Tracker<Arc<SqliteStore>>) -> DateTime<FixedOffset> {
    let start = at("2026-10-05T09:00:00+00:00");
    for i in 0..14 {
        let now = start + Duration::days(i);
        tracker.set_task(&format!("goal {i}"), now).unwrap();
        tracker.complete_task(true, now).unwrap();
    }
    start + Duration::days(13)
}

#[tokio::test]
async fn test_upgrade_unlocks_full_history() {
    let store = Arc::new(SqliteStore::open_memory().unwrap());
    let mut tracker = Tracker::new(TaskStore::new(store.clone()));
    let manager = SubscriptionManager::new(
        LocalEntitlementSource::new(store.clone(), "premium"),
        store.clone(),
        "premium",
    );

    let now = seed(&mut tracker);
    assert_eq!(manager.initialize().await, SubscriptionStatus::Free);

    let visible = tracker
        .visible_history(manager.status(), FilterOptions::default(), now)
        .unwrap();
    assert_eq!(visible.len(), 7);
    assert!(tracker.free_tier_limit_reached(manager.status(), now).unwrap());

    assert_eq!(
        manager.upgrade_to_premium().await.unwrap(),
        UpgradeOutcome::Upgraded
    );
    let visible = tracker
        .visible_history(manager.status(), FilterOptions::default(), now)
        .unwrap();
    assert_eq!(visible.len(), 14);
    assert!(!tracker.free_tier_limit_reached(manager.status(), now).unwrap());
}

#[tokio::test]
async fn test_premium_survives_restart_via_source() {
    let store = Arc::new(SqliteStore::open_memory().unwrap());
    {
        let manager = SubscriptionManager::new(
            LocalEntitlementSource::new(store.clone(), "premium"),
            store.clone(),
            "premium",
        );
        manager.initialize().await;
        manager.upgrade_to_premium().await.unwrap();
    }

    let manager = SubscriptionManager::new(
        LocalEntitlementSource::new(store.clone(), "premium"),
        store.clone(),
        "premium",
    );
    assert_eq!(manager.initialize().await, SubscriptionStatus::Premium);

    manager.source().revoke_all().unwrap();
    assert_eq!(
        manager.refresh_subscription_status().await.unwrap(),
        SubscriptionStatus::Free
    );
}

#[tokio::test]
async fn test_listener_sees_tier_change() {
    let store = Arc::new(SqliteStore::open_memory().unwrap());
    let manager = Arc::new(SubscriptionManager::new(
        LocalEntitlementSource::new(store.clone(), "premium"),
        store,
        "premium",
    ));
    manager.initialize().await;

    let mut rx = manager.subscribe();
    let watcher = tokio::spawn(async move {
        loop {
            if rx.changed().await.is_err() {
                return None;
            }
            let state = rx.borrow_and_update().clone();
            if state.is_premium() && !state.is_loading() {
                return Some(state.status);
            }
        }
    });

    manager.upgrade_to_premium().await.unwrap();
    let seen = tokio::time::timeout(std::time::Duration::from_secs(5), watcher)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seen, Some(SubscriptionStatus::Premium));
}

#[test]
fn test_preview_reflects_all_history() {
    let store = Arc::new(SqliteStore::open_memory().unwrap());
    let mut tracker = Tracker::new(TaskStore::new(store));
    seed(&mut tracker);
    let preview = tracker.preview().unwrap();
    assert_eq!(preview.total_tasks, 14);
    assert_eq!(preview.completed_tasks, 14);
    assert_eq!(
        preview.oldest_task_date.map(|d| d.date_naive()),
        Some(at("2026-10-05T09:00:00+00:00").date_naive())
    );
}
