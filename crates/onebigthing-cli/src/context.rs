//! Shared setup for command handlers.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};
use onebigthing_core::{
    Config, LocalEntitlementSource, SqliteStore, SubscriptionManager, SubscriptionStatus, Tracker,
};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub type Manager = SubscriptionManager<LocalEntitlementSource<Arc<SqliteStore>>, Arc<SqliteStore>>;

/// Wall-clock time, or the `--at` override.
pub fn now(at: Option<&str>) -> CliResult<DateTime<FixedOffset>> {
    match at {
        Some(ts) => DateTime::parse_from_rfc3339(ts)
            .map_err(|e| format!("invalid --at timestamp '{ts}': {e}").into()),
        None => Ok(Local::now().fixed_offset()),
    }
}

pub fn open_store() -> CliResult<Arc<SqliteStore>> {
    Ok(Arc::new(SqliteStore::open()?))
}

pub fn tracker(store: Arc<SqliteStore>, config: &Config) -> Tracker<Arc<SqliteStore>> {
    Tracker::from_config(store, config)
}

pub fn manager(store: Arc<SqliteStore>, config: &Config) -> Manager {
    let entitlement_id = config.subscription.entitlement_id.clone();
    SubscriptionManager::new(
        LocalEntitlementSource::new(store.clone(), entitlement_id.clone()),
        store,
        entitlement_id,
    )
}

pub fn runtime() -> CliResult<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Load the subscription tier the way the app does at startup.
pub fn current_status(store: Arc<SqliteStore>, config: &Config) -> CliResult<SubscriptionStatus> {
    let manager = manager(store, config);
    Ok(runtime()?.block_on(manager.initialize()))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
