//! In-memory entitlement cache with change notifications.
//!
//! State lives in a `tokio::sync::watch` channel. Readers borrow the latest
//! value; interested parties call [`SubscriptionManager::subscribe`] and are
//! woken on every transition. No lock is held across an `.await`, so
//! overlapping refreshes simply overwrite each other with the same answer.

use chrono::Utc;
use tokio::sync::watch;

use super::entitlement::EntitlementSource;
use super::state::{CachedSubscription, SubscriptionPhase, SubscriptionState, SubscriptionStatus};
use crate::error::{CoreError, EntitlementError, StorageError};
use crate::storage::KeyValueStore;

pub const SUBSCRIPTION_STORAGE_KEY: &str = "subscription/status";

/// Package requested by [`SubscriptionManager::upgrade_to_premium`].
pub const PREMIUM_PACKAGE_ID: &str = "premium";

/// How an upgrade attempt ended when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// The designated entitlement is now active.
    Upgraded,
    /// Purchase went through but the entitlement is still inactive.
    NotEntitled,
    /// The user backed out. Nothing changed.
    Cancelled,
}

pub struct SubscriptionManager<E, S> {
    source: E,
    store: S,
    entitlement_id: String,
    state: watch::Sender<SubscriptionState>,
}

impl<E: EntitlementSource, S: KeyValueStore> SubscriptionManager<E, S> {
    pub fn new(source: E, store: S, entitlement_id: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SubscriptionState::initial(Utc::now()));
        Self {
            source,
            store,
            entitlement_id: entitlement_id.into(),
            state,
        }
    }

    pub fn source(&self) -> &E {
        &self.source
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SubscriptionState {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.state.borrow().status
    }

    pub fn is_premium(&self) -> bool {
        self.state.borrow().is_premium()
    }

    pub fn is_free(&self) -> bool {
        self.state.borrow().is_free()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SubscriptionState> {
        self.state.subscribe()
    }

    /// Status persisted by the last successful settle, if readable.
    pub fn cached_status(&self) -> Result<Option<CachedSubscription>, StorageError> {
        let Some(raw) = self.store.get(SUBSCRIPTION_STORAGE_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<CachedSubscription>(&raw) {
            Ok(cached) => Ok(Some(cached)),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed subscription cache");
                Ok(None)
            }
        }
    }

    /// Load status at startup. Never fails.
    ///
    /// Asks the entitlement source first. If the source is unreachable the
    /// last cached status is used, and free tier when there is none.
    pub async fn initialize(&self) -> SubscriptionStatus {
        self.begin_loading();

        match self.source.customer_info().await {
            Ok(info) => {
                let status = info.status_for(&self.entitlement_id);
                if let Err(e) = self.persist(status) {
                    tracing::warn!(error = %e, "could not cache subscription status");
                }
                self.settle(status);
                status
            }
            Err(e) => {
                let cached = self.cached_status().unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "could not read subscription cache");
                    None
                });
                let status = cached
                    .map(|c| c.status)
                    .unwrap_or(SubscriptionStatus::Free);
                tracing::warn!(error = %e, %status, "entitlement source unavailable");
                self.settle(status);
                status
            }
        }
    }

    /// Re-query the entitlement source.
    ///
    /// On failure the cached status is left as it was and the error is
    /// returned for the caller to report.
    pub async fn refresh_subscription_status(&self) -> Result<SubscriptionStatus, CoreError> {
        self.begin_loading();

        let result = match self.source.customer_info().await {
            Ok(info) => {
                let status = info.status_for(&self.entitlement_id);
                self.persist(status).map(|_| status).map_err(CoreError::from)
            }
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(status) => {
                self.settle(status);
                Ok(status)
            }
            Err(e) => {
                tracing::warn!(error = %e, "subscription refresh failed");
                self.settle_unchanged();
                Err(e)
            }
        }
    }

    /// Run the purchase flow for the premium package.
    ///
    /// A cancelled purchase is `Ok(UpgradeOutcome::Cancelled)`; any other
    /// failure is returned as an error. Either way the status is unchanged.
    pub async fn upgrade_to_premium(&self) -> Result<UpgradeOutcome, CoreError> {
        self.begin_loading();

        let info = match self.source.purchase_package(PREMIUM_PACKAGE_ID).await {
            Ok(info) => info,
            Err(EntitlementError::Cancelled) => {
                tracing::info!("upgrade cancelled by user");
                self.settle_unchanged();
                return Ok(UpgradeOutcome::Cancelled);
            }
            Err(e) => {
                tracing::warn!(error = %e, "upgrade failed");
                self.settle_unchanged();
                return Err(e.into());
            }
        };

        let status = info.status_for(&self.entitlement_id);
        if let Err(e) = self.persist(status) {
            self.settle_unchanged();
            return Err(e.into());
        }
        self.settle(status);

        if status.is_premium() {
            Ok(UpgradeOutcome::Upgraded)
        } else {
            Ok(UpgradeOutcome::NotEntitled)
        }
    }

    /// Persist and adopt the free tier.
    pub fn reset_to_free(&self) -> Result<(), CoreError> {
        self.persist(SubscriptionStatus::Free)?;
        self.settle(SubscriptionStatus::Free);
        Ok(())
    }

    fn persist(&self, status: SubscriptionStatus) -> Result<(), StorageError> {
        let cached = CachedSubscription {
            status,
            last_updated: Utc::now(),
        };
        let json = serde_json::to_string(&cached).map_err(|e| StorageError::Encode {
            key: SUBSCRIPTION_STORAGE_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(SUBSCRIPTION_STORAGE_KEY, &json)
    }

    fn begin_loading(&self) {
        self.state.send_modify(|state| state.phase = SubscriptionPhase::Loading);
    }

    fn settle(&self, status: SubscriptionStatus) {
        let previous = self.state.borrow().status;
        self.state.send_modify(|state| {
            state.status = status;
            state.last_updated = Utc::now();
            state.is_loaded = true;
            state.phase = SubscriptionPhase::Ready;
        });
        if previous != status {
            tracing::info!(%previous, current = %status, "subscription status changed");
        }
    }

    /// Leave Loading without touching the status.
    ///
    /// A manager that failed its very first load still counts as loaded on
    /// the free tier it started with.
    fn settle_unchanged(&self) {
        self.state.send_modify(|state| {
            state.is_loaded = true;
            state.phase = SubscriptionPhase::Ready;
        });
    }
}
