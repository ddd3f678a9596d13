//! Entitlement source abstraction.
//!
//! The store SDK that knows whether the customer paid is an external
//! collaborator. The manager only needs two calls from it: current customer
//! info and "start a purchase".

use std::collections::BTreeSet;
use std::future::Future;

use serde::{Deserialize, Serialize};

use super::state::SubscriptionStatus;
use crate::error::{EntitlementError, StorageError};
use crate::storage::KeyValueStore;

pub const LOCAL_ENTITLEMENTS_KEY: &str = "subscription/local_entitlements";

/// Entitlements currently active for the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub active_entitlements: BTreeSet<String>,
}

impl CustomerInfo {
    pub fn with_entitlement(id: &str) -> Self {
        Self {
            active_entitlements: BTreeSet::from([id.to_string()]),
        }
    }

    pub fn is_active(&self, entitlement_id: &str) -> bool {
        self.active_entitlements.contains(entitlement_id)
    }

    /// Premium iff `entitlement_id` is active.
    pub fn status_for(&self, entitlement_id: &str) -> SubscriptionStatus {
        if self.is_active(entitlement_id) {
            SubscriptionStatus::Premium
        } else {
            SubscriptionStatus::Free
        }
    }
}

/// Service of record for subscription truth.
pub trait EntitlementSource: Send + Sync {
    fn customer_info(&self) -> impl Future<Output = Result<CustomerInfo, EntitlementError>> + Send;

    /// Start a purchase of `package_id`. A user who backs out reports
    /// [`EntitlementError::Cancelled`].
    fn purchase_package(
        &self,
        package_id: &str,
    ) -> impl Future<Output = Result<CustomerInfo, EntitlementError>> + Send;
}

/// Offline entitlement source that records grants in the key-value store.
///
/// Every purchase succeeds and grants `entitlement_id`. Used where no store
/// SDK is available, such as the CLI.
pub struct LocalEntitlementSource<S> {
    store: S,
    entitlement_id: String,
}

impl<S: KeyValueStore> LocalEntitlementSource<S> {
    pub fn new(store: S, entitlement_id: impl Into<String>) -> Self {
        Self {
            store,
            entitlement_id: entitlement_id.into(),
        }
    }

    fn load(&self) -> Result<CustomerInfo, StorageError> {
        let Some(raw) = self.store.get(LOCAL_ENTITLEMENTS_KEY)? else {
            return Ok(CustomerInfo::default());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring malformed local entitlements");
            CustomerInfo::default()
        }))
    }

    fn save(&self, info: &CustomerInfo) -> Result<(), StorageError> {
        let json = serde_json::to_string(info).map_err(|e| StorageError::Encode {
            key: LOCAL_ENTITLEMENTS_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(LOCAL_ENTITLEMENTS_KEY, &json)
    }

    /// Drop every locally granted entitlement.
    pub fn revoke_all(&self) -> Result<(), StorageError> {
        self.store.remove(LOCAL_ENTITLEMENTS_KEY)
    }
}

fn unavailable(err: StorageError) -> EntitlementError {
    EntitlementError::Unavailable(err.to_string())
}

impl<S: KeyValueStore> EntitlementSource for LocalEntitlementSource<S> {
    async fn customer_info(&self) -> Result<CustomerInfo, EntitlementError> {
        self.load().map_err(unavailable)
    }

    async fn purchase_package(&self, package_id: &str) -> Result<CustomerInfo, EntitlementError> {
        let mut info = self.load().map_err(unavailable)?;
        info.active_entitlements.insert(self.entitlement_id.clone());
        self.save(&info).map_err(unavailable)?;
        tracing::info!(package_id, entitlement = %self.entitlement_id, "granted local entitlement");
        Ok(info)
    }
}
