//! Subscription tier tracking.
//!
//! - [`SubscriptionManager`]: cached status, refresh/upgrade flows, change
//!   notifications
//! - [`EntitlementSource`]: the external service of record
//! - [`LocalEntitlementSource`]: offline source backed by the key-value store

mod entitlement;
mod manager;
mod state;

pub use entitlement::{
    CustomerInfo, EntitlementSource, LocalEntitlementSource, LOCAL_ENTITLEMENTS_KEY,
};
pub use manager::{
    SubscriptionManager, UpgradeOutcome, PREMIUM_PACKAGE_ID, SUBSCRIPTION_STORAGE_KEY,
};
pub use state::{CachedSubscription, SubscriptionPhase, SubscriptionState, SubscriptionStatus};
