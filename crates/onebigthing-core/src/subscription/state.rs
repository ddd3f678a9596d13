use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription tier.
///
/// `Expired` is accepted from the cache and filtered like `Free`, but no
/// transition in this crate produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Free,
    Premium,
    Expired,
}

impl SubscriptionStatus {
    pub fn is_premium(&self) -> bool {
        matches!(self, SubscriptionStatus::Premium)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Free => "FREE",
            SubscriptionStatus::Premium => "PREMIUM",
            SubscriptionStatus::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of the in-memory entitlement cache.
///
/// ```text
/// Uninitialized -> Loading -> Ready
///                    ^          |
///                    +-refresh--+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPhase {
    Uninitialized,
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionState {
    pub status: SubscriptionStatus,
    pub last_updated: DateTime<Utc>,
    pub is_loaded: bool,
    pub phase: SubscriptionPhase,
}

impl SubscriptionState {
    /// Free tier, not yet loaded.
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            status: SubscriptionStatus::Free,
            last_updated: now,
            is_loaded: false,
            phase: SubscriptionPhase::Uninitialized,
        }
    }

    pub fn is_premium(&self) -> bool {
        self.status == SubscriptionStatus::Premium
    }

    pub fn is_free(&self) -> bool {
        self.status == SubscriptionStatus::Free
    }

    pub fn is_loading(&self) -> bool {
        self.phase != SubscriptionPhase::Ready
    }
}

/// On-disk form of the status cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSubscription {
    pub status: SubscriptionStatus,
    pub last_updated: DateTime<Utc>,
}
