use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::DomainError;

/// Active challenges a free account may hold at once
pub const FREE_ACTIVE_CHALLENGE_LIMIT: u32 = 3;

pub const DEFAULT_PRODUCT_ID: &str = "hundred_days_pro_monthly";

/// Premium capabilities behind the Pro entitlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    UnlimitedChallenges,
    AdvancedAnalytics,
    PhotoCheckIns,
}

impl Feature {
    pub fn label(&self) -> &'static str {
        match self {
            Feature::UnlimitedChallenges => "unlimited challenges",
            Feature::AdvancedAnalytics => "advanced analytics",
            Feature::PhotoCheckIns => "photo check-ins",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Entitlement state as reported by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    pub is_pro: bool,
    pub product_id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Entitlement {
    pub fn free(product_id: &str) -> Self {
        Self {
            is_pro: false,
            product_id: product_id.to_string(),
            expires_at: None,
        }
    }

    /// Pro and not past its expiry
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.is_pro && self.expires_at.is_none_or(|expires| expires > now)
    }
}

pub struct SubscriptionGate;

impl SubscriptionGate {
    /// Decide whether a premium action may proceed.
    ///
    /// `active_challenges` only matters for `UnlimitedChallenges`: free accounts
    /// may still create challenges until they reach the limit.
    pub fn check(
        feature: Feature,
        is_pro: bool,
        active_challenges: u32,
    ) -> Result<(), DomainError> {
        if is_pro {
            return Ok(());
        }

        match feature {
            Feature::UnlimitedChallenges if active_challenges < FREE_ACTIVE_CHALLENGE_LIMIT => {
                Ok(())
            }
            Feature::UnlimitedChallenges => Err(DomainError::EntitlementRequired(format!(
                "Free accounts can keep {} active challenges; upgrade for {}",
                FREE_ACTIVE_CHALLENGE_LIMIT, feature
            ))),
            _ => Err(DomainError::EntitlementRequired(format!(
                "Upgrade to Pro to use {}",
                feature
            ))),
        }
    }
}

/// Platform in-app purchase API. Purchase and restore are keyed by a fixed
/// product identifier; everything else is the store's business.
#[async_trait]
pub trait PurchaseProvider: Send + Sync {
    async fn purchase(&self, product_id: &str) -> Result<Entitlement, DomainError>;

    async fn restore(&self, product_id: &str) -> Result<Entitlement, DomainError>;

    async fn current_entitlement(&self, product_id: &str) -> Result<Entitlement, DomainError>;
}
