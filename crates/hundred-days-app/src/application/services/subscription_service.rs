use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::watch;

use hundred_days_domain::events::user_events::EntitlementChanged;
use hundred_days_domain::events::EventBus;
use hundred_days_domain::shared::{Clock, DomainError};
use hundred_days_domain::subscription::{Entitlement, Feature, PurchaseProvider, SubscriptionGate};

/// Holds the Pro flag and answers gate checks synchronously. Purchase and
/// restore go straight to the store; the flag follows whatever it reports.
pub struct SubscriptionService {
    provider: Arc<dyn PurchaseProvider>,
    event_bus: Arc<dyn EventBus>,
    clock: Arc<dyn Clock>,
    product_id: String,
    is_pro: watch::Sender<bool>,
}

impl SubscriptionService {
    pub fn new(
        provider: Arc<dyn PurchaseProvider>,
        event_bus: Arc<dyn EventBus>,
        clock: Arc<dyn Clock>,
        product_id: impl Into<String>,
    ) -> Self {
        let (is_pro, _) = watch::channel(false);
        Self {
            provider,
            event_bus,
            clock,
            product_id: product_id.into(),
            is_pro,
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn is_pro_user(&self) -> bool {
        *self.is_pro.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.is_pro.subscribe()
    }

    /// Fails with `EntitlementRequired` unless the user is Pro
    pub fn require(&self, feature: Feature) -> Result<(), DomainError> {
        SubscriptionGate::check(feature, self.is_pro_user(), u32::MAX)
    }

    /// Gate for adding one more active challenge on top of `active_challenges`
    pub fn require_challenge_slot(&self, active_challenges: u32) -> Result<(), DomainError> {
        SubscriptionGate::check(
            Feature::UnlimitedChallenges,
            self.is_pro_user(),
            active_challenges,
        )
    }

    pub async fn purchase(&self) -> Result<Entitlement, DomainError> {
        info!("[subscription] purchasing {}", self.product_id);
        let entitlement = self.provider.purchase(&self.product_id).await?;
        self.apply(&entitlement).await;
        Ok(entitlement)
    }

    pub async fn restore(&self) -> Result<Entitlement, DomainError> {
        info!("[subscription] restoring purchases for {}", self.product_id);
        let entitlement = self.provider.restore(&self.product_id).await?;
        self.apply(&entitlement).await;
        Ok(entitlement)
    }

    pub async fn refresh(&self) -> Result<Entitlement, DomainError> {
        let entitlement = self
            .provider
            .current_entitlement(&self.product_id)
            .await?;
        self.apply(&entitlement).await;
        Ok(entitlement)
    }

    async fn apply(&self, entitlement: &Entitlement) {
        let active = entitlement.is_active(self.clock.now());
        let changed = self.is_pro.send_if_modified(|current| {
            if *current == active {
                return false;
            }
            *current = active;
            true
        });

        if !changed {
            return;
        }

        info!("[subscription] Pro entitlement is now {}", active);
        let event = EntitlementChanged {
            is_pro: active,
            product_id: entitlement.product_id.clone(),
            occurred_at: Utc::now(),
        };
        if let Err(e) = self.event_bus.publish(Box::new(event)).await {
            warn!("[subscription] failed to publish entitlement change: {}", e);
        }
    }
}
