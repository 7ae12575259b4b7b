use async_trait::async_trait;
use log::{debug, error, info};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use hundred_days_domain::events::{DomainEvent, DynamicEventHandler, EventBus};
use hundred_days_domain::shared::DomainError;

/// Dispatches events in-process, in subscription order, before `publish`
/// returns. A failing handler is logged and does not stop the others.
pub struct InMemoryEventBus {
    handlers: Arc<RwLock<HashMap<&'static str, Vec<Arc<dyn DynamicEventHandler>>>>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Subscribe a handler to the event type it was built for
    pub async fn subscribe(&self, handler: Arc<dyn DynamicEventHandler>) {
        let event_type_name = handler.event_type_name();
        let mut handlers = self.handlers.write().await;
        handlers.entry(event_type_name).or_default().push(handler);

        info!("Subscribed handler for event type: {}", event_type_name);
    }

    pub async fn handler_count<E: DomainEvent + 'static>(&self) -> usize {
        let handlers = self.handlers.read().await;
        handlers
            .get(std::any::type_name::<E>())
            .map_or(0, |h| h.len())
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError> {
        let event_type_name = event.event_type_name();

        // Clone the list so handlers may publish without holding the lock
        let event_handlers = {
            let handlers = self.handlers.read().await;
            handlers.get(event_type_name).cloned().unwrap_or_default()
        };

        if event_handlers.is_empty() {
            debug!("No handlers registered for event type: {}", event_type_name);
            return Ok(());
        }

        debug!(
            "Publishing {} to {} handler(s)",
            event_type_name,
            event_handlers.len()
        );

        for handler in event_handlers {
            if let Err(e) = handler.handle_dynamic(event.as_any()).await {
                error!("Handler failed to process event {}: {}", event_type_name, e);
            }
        }

        Ok(())
    }
}
