use std::sync::Arc;

use async_trait::async_trait;

use super::types::{
    HookError, HookPoint, NotificationSendEvent, SettingsDisplayEvent, SettingsSubmitEvent,
};

/// Handler for one hook event type
#[async_trait]
pub trait EventHandler<E: Send + 'static>: Send + Sync {
    /// Handler name for logging
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &mut E) -> Result<(), HookError>;
}

/// An event type bound to its hook point
pub trait HookEvent: Sized + Send + 'static {
    const POINT: HookPoint;

    fn handlers(registry: &HookRegistry) -> &[Arc<dyn EventHandler<Self>>];

    fn handlers_mut(registry: &mut HookRegistry) -> &mut Vec<Arc<dyn EventHandler<Self>>>;
}

/// Subscriptions per hook point
#[derive(Default)]
pub struct HookRegistry {
    notification_send: Vec<Arc<dyn EventHandler<NotificationSendEvent>>>,
    settings_display: Vec<Arc<dyn EventHandler<SettingsDisplayEvent>>>,
    settings_submit: Vec<Arc<dyn EventHandler<SettingsSubmitEvent>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<E: HookEvent>(&mut self, handler: Arc<dyn EventHandler<E>>) {
        tracing::debug!(hook = %E::POINT, handler = handler.name(), "Hook handler registered");
        E::handlers_mut(self).push(handler);
    }

    pub fn handler_count<E: HookEvent>(&self) -> usize {
        E::handlers(self).len()
    }

    /// Run the handlers for `E` in registration order.
    ///
    /// Stops at the first handler error.
    pub async fn fire<E: HookEvent>(&self, event: &mut E) -> Result<(), HookError> {
        for handler in E::handlers(self) {
            if let Err(e) = handler.handle(event).await {
                tracing::warn!(
                    hook = %E::POINT,
                    handler = handler.name(),
                    error = %e,
                    "Hook handler failed"
                );
                return Err(e);
            }
        }
        Ok(())
    }
}

impl HookEvent for NotificationSendEvent {
    const POINT: HookPoint = HookPoint::BeforeNotificationSend;

    fn handlers(registry: &HookRegistry) -> &[Arc<dyn EventHandler<Self>>] {
        &registry.notification_send
    }

    fn handlers_mut(registry: &mut HookRegistry) -> &mut Vec<Arc<dyn EventHandler<Self>>> {
        &mut registry.notification_send
    }
}

impl HookEvent for SettingsDisplayEvent {
    const POINT: HookPoint = HookPoint::BeforeSettingsDisplay;

    fn handlers(registry: &HookRegistry) -> &[Arc<dyn EventHandler<Self>>] {
        &registry.settings_display
    }

    fn handlers_mut(registry: &mut HookRegistry) -> &mut Vec<Arc<dyn EventHandler<Self>>> {
        &mut registry.settings_display
    }
}

impl HookEvent for SettingsSubmitEvent {
    const POINT: HookPoint = HookPoint::OnSettingsSubmit;

    fn handlers(registry: &HookRegistry) -> &[Arc<dyn EventHandler<Self>>] {
        &registry.settings_submit
    }

    fn handlers_mut(registry: &mut HookRegistry) -> &mut Vec<Arc<dyn EventHandler<Self>>> {
        &mut registry.settings_submit
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::schema::SchemaError;
    use crate::store::Scope;

    struct Counter {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl EventHandler<SettingsDisplayEvent> for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        async fn handle(&self, _event: &mut SettingsDisplayEvent) -> Result<(), HookError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SchemaError::UnknownKey("x".to_string()).into());
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_fire_without_handlers() {
        let registry = HookRegistry::new();
        let mut event = SettingsDisplayEvent::new(Scope::Global);
        registry.fire(&mut event).await.unwrap();
        assert!(event.sections.is_empty());
    }

    #[tokio::test]
    async fn test_fire_stops_at_first_error() {
        let failing = Arc::new(Counter {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let after = Arc::new(Counter {
            calls: AtomicUsize::new(0),
            fail: false,
        });

        let mut registry = HookRegistry::new();
        registry.register::<SettingsDisplayEvent>(failing.clone());
        registry.register::<SettingsDisplayEvent>(after.clone());
        assert_eq!(registry.handler_count::<SettingsDisplayEvent>(), 2);
        assert_eq!(registry.handler_count::<SettingsSubmitEvent>(), 0);

        let mut event = SettingsDisplayEvent::new(Scope::Global);
        assert!(registry.fire(&mut event).await.is_err());
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert_eq!(after.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_hook_point_names() {
        assert_eq!(
            NotificationSendEvent::POINT.as_str(),
            "before-notification-send"
        );
        assert_eq!(SettingsDisplayEvent::POINT.as_str(), "before-settings-display");
        assert_eq!(SettingsSubmitEvent::POINT.as_str(), "on-settings-submit");
    }
}
