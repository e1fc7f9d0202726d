//! The SMS routing plugin as a set of hook handlers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::routing::NotificationRouter;
use crate::schema::SettingsRegistrar;

use super::registry::{EventHandler, HookRegistry};
use super::types::{HookError, NotificationSendEvent, SettingsDisplayEvent, SettingsSubmitEvent};

/// Binds the router and the settings registrar to the host's hook points
pub struct SmsRoutingPlugin {
    router: Arc<NotificationRouter>,
    registrar: SettingsRegistrar,
}

impl SmsRoutingPlugin {
    pub fn new(router: Arc<NotificationRouter>, registrar: SettingsRegistrar) -> Self {
        Self { router, registrar }
    }

    /// Subscribe to all three hook points.
    pub fn register_hooks(self: &Arc<Self>, registry: &mut HookRegistry) {
        registry.register::<NotificationSendEvent>(self.clone());
        registry.register::<SettingsDisplayEvent>(self.clone());
        registry.register::<SettingsSubmitEvent>(self.clone());
        tracing::info!("SMS routing plugin registered");
    }
}

#[async_trait]
impl EventHandler<NotificationSendEvent> for SmsRoutingPlugin {
    fn name(&self) -> &'static str {
        "sms-routing"
    }

    async fn handle(&self, event: &mut NotificationSendEvent) -> Result<(), HookError> {
        let decision = self.router.route(&mut event.notification).await?;
        event.decision = Some(decision);
        Ok(())
    }
}

#[async_trait]
impl EventHandler<SettingsDisplayEvent> for SmsRoutingPlugin {
    fn name(&self) -> &'static str {
        "sms-routing"
    }

    async fn handle(&self, event: &mut SettingsDisplayEvent) -> Result<(), HookError> {
        let section = self.registrar.describe(&event.scope).await?;
        event.sections.push(section);
        Ok(())
    }
}

#[async_trait]
impl EventHandler<SettingsSubmitEvent> for SmsRoutingPlugin {
    fn name(&self) -> &'static str {
        "sms-routing"
    }

    async fn handle(&self, event: &mut SettingsSubmitEvent) -> Result<(), HookError> {
        let values = std::mem::take(&mut event.values);
        let report = self.registrar.submit(&event.scope, values).await?;
        event.reports.push(report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::dispatch::{create_dispatch_adapter, DispatchAdapter};
    use crate::config::ProviderConfig;
    use crate::routing::{NotificationEvent, RecipientRecord, RoutingDecision, RoutingError};
    use crate::schema::SchemaError;
    use crate::store::{MemorySettingsStore, Scope, SettingsResolver};

    fn registry() -> HookRegistry {
        let resolver = SettingsResolver::new(Arc::new(MemorySettingsStore::new()));
        let dispatcher: DispatchAdapter = create_dispatch_adapter(&ProviderConfig::default()).unwrap();
        let router = Arc::new(NotificationRouter::new(
            resolver.clone(),
            Arc::new(|sid: &str, token: &str| format!("http://host/{}/{}", sid, token)),
            Arc::new(dispatcher),
        ));
        let plugin = Arc::new(SmsRoutingPlugin::new(router, SettingsRegistrar::new(resolver)));

        let mut registry = HookRegistry::new();
        plugin.register_hooks(&mut registry);
        registry
    }

    fn submission(pairs: &[(&str, Option<&str>)]) -> BTreeMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[tokio::test]
    async fn test_submit_then_route_through_hooks() {
        let registry = registry();

        let mut submit = SettingsSubmitEvent::new(
            Scope::survey("7"),
            submission(&[("EnableSendSMS", Some("1")), ("MessageBody", None)]),
        );
        registry.fire(&mut submit).await.unwrap();
        assert_eq!(submit.reports.len(), 1);
        assert_eq!(submit.reports[0].written.len(), 2);

        let recipient = RecipientRecord::new("tk", "Ana", "Silva").with_routing_attribute("NA");
        let mut send = NotificationSendEvent::new(NotificationEvent::new("7", "invite", recipient));
        registry.fire(&mut send).await.unwrap();
        assert_eq!(send.decision, Some(RoutingDecision::EmailAllowed));
        assert!(!send.suppress_delivery());
    }

    #[tokio::test]
    async fn test_display_appends_section() {
        let registry = registry();
        let mut display = SettingsDisplayEvent::new(Scope::Global);
        registry.fire(&mut display).await.unwrap();

        assert_eq!(display.sections.len(), 1);
        assert_eq!(display.sections[0].name, "SmsInvites");
        assert_eq!(display.sections[0].settings.len(), 2);
    }

    #[tokio::test]
    async fn test_routing_error_surfaces() {
        let registry = registry();
        let mut submit = SettingsSubmitEvent::new(
            Scope::Global,
            submission(&[("EnableSendSMS", Some("1"))]),
        );
        registry.fire(&mut submit).await.unwrap();

        let recipient = RecipientRecord::new("tk", "Ana", "Silva");
        let mut send = NotificationSendEvent::new(NotificationEvent::new("9", "remind", recipient));
        let err = registry.fire(&mut send).await.unwrap_err();

        assert!(matches!(
            err,
            HookError::Routing(RoutingError::Configuration { .. })
        ));
        assert!(send.decision.is_none());
    }

    #[tokio::test]
    async fn test_invalid_submission_rejected() {
        let registry = registry();
        let mut submit = SettingsSubmitEvent::new(
            Scope::Global,
            submission(&[("EnableSendSMS", Some("yes"))]),
        );
        let err = registry.fire(&mut submit).await.unwrap_err();
        assert!(matches!(
            err,
            HookError::Schema(SchemaError::InvalidValue { .. })
        ));
    }
}
