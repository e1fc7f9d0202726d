use std::sync::Arc;

use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;

use crate::config::Settings;
use crate::dispatch::create_dispatch_adapter;
use crate::error::AppError;
use crate::hooks::{HookRegistry, SmsRoutingPlugin};
use crate::link::{HostLinkBuilder, SurveyLinkBuilder};
use crate::routing::NotificationRouter;
use crate::schema::SettingsRegistrar;
use crate::store::{create_settings_store, SettingsResolver, SettingsStore};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<dyn SettingsStore>,
    pub router: Arc<NotificationRouter>,
    pub registrar: SettingsRegistrar,
    pub hooks: Arc<HookRegistry>,
    pub provider_type: &'static str,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Build the state from configuration.
    ///
    /// `redis` is required for the `redis` store backend; without it the
    /// in-memory store is used. Fails on an unusable provider configuration.
    pub fn new(settings: Settings, redis: Option<ConnectionManager>) -> Result<Self, AppError> {
        let store = create_settings_store(&settings.store, redis);
        let link_builder: Arc<dyn SurveyLinkBuilder> =
            Arc::new(HostLinkBuilder::from_config(&settings.link));
        Self::with_components(settings, store, link_builder)
    }

    /// Build the state around an existing store and link builder.
    pub fn with_components(
        settings: Settings,
        store: Arc<dyn SettingsStore>,
        link_builder: Arc<dyn SurveyLinkBuilder>,
    ) -> Result<Self, AppError> {
        let dispatcher = create_dispatch_adapter(&settings.provider).map_err(|e| {
            AppError::Config(config::ConfigError::Message(format!("provider: {}", e)))
        })?;
        let dispatcher = Arc::new(dispatcher);
        let provider_type = dispatcher.provider_type();
        let resolver = SettingsResolver::new(store.clone());

        let router = Arc::new(NotificationRouter::new(
            resolver.clone(),
            link_builder,
            dispatcher,
        ));
        let registrar = SettingsRegistrar::new(resolver);

        let plugin = Arc::new(SmsRoutingPlugin::new(router.clone(), registrar.clone()));
        let mut hooks = HookRegistry::new();
        plugin.register_hooks(&mut hooks);

        Ok(Self {
            settings: Arc::new(settings),
            store,
            router,
            registrar,
            hooks: Arc::new(hooks),
            provider_type,
            started_at: Utc::now(),
        })
    }
}
