//! Settings schema registrar: describes the plugin's settings with their
//! effective values and persists submitted values.

use std::collections::BTreeMap;

use crate::metrics::SettingsMetrics;
use crate::store::{Scope, SettingsResolver};

use super::types::{
    SchemaResult, SettingKey, SettingsSection, SubmitReport, WrittenSetting,
};

/// Name under which the settings section is published
pub const PLUGIN_NAME: &str = "SmsInvites";

/// Exposes the SMS routing settings to an administration surface
#[derive(Clone)]
pub struct SettingsRegistrar {
    resolver: SettingsResolver,
}

impl SettingsRegistrar {
    pub fn new(resolver: SettingsResolver) -> Self {
        Self { resolver }
    }

    /// Schema with effective values for `scope`.
    ///
    /// For a survey the current value is survey → global → default; for the
    /// global page it is global → default.
    #[tracing::instrument(name = "registrar.describe", skip(self, scope), fields(scope = %scope))]
    pub async fn describe(&self, scope: &Scope) -> SchemaResult<SettingsSection> {
        let mut settings = Vec::with_capacity(SettingKey::ALL.len());

        for key in SettingKey::ALL {
            let current = self
                .resolver
                .resolve(key.as_str(), scope, key.default_value())
                .await?;
            settings.push(key.descriptor(current));
        }

        Ok(SettingsSection {
            name: PLUGIN_NAME.to_string(),
            settings,
        })
    }

    /// Persist submitted values at `scope`.
    ///
    /// Every key is validated before anything is written. A missing input
    /// (`None`) is pre-filled with the inherited value: global-or-default for
    /// a survey, default for the global scope.
    #[tracing::instrument(name = "registrar.submit", skip(self, scope, values), fields(scope = %scope))]
    pub async fn submit(
        &self,
        scope: &Scope,
        values: BTreeMap<String, Option<String>>,
    ) -> SchemaResult<SubmitReport> {
        let mut parsed = Vec::with_capacity(values.len());
        for (name, value) in values {
            let key: SettingKey = name.parse()?;
            if let Some(ref v) = value {
                key.validate(v)?;
            }
            parsed.push((key, value));
        }

        let mut written = Vec::with_capacity(parsed.len());
        for (key, value) in parsed {
            let (value, prefilled) = match value {
                Some(v) => (v, false),
                None => (self.inherited(key, scope).await?, true),
            };

            self.resolver.store().set(key.as_str(), &value, scope).await?;
            SettingsMetrics::record_write(scope.kind());

            tracing::info!(
                key = %key,
                scope = %scope,
                prefilled,
                "Setting saved"
            );

            written.push(WrittenSetting {
                name: key.as_str().to_string(),
                value,
                prefilled,
            });
        }

        Ok(SubmitReport {
            scope: scope.to_string(),
            written,
        })
    }

    async fn inherited(&self, key: SettingKey, scope: &Scope) -> SchemaResult<String> {
        match scope {
            Scope::Survey(_) => Ok(self
                .resolver
                .resolve_global(key.as_str(), key.default_value())
                .await?),
            Scope::Global => Ok(key.default_value().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::schema::SchemaError;
    use crate::store::{MemorySettingsStore, SettingsStore};
    use crate::template::DEFAULT_MESSAGE_TEMPLATE;

    fn registrar() -> (SettingsRegistrar, Arc<MemorySettingsStore>) {
        let store = Arc::new(MemorySettingsStore::new());
        let resolver = SettingsResolver::new(store.clone());
        (SettingsRegistrar::new(resolver), store)
    }

    fn current<'a>(section: &'a SettingsSection, name: &str) -> &'a str {
        &section
            .settings
            .iter()
            .find(|s| s.name == name)
            .unwrap()
            .current
    }

    #[tokio::test]
    async fn test_describe_defaults() {
        let (registrar, _) = registrar();
        let section = registrar.describe(&Scope::survey("1")).await.unwrap();

        assert_eq!(section.name, PLUGIN_NAME);
        assert_eq!(section.settings.len(), 2);
        assert_eq!(current(&section, "EnableSendSMS"), "0");
        assert_eq!(current(&section, "MessageBody"), DEFAULT_MESSAGE_TEMPLATE);
    }

    #[tokio::test]
    async fn test_describe_prefers_survey_over_global() {
        let (registrar, store) = registrar();
        store.set("EnableSendSMS", "1", &Scope::Global).await.unwrap();
        store
            .set("MessageBody", "survey body", &Scope::survey("1"))
            .await
            .unwrap();

        let section = registrar.describe(&Scope::survey("1")).await.unwrap();
        assert_eq!(current(&section, "EnableSendSMS"), "1");
        assert_eq!(current(&section, "MessageBody"), "survey body");

        let global = registrar.describe(&Scope::Global).await.unwrap();
        assert_eq!(current(&global, "MessageBody"), DEFAULT_MESSAGE_TEMPLATE);
    }

    #[tokio::test]
    async fn test_submit_writes_survey_scope_only() {
        let (registrar, store) = registrar();
        let mut values = BTreeMap::new();
        values.insert("EnableSendSMS".to_string(), Some("1".to_string()));
        values.insert("MessageBody".to_string(), Some("Hi {FIRSTNAME}".to_string()));

        let report = registrar.submit(&Scope::survey("9"), values).await.unwrap();
        assert_eq!(report.scope, "survey:9");
        assert_eq!(report.written.len(), 2);
        assert!(report.written.iter().all(|w| !w.prefilled));

        assert_eq!(
            store.get("EnableSendSMS", &Scope::survey("9")).await.unwrap(),
            Some("1".to_string())
        );
        assert!(store.get("EnableSendSMS", &Scope::Global).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_submit_prefills_missing_from_global() {
        let (registrar, store) = registrar();
        store
            .set("MessageBody", "global body", &Scope::Global)
            .await
            .unwrap();

        let mut values = BTreeMap::new();
        values.insert("MessageBody".to_string(), None);
        values.insert("EnableSendSMS".to_string(), None);

        let report = registrar.submit(&Scope::survey("9"), values).await.unwrap();
        assert!(report.written.iter().all(|w| w.prefilled));
        assert_eq!(
            store.get("MessageBody", &Scope::survey("9")).await.unwrap(),
            Some("global body".to_string())
        );
        assert_eq!(
            store.get("EnableSendSMS", &Scope::survey("9")).await.unwrap(),
            Some("0".to_string())
        );
    }

    #[tokio::test]
    async fn test_submit_rejects_before_writing() {
        let (registrar, store) = registrar();

        let mut values = BTreeMap::new();
        values.insert("EnableSendSMS".to_string(), Some("1".to_string()));
        values.insert("Bogus".to_string(), Some("x".to_string()));
        let err = registrar.submit(&Scope::survey("9"), values).await.unwrap_err();
        assert!(matches!(err, SchemaError::UnknownKey(ref k) if k == "Bogus"));

        let mut values = BTreeMap::new();
        values.insert("EnableSendSMS".to_string(), Some("2".to_string()));
        let err = registrar.submit(&Scope::survey("9"), values).await.unwrap_err();
        assert!(matches!(err, SchemaError::InvalidValue { .. }));

        assert!(store.is_empty());
    }
}
