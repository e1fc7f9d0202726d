//! Three-tier settings resolution: survey scope, then global scope, then the
//! compiled-in default supplied by the caller.

use std::sync::Arc;

use super::backend::{Scope, SettingsStore, StoreError};

/// Read-only view over a [`SettingsStore`] that applies scope fallback.
///
/// Every call reads the store afresh; nothing is cached here.
#[derive(Clone)]
pub struct SettingsResolver {
    store: Arc<dyn SettingsStore>,
}

impl SettingsResolver {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Underlying store, for the write path.
    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    /// Effective value of `key` for `scope`.
    ///
    /// `Scope::Survey` falls back to `Scope::Global`, which falls back to
    /// `compiled_default`.
    pub async fn resolve(
        &self,
        key: &str,
        scope: &Scope,
        compiled_default: &str,
    ) -> Result<String, StoreError> {
        if let Scope::Survey(_) = scope {
            if let Some(value) = self.store.get(key, scope).await? {
                return Ok(value);
            }
        }

        self.resolve_global(key, compiled_default).await
    }

    /// Effective global value of `key`, ignoring any survey override.
    pub async fn resolve_global(
        &self,
        key: &str,
        compiled_default: &str,
    ) -> Result<String, StoreError> {
        match self.store.get(key, &Scope::Global).await? {
            Some(value) => Ok(value),
            None => Ok(compiled_default.to_string()),
        }
    }
}
