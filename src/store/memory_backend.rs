//! In-memory settings store using DashMap.
//!
//! Values are lost on restart. Used by default and in tests.

use async_trait::async_trait;
use dashmap::DashMap;

use super::backend::{Scope, SettingsStore, StoreError};

/// In-memory settings store keyed by `(scope, key)`.
#[derive(Default)]
pub struct MemorySettingsStore {
    values: DashMap<(Scope, String), String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemorySettingsStore {
    /// Remove a value, making the key absent under `scope`.
    pub(crate) fn remove(&self, key: &str, scope: &Scope) -> Option<String> {
        self.values
            .remove(&(scope.clone(), key.to_string()))
            .map(|(_, v)| v)
    }

    /// Number of stored values across all scopes.
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str, scope: &Scope) -> Result<Option<String>, StoreError> {
        Ok(self
            .values
            .get(&(scope.clone(), key.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str, scope: &Scope) -> Result<(), StoreError> {
        self.values
            .insert((scope.clone(), key.to_string()), value.to_string());
        tracing::debug!(key = %key, scope = %scope, "Setting stored in memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemorySettingsStore::new();
        let value = store.get("EnableSendSMS", &Scope::Global).await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_set_and_get_is_scope_exact() {
        let store = MemorySettingsStore::new();
        store
            .set("EnableSendSMS", "1", &Scope::survey("100"))
            .await
            .unwrap();

        assert_eq!(
            store
                .get("EnableSendSMS", &Scope::survey("100"))
                .await
                .unwrap(),
            Some("1".to_string())
        );
        assert!(store
            .get("EnableSendSMS", &Scope::survey("200"))
            .await
            .unwrap()
            .is_none());
        assert!(store
            .get("EnableSendSMS", &Scope::Global)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_overwrite_and_remove() {
        let store = MemorySettingsStore::new();
        store.set("MessageBody", "a", &Scope::Global).await.unwrap();
        store.set("MessageBody", "b", &Scope::Global).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("MessageBody", &Scope::Global).await.unwrap(),
            Some("b".to_string())
        );

        assert_eq!(store.remove("MessageBody", &Scope::Global), Some("b".to_string()));
        assert!(store.is_empty());
    }
}
