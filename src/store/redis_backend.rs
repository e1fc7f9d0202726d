//! Redis-based settings store.
//!
//! Each scope is a Redis hash: `{prefix}:global` or `{prefix}:survey:{id}`,
//! with one field per setting name.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::backend::{Scope, SettingsStore, StoreError};

/// Redis-based settings store.
pub struct RedisSettingsStore {
    /// Auto-reconnecting multiplexed connection
    connection: ConnectionManager,

    /// Key prefix for Redis keys
    prefix: String,
}

impl RedisSettingsStore {
    /// Create a store over an existing connection manager.
    pub fn new(connection: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            connection,
            prefix: prefix.into(),
        }
    }

    fn scope_key(&self, scope: &Scope) -> String {
        scope_key(&self.prefix, scope)
    }
}

/// Redis hash key holding all settings of `scope`.
fn scope_key(prefix: &str, scope: &Scope) -> String {
    format!("{}:{}", prefix, scope)
}

#[async_trait]
impl SettingsStore for RedisSettingsStore {
    fn backend_type(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str, scope: &Scope) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.hget(self.scope_key(scope), key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, scope: &Scope) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let hash = self.scope_key(scope);
        let _: () = conn.hset(&hash, key, value).await?;
        tracing::debug!(key = %key, hash = %hash, "Setting stored in Redis");
        Ok(())
    }
}
