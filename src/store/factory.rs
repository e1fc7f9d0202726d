//! Settings store factory

use std::sync::Arc;

use redis::aio::ConnectionManager;

use crate::config::StoreConfig;

use super::backend::SettingsStore;
use super::memory_backend::MemorySettingsStore;
use super::redis_backend::RedisSettingsStore;

/// Create a settings store based on configuration.
///
/// - `"redis"`: a `RedisSettingsStore` if a connection is provided
/// - `"memory"` (default): a `MemorySettingsStore`
///
/// # Example
///
/// ```rust,ignore
/// let store = create_settings_store(&settings.store, Some(connection));
/// ```
pub fn create_settings_store(
    settings: &StoreConfig,
    redis_connection: Option<ConnectionManager>,
) -> Arc<dyn SettingsStore> {
    match settings.backend.as_str() {
        "redis" => {
            if let Some(connection) = redis_connection {
                tracing::info!(
                    backend = "redis",
                    prefix = %settings.redis_prefix,
                    "Creating Redis settings store"
                );
                Arc::new(RedisSettingsStore::new(
                    connection,
                    settings.redis_prefix.clone(),
                ))
            } else {
                tracing::warn!(
                    "Redis settings store requested but no connection provided, falling back to memory"
                );
                Arc::new(MemorySettingsStore::new())
            }
        }
        _ => {
            tracing::info!(backend = "memory", "Creating memory settings store");
            Arc::new(MemorySettingsStore::new())
        }
    }
}
