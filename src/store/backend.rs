//! Backend trait for scoped settings storage.
//!
//! The settings store is owned by the host deployment. The routing core only
//! reads from it (per event) and writes to it from the settings submit path.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during settings store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Redis operation failed
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Backend is temporarily unavailable
    #[error("Settings store unavailable: {0}")]
    Unavailable(String),
}

/// Level at which a setting value is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Process-wide default scope
    Global,
    /// Per-survey override scope
    Survey(String),
}

impl Scope {
    /// Survey scope for the given survey id.
    pub fn survey(survey_id: impl Into<String>) -> Self {
        Scope::Survey(survey_id.into())
    }

    /// Label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Survey(_) => "survey",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Survey(id) => write!(f, "survey:{}", id),
        }
    }
}

/// Scoped key/value storage for named settings.
///
/// Values are stored as raw strings, the way an administration form submits
/// them. Interpretation (flags, templates) belongs to the caller.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Backend type identifier ("memory", "redis")
    fn backend_type(&self) -> &'static str;

    /// Read `key` under exactly `scope`. No fallback to other scopes.
    async fn get(&self, key: &str, scope: &Scope) -> Result<Option<String>, StoreError>;

    /// Write `value` for `key` under `scope`, replacing any previous value.
    async fn set(&self, key: &str, value: &str, scope: &Scope) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::Global.to_string(), "global");
        assert_eq!(Scope::survey("123456").to_string(), "survey:123456");
    }

    #[test]
    fn test_scope_kind() {
        assert_eq!(Scope::Global.kind(), "global");
        assert_eq!(Scope::survey("1").kind(), "survey");
    }
}
