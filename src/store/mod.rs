//! Scoped settings storage and resolution.
//!
//! Settings are stored per survey or globally. Reads go through
//! [`SettingsResolver`], which applies the survey → global → compiled default
//! fallback. Backends:
//!
//! - `MemorySettingsStore`: in-memory storage using DashMap (default)
//! - `RedisSettingsStore`: one Redis hash per scope
//!
//! Use `create_settings_store()` to pick a backend from configuration.

pub mod backend;
mod factory;
pub mod memory_backend;
pub mod redis_backend;
mod resolver;

pub use backend::{Scope, SettingsStore, StoreError};
pub use factory::create_settings_store;
pub use memory_backend::MemorySettingsStore;
pub use redis_backend::RedisSettingsStore;
pub use resolver::SettingsResolver;
