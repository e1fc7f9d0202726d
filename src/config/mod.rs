mod settings;

pub use settings::{
    AccountConfig, ApiConfig, LinkConfig, OtelConfig, ProviderConfig, RedisConfig, RoutingConfig,
    ServerConfig, Settings, StoreConfig,
};
