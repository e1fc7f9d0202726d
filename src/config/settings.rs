use std::collections::HashMap;
use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// List, or a comma-separated string when set from the environment
    #[serde(default, deserialize_with = "string_or_list")]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
}

/// Settings store backend selection
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// "memory" (default) or "redis"
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// Key prefix for the Redis backend
    #[serde(default = "default_store_prefix")]
    pub redis_prefix: String,
}

/// How recipient records are read from the host's token data
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    /// Token-record field holding "NA" or the destination address
    #[serde(default = "default_attribute_key")]
    pub attribute_key: String,
    /// Token-record field selecting a per-client provider account
    #[serde(default)]
    pub client_attribute_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    /// Public base URL of the survey host, without trailing slash
    #[serde(default = "default_link_base_url")]
    pub base_url: String,
    /// "query" or "path"
    #[serde(default = "default_link_style")]
    pub style: String,
}

/// Message provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// "log" (dry run, default) or "http"
    #[serde(default = "default_provider_kind")]
    pub kind: String,
    /// Messages endpoint for the http provider
    #[serde(default)]
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
    /// Prefix applied to both addresses, e.g. "whatsapp:"
    #[serde(default)]
    pub address_prefix: Option<String>,
    /// Global account, used when no client account applies
    #[serde(default)]
    pub from_address: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub auth_token: String,
    /// Per-client accounts keyed by the recipient's client attribute
    #[serde(default)]
    pub clients: HashMap<String, AccountConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    pub from_address: String,
    pub account_id: String,
    pub auth_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Origins {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Origins::deserialize(deserializer)? {
        Origins::List(list) => list,
        Origins::Text(text) => text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_store_backend() -> String {
    "memory".to_string()
}

fn default_store_prefix() -> String {
    "survey_sms:settings".to_string()
}

fn default_attribute_key() -> String {
    "attribute_1".to_string()
}

fn default_link_base_url() -> String {
    "http://localhost".to_string()
}

fn default_link_style() -> String {
    "query".to_string()
}

fn default_provider_kind() -> String {
    "log".to_string()
}

fn default_provider_timeout() -> u64 {
    10
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "survey-sms-router".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8082)?
            .set_default("store.backend", "memory")?
            .set_default("routing.attribute_key", "attribute_1")?
            .set_default("provider.kind", "log")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables, `__` between section and field:
            // SERVER__PORT, PROVIDER__ACCOUNT_ID, LINK__BASE_URL, etc.
            // Values stay strings so phone numbers keep their leading `+`.
            .add_source(Environment::default().separator("__"));

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            api: ApiConfig::default(),
            redis: RedisConfig::default(),
            store: StoreConfig::default(),
            routing: RoutingConfig::default(),
            link: LinkConfig::default(),
            provider: ProviderConfig::default(),
            otel: OtelConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            redis_prefix: default_store_prefix(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            attribute_key: default_attribute_key(),
            client_attribute_key: None,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_url: default_link_base_url(),
            style: default_link_style(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_provider_kind(),
            endpoint: String::new(),
            timeout_secs: default_provider_timeout(),
            address_prefix: None,
            from_address: String::new(),
            account_id: String::new(),
            auth_token: String::new(),
            clients: HashMap::new(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}
