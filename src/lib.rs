// Shared infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Routing core
pub mod dispatch;
pub mod link;
pub mod routing;
pub mod schema;
pub mod store;
pub mod template;

// Host integration
pub mod api;
pub mod hooks;
pub mod server;
