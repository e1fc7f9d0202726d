//! Typed host extension points.
//!
//! The host fires a typed event at each [`HookPoint`]; handlers registered in
//! a [`HookRegistry`] receive the event by mutable reference and may record
//! results on it. [`SmsRoutingPlugin`] subscribes the routing core and the
//! settings registrar.

mod plugin;
mod registry;
mod types;

pub use plugin::SmsRoutingPlugin;
pub use registry::{EventHandler, HookEvent, HookRegistry};
pub use types::{
    HookError, HookPoint, NotificationSendEvent, SettingsDisplayEvent, SettingsSubmitEvent,
};
