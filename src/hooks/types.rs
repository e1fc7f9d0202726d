use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::routing::{NotificationEvent, RoutingDecision, RoutingError};
use crate::schema::{SchemaError, SettingsSection, SubmitReport};
use crate::store::Scope;

/// Host extension points the routing plugin subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    BeforeNotificationSend,
    BeforeSettingsDisplay,
    OnSettingsSubmit,
}

impl HookPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookPoint::BeforeNotificationSend => "before-notification-send",
            HookPoint::BeforeSettingsDisplay => "before-settings-display",
            HookPoint::OnSettingsSubmit => "on-settings-submit",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors a hook handler can return to the host
#[derive(Debug, Error)]
pub enum HookError {
    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Fired before the host emails a participant
#[derive(Debug)]
pub struct NotificationSendEvent {
    pub notification: NotificationEvent,
    /// Set by the routing handler
    pub decision: Option<RoutingDecision>,
}

impl NotificationSendEvent {
    pub fn new(notification: NotificationEvent) -> Self {
        Self {
            notification,
            decision: None,
        }
    }

    /// Whether the host must skip its email
    pub fn suppress_delivery(&self) -> bool {
        self.notification.suppress_delivery()
    }
}

/// Fired before a settings page is rendered; handlers append sections
#[derive(Debug)]
pub struct SettingsDisplayEvent {
    pub scope: Scope,
    pub sections: Vec<SettingsSection>,
}

impl SettingsDisplayEvent {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            sections: Vec::new(),
        }
    }
}

/// Fired when a settings page is submitted
#[derive(Debug)]
pub struct SettingsSubmitEvent {
    pub scope: Scope,
    /// Submitted values by key; `None` when the input was left out
    pub values: BTreeMap<String, Option<String>>,
    pub reports: Vec<SubmitReport>,
}

impl SettingsSubmitEvent {
    pub fn new(scope: Scope, values: BTreeMap<String, Option<String>>) -> Self {
        Self {
            scope,
            values,
            reports: Vec::new(),
        }
    }
}
