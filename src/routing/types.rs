use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dispatch::DeliveryOutcome;

/// Routing attribute value meaning "deliver by email"
pub const EMAIL_SENTINEL: &str = "NA";

/// Kind of outbound survey notification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationType {
    /// Survey invitation ("invite" or "invitation")
    Invite,
    /// Reminder ("remind" or "reminder")
    Remind,
    /// Completion confirmation ("confirm")
    Confirm,
    /// Any other host notification, never intercepted
    Other(String),
}

impl NotificationType {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationType::Invite => "invite",
            NotificationType::Remind => "remind",
            NotificationType::Confirm => "confirm",
            NotificationType::Other(raw) => raw.as_str(),
        }
    }

    /// Whether routing acts on this type at all
    pub fn is_routable(&self) -> bool {
        !matches!(self, NotificationType::Other(_))
    }

    /// Whether a redirected message of this type is actually sent.
    ///
    /// Confirmations are suppressed but never sent as text messages.
    pub fn dispatches(&self) -> bool {
        matches!(self, NotificationType::Invite | NotificationType::Remind)
    }
}

impl From<&str> for NotificationType {
    fn from(raw: &str) -> Self {
        match raw {
            "invite" | "invitation" => NotificationType::Invite,
            "remind" | "reminder" => NotificationType::Remind,
            "confirm" => NotificationType::Confirm,
            other => NotificationType::Other(other.to_string()),
        }
    }
}

impl From<String> for NotificationType {
    fn from(raw: String) -> Self {
        NotificationType::from(raw.as_str())
    }
}

impl From<NotificationType> for String {
    fn from(t: NotificationType) -> Self {
        match t {
            NotificationType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a recipient's routing attribute points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientRoute<'a> {
    /// The attribute is absent from the record
    Missing,
    /// "NA" or empty: leave delivery to email
    Email,
    /// Destination address for the text-message channel
    Message(&'a str),
}

/// Participant data attached to a notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientRecord {
    pub token: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// `None` when the host record has no routing attribute at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_attribute: Option<String>,
    /// Client key selecting a provider account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

impl RecipientRecord {
    pub fn new(
        token: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            routing_attribute: None,
            client: None,
        }
    }

    pub fn with_routing_attribute(mut self, value: impl Into<String>) -> Self {
        self.routing_attribute = Some(value.into());
        self
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Build from the host's raw token record.
    ///
    /// `token`, `firstname` and `lastname` are read by name. The routing
    /// attribute is read from `attribute_key`; a missing or `null` field is
    /// treated as absent.
    pub fn from_token_data(
        data: &serde_json::Map<String, serde_json::Value>,
        attribute_key: &str,
        client_key: Option<&str>,
    ) -> Self {
        Self {
            token: field_text(data, "token").unwrap_or_default(),
            first_name: field_text(data, "firstname").unwrap_or_default(),
            last_name: field_text(data, "lastname").unwrap_or_default(),
            routing_attribute: field_text(data, attribute_key),
            client: client_key
                .and_then(|key| field_text(data, key))
                .filter(|c| !c.is_empty()),
        }
    }

    pub fn route(&self) -> RecipientRoute<'_> {
        match self.routing_attribute.as_deref() {
            None => RecipientRoute::Missing,
            Some(value) if value.is_empty() || value == EMAIL_SENTINEL => RecipientRoute::Email,
            Some(destination) => RecipientRoute::Message(destination),
        }
    }
}

fn field_text(data: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<String> {
    match data.get(key)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// One outbound notification as seen by the routing core
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub survey_id: String,
    pub notification_type: NotificationType,
    pub recipient: RecipientRecord,
    suppress_delivery: bool,
}

impl NotificationEvent {
    pub fn new(
        survey_id: impl Into<String>,
        notification_type: impl Into<NotificationType>,
        recipient: RecipientRecord,
    ) -> Self {
        Self {
            survey_id: survey_id.into(),
            notification_type: notification_type.into(),
            recipient,
            suppress_delivery: false,
        }
    }

    /// Whether the host must skip its own email delivery
    pub fn suppress_delivery(&self) -> bool {
        self.suppress_delivery
    }

    /// Mark the event so the host does not send the email.
    pub(crate) fn suppress(&mut self) {
        self.suppress_delivery = true;
    }
}

/// Destination and final body of a redirected notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    pub destination: String,
    pub body: String,
}

/// Why an event was passed through untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// SMS routing is off for the survey
    Disabled,
    /// Notification type is not invite, remind or confirm
    UnsupportedType,
}

/// Terminal, non-error outcome of routing one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RoutingDecision {
    SkippedDisabled { reason: SkipReason },
    EmailAllowed,
    RedirectToMessage {
        message: RenderedMessage,
        /// `None` when the type is never dispatched (confirmations)
        #[serde(skip_serializing_if = "Option::is_none")]
        delivery: Option<DeliveryOutcome>,
    },
}

impl RoutingDecision {
    /// Label used in logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            RoutingDecision::SkippedDisabled { .. } => "skipped_disabled",
            RoutingDecision::EmailAllowed => "email_allowed",
            RoutingDecision::RedirectToMessage { .. } => "redirect_to_message",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_type_aliases() {
        assert_eq!(NotificationType::from("invite"), NotificationType::Invite);
        assert_eq!(NotificationType::from("invitation"), NotificationType::Invite);
        assert_eq!(NotificationType::from("remind"), NotificationType::Remind);
        assert_eq!(NotificationType::from("reminder"), NotificationType::Remind);
        assert_eq!(NotificationType::from("confirm"), NotificationType::Confirm);
        assert_eq!(
            NotificationType::from("registration"),
            NotificationType::Other("registration".to_string())
        );
        assert_eq!(
            NotificationType::from("Invite"),
            NotificationType::Other("Invite".to_string())
        );
    }

    #[test]
    fn test_notification_type_serde() {
        let t: NotificationType = serde_json::from_value(json!("reminder")).unwrap();
        assert_eq!(t, NotificationType::Remind);
        assert_eq!(serde_json::to_value(&t).unwrap(), json!("remind"));

        let other: NotificationType = serde_json::from_value(json!("admin_notification")).unwrap();
        assert_eq!(serde_json::to_value(&other).unwrap(), json!("admin_notification"));
    }

    #[test]
    fn test_dispatch_asymmetry() {
        assert!(NotificationType::Invite.dispatches());
        assert!(NotificationType::Remind.dispatches());
        assert!(!NotificationType::Confirm.dispatches());
        assert!(NotificationType::Confirm.is_routable());
        assert!(!NotificationType::Other("x".into()).is_routable());
    }

    #[test]
    fn test_recipient_route() {
        let base = RecipientRecord::new("tok", "Ana", "Silva");
        assert_eq!(base.route(), RecipientRoute::Missing);
        assert_eq!(
            base.clone().with_routing_attribute("NA").route(),
            RecipientRoute::Email
        );
        assert_eq!(
            base.clone().with_routing_attribute("").route(),
            RecipientRoute::Email
        );
        assert_eq!(
            base.with_routing_attribute("+15551234567").route(),
            RecipientRoute::Message("+15551234567")
        );
    }

    #[test]
    fn test_from_token_data() {
        let data = json!({
            "token": "abc123",
            "firstname": "Ana",
            "lastname": "Silva",
            "email": "ana@example.org",
            "attribute_1": "+15551234567",
            "attribute_2": "acme"
        });
        let record = RecipientRecord::from_token_data(
            data.as_object().unwrap(),
            "attribute_1",
            Some("attribute_2"),
        );
        assert_eq!(record.token, "abc123");
        assert_eq!(record.first_name, "Ana");
        assert_eq!(record.routing_attribute.as_deref(), Some("+15551234567"));
        assert_eq!(record.client.as_deref(), Some("acme"));
    }

    #[test]
    fn test_from_token_data_missing_and_null_attribute() {
        let data = json!({"token": "t", "firstname": "A", "lastname": "B"});
        let record = RecipientRecord::from_token_data(data.as_object().unwrap(), "attribute_1", None);
        assert!(record.routing_attribute.is_none());
        assert!(record.client.is_none());

        let data = json!({"token": "t", "attribute_1": null});
        let record = RecipientRecord::from_token_data(data.as_object().unwrap(), "attribute_1", None);
        assert_eq!(record.route(), RecipientRoute::Missing);
    }

    #[test]
    fn test_from_token_data_numeric_attribute() {
        let data = json!({"token": "t", "attribute_1": 15551234567u64});
        let record = RecipientRecord::from_token_data(data.as_object().unwrap(), "attribute_1", None);
        assert_eq!(record.route(), RecipientRoute::Message("15551234567"));
    }

    #[test]
    fn test_event_starts_unsuppressed() {
        let mut event = NotificationEvent::new("1", "invite", RecipientRecord::new("t", "A", "B"));
        assert!(!event.suppress_delivery());
        event.suppress();
        assert!(event.suppress_delivery());
    }

    #[test]
    fn test_decision_serialization() {
        let decision = RoutingDecision::SkippedDisabled {
            reason: SkipReason::UnsupportedType,
        };
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["decision"], "skipped_disabled");
        assert_eq!(json["reason"], "unsupported_type");

        let decision = RoutingDecision::RedirectToMessage {
            message: RenderedMessage {
                destination: "+1".to_string(),
                body: "b".to_string(),
            },
            delivery: None,
        };
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["decision"], "redirect_to_message");
        assert_eq!(json["message"]["destination"], "+1");
        assert!(json.get("delivery").is_none());
    }
}
