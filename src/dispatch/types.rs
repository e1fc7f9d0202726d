//! Message sender collaborator contract

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors raised by a message sender's transport
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Provider request failed: {0}")]
    Transport(String),

    #[error("Provider rejected message: {status} - {body}")]
    Rejected { status: u16, body: String },

    #[error("Provider misconfigured: {0}")]
    Misconfigured(String),
}

/// Result of one provider call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub success: bool,
    /// Provider's message id, when it returned one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_reference: Option<String>,
    /// Failure description for the operator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DeliveryOutcome {
    pub fn delivered(provider_reference: Option<String>) -> Self {
        Self {
            success: true,
            provider_reference,
            detail: None,
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            provider_reference: None,
            detail: Some(detail.into()),
        }
    }
}

/// Provider account credentials
#[derive(Clone)]
pub struct ProviderCredentials {
    pub account_id: String,
    pub auth_token: String,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("account_id", &self.account_id)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// Sending identity: from-address plus credentials
#[derive(Debug, Clone)]
pub struct ProviderAccount {
    pub from_address: String,
    pub credentials: ProviderCredentials,
}

impl ProviderAccount {
    pub fn new(
        from_address: impl Into<String>,
        account_id: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            from_address: from_address.into(),
            credentials: ProviderCredentials {
                account_id: account_id.into(),
                auth_token: auth_token.into(),
            },
        }
    }
}

/// One message handed to a sender
#[derive(Debug, Clone, Copy)]
pub struct SendRequest<'a> {
    pub destination: &'a str,
    pub body: &'a str,
    pub from_address: &'a str,
    pub credentials: &'a ProviderCredentials,
}

/// Message-sending collaborator.
///
/// One call per message; timeouts and retries, if any, live inside the
/// implementation.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Provider type identifier ("log", "http")
    fn provider_type(&self) -> &'static str;

    async fn send(&self, request: SendRequest<'_>) -> Result<DeliveryOutcome, SendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_token() {
        let account = ProviderAccount::new("+15550000000", "AC123", "secret-token");
        let debug = format!("{:?}", account);
        assert!(debug.contains("AC123"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_outcome_constructors() {
        let ok = DeliveryOutcome::delivered(Some("SM1".to_string()));
        assert!(ok.success);
        assert!(ok.detail.is_none());

        let failed = DeliveryOutcome::failed("boom");
        assert!(!failed.success);
        assert_eq!(failed.detail.as_deref(), Some("boom"));

        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["provider_reference"], "SM1");
        assert!(json.get("detail").is_none());
    }
}
