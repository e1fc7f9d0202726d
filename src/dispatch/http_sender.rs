//! Generic HTTP message sender.
//!
//! POSTs `{"to", "from", "body"}` as JSON to a configured messages endpoint
//! with basic auth (account id / auth token). Any 2xx is a success; the
//! provider reference is read from a `sid` or `id` field of the response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::types::{DeliveryOutcome, MessageSender, SendError, SendRequest};

#[derive(Debug, Serialize)]
struct MessagePayload<'a> {
    to: &'a str,
    from: &'a str,
    body: &'a str,
}

/// HTTP message sender
pub struct HttpSender {
    endpoint: String,
    client: Client,
}

impl HttpSender {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, SendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SendError::Misconfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

/// Provider message id from a JSON response body
fn reference_from(body: &serde_json::Value) -> Option<String> {
    ["sid", "id"]
        .iter()
        .find_map(|field| body.get(field))
        .and_then(|v| match v {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

#[async_trait]
impl MessageSender for HttpSender {
    fn provider_type(&self) -> &'static str {
        "http"
    }

    async fn send(&self, request: SendRequest<'_>) -> Result<DeliveryOutcome, SendError> {
        if self.endpoint.is_empty() {
            return Err(SendError::Misconfigured(
                "provider endpoint is not set".to_string(),
            ));
        }

        let payload = MessagePayload {
            to: request.destination,
            from: request.from_address,
            body: request.body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(
                &request.credentials.account_id,
                Some(&request.credentials.auth_token),
            )
            .json(&payload)
            .send()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let reference = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .as_ref()
            .and_then(reference_from);

        tracing::debug!(status = %status, reference = ?reference, "Provider accepted message");
        Ok(DeliveryOutcome::delivered(reference))
    }
}
