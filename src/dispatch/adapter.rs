use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::metrics::DispatchMetrics;
use crate::routing::RenderedMessage;

use super::types::{DeliveryOutcome, MessageSender, ProviderAccount, SendRequest};

/// Chooses the sending account for a message
#[derive(Debug, Clone)]
pub enum AccountSelector {
    /// One account for every message
    Global(ProviderAccount),
    /// Accounts keyed by the recipient's client value, with an optional
    /// account for recipients without one
    PerClient {
        clients: HashMap<String, ProviderAccount>,
        fallback: Option<ProviderAccount>,
    },
}

impl AccountSelector {
    pub fn select(&self, client: Option<&str>) -> Option<&ProviderAccount> {
        match self {
            AccountSelector::Global(account) => Some(account),
            AccountSelector::PerClient { clients, fallback } => match client {
                Some(c) => clients.get(c).or(fallback.as_ref()),
                None => fallback.as_ref(),
            },
        }
    }
}

/// Sends rendered messages through a [`MessageSender`].
///
/// Never retries. Transport errors and missing accounts are reported as
/// failed outcomes.
pub struct DispatchAdapter {
    sender: Arc<dyn MessageSender>,
    accounts: AccountSelector,
    address_prefix: Option<String>,
}

impl DispatchAdapter {
    pub fn new(sender: Arc<dyn MessageSender>, accounts: AccountSelector) -> Self {
        Self {
            sender,
            accounts,
            address_prefix: None,
        }
    }

    /// Prefix both addresses, e.g. `whatsapp:` for a WhatsApp-enabled sender
    pub fn with_address_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.address_prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    pub fn provider_type(&self) -> &'static str {
        self.sender.provider_type()
    }

    fn prefixed(&self, address: &str) -> String {
        match &self.address_prefix {
            Some(prefix) if !address.starts_with(prefix.as_str()) => {
                format!("{}{}", prefix, address)
            }
            _ => address.to_string(),
        }
    }

    /// Send `message`, using the account selected for `client`.
    #[tracing::instrument(
        name = "dispatch.send",
        skip(self, message),
        fields(provider = self.sender.provider_type(), destination = %message.destination)
    )]
    pub async fn send(&self, message: &RenderedMessage, client: Option<&str>) -> DeliveryOutcome {
        let Some(account) = self.accounts.select(client) else {
            tracing::warn!(client = ?client, "No provider account configured for client");
            DispatchMetrics::record_result(false, 0.0);
            return DeliveryOutcome::failed(format!(
                "no provider account configured for client {:?}",
                client.unwrap_or_default()
            ));
        };

        let destination = self.prefixed(&message.destination);
        let from_address = self.prefixed(&account.from_address);
        let request = SendRequest {
            destination: &destination,
            body: &message.body,
            from_address: &from_address,
            credentials: &account.credentials,
        };

        let started = Instant::now();
        let outcome = match self.sender.send(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Message provider call failed");
                DeliveryOutcome::failed(e.to_string())
            }
        };
        DispatchMetrics::record_result(outcome.success, started.elapsed().as_secs_f64());

        if outcome.success {
            tracing::info!(
                reference = ?outcome.provider_reference,
                "Message handed to provider"
            );
        } else {
            tracing::warn!(detail = ?outcome.detail, "Message provider reported failure");
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::dispatch::SendError;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(String, String, String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl MessageSender for Recorder {
        fn provider_type(&self) -> &'static str {
            "recorder"
        }

        async fn send(&self, request: SendRequest<'_>) -> Result<DeliveryOutcome, SendError> {
            self.sent.lock().unwrap().push((
                request.destination.to_string(),
                request.body.to_string(),
                request.from_address.to_string(),
                request.credentials.account_id.clone(),
            ));
            if self.fail {
                Err(SendError::Transport("connection reset".to_string()))
            } else {
                Ok(DeliveryOutcome::delivered(Some("ref-1".to_string())))
            }
        }
    }

    fn message() -> RenderedMessage {
        RenderedMessage {
            destination: "+15551234567".to_string(),
            body: "hello".to_string(),
        }
    }

    #[tokio::test]
    async fn test_global_account() {
        let recorder = Arc::new(Recorder::default());
        let adapter = DispatchAdapter::new(
            recorder.clone(),
            AccountSelector::Global(ProviderAccount::new("+15550000000", "AC1", "t")),
        );

        let outcome = adapter.send(&message(), Some("acme")).await;
        assert!(outcome.success);
        assert_eq!(outcome.provider_reference.as_deref(), Some("ref-1"));

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+15551234567");
        assert_eq!(sent[0].2, "+15550000000");
        assert_eq!(sent[0].3, "AC1");
    }

    #[tokio::test]
    async fn test_per_client_selection() {
        let recorder = Arc::new(Recorder::default());
        let mut clients = HashMap::new();
        clients.insert(
            "acme".to_string(),
            ProviderAccount::new("+15551110000", "AC-acme", "t"),
        );
        let adapter = DispatchAdapter::new(
            recorder.clone(),
            AccountSelector::PerClient {
                clients,
                fallback: None,
            },
        );

        assert!(adapter.send(&message(), Some("acme")).await.success);

        let outcome = adapter.send(&message(), Some("globex")).await;
        assert!(!outcome.success);
        assert!(outcome.detail.unwrap().contains("globex"));

        assert!(!adapter.send(&message(), None).await.success);
        assert_eq!(recorder.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_becomes_failed_outcome() {
        let recorder = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        let adapter = DispatchAdapter::new(
            recorder,
            AccountSelector::Global(ProviderAccount::new("+1", "AC1", "t")),
        );

        let outcome = adapter.send(&message(), None).await;
        assert!(!outcome.success);
        assert!(outcome.detail.unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_address_prefix() {
        let recorder = Arc::new(Recorder::default());
        let adapter = DispatchAdapter::new(
            recorder.clone(),
            AccountSelector::Global(ProviderAccount::new("+15550000000", "AC1", "t")),
        )
        .with_address_prefix("whatsapp:");

        adapter.send(&message(), None).await;
        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent[0].0, "whatsapp:+15551234567");
        assert_eq!(sent[0].2, "whatsapp:+15550000000");
    }
}
