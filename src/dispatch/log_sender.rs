//! Dry-run sender that only logs messages.

use async_trait::async_trait;
use uuid::Uuid;

use super::types::{DeliveryOutcome, MessageSender, SendError, SendRequest};

/// Logs each message and reports it as delivered with a generated reference.
#[derive(Debug, Default)]
pub struct LogSender;

impl LogSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessageSender for LogSender {
    fn provider_type(&self) -> &'static str {
        "log"
    }

    async fn send(&self, request: SendRequest<'_>) -> Result<DeliveryOutcome, SendError> {
        let reference = format!("log-{}", Uuid::new_v4());
        tracing::info!(
            reference = %reference,
            to = %request.destination,
            from = %request.from_address,
            body_len = request.body.chars().count(),
            "Dry-run message send"
        );
        Ok(DeliveryOutcome::delivered(Some(reference)))
    }
}
