use thiserror::Error;

use crate::dispatch::DeliveryOutcome;
use crate::store::StoreError;

use super::types::RoutingDecision;

/// Operator-facing routing failures.
///
/// Each variant ends routing for its event; batch routing stops at the first.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// SMS routing is on but the recipient record lacks the routing attribute
    #[error(
        "SMS routing is enabled for survey {survey_id} but recipient {token} has no routing \
         attribute; add it with the mobile number, or NA for email, or disable SMS routing"
    )]
    Configuration { survey_id: String, token: String },

    /// The provider did not accept the message; the email stays suppressed
    #[error("SMS to {destination} for survey {survey_id} was not sent: {detail}")]
    Dispatch {
        survey_id: String,
        destination: String,
        detail: String,
        outcome: DeliveryOutcome,
    },

    #[error("Settings store error: {0}")]
    Store(#[from] StoreError),
}

impl RoutingError {
    /// Label used in logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            RoutingError::Configuration { .. } => "reject_misconfigured",
            RoutingError::Dispatch { .. } => "dispatch_failed",
            RoutingError::Store(_) => "store_error",
        }
    }

    /// Whether the event's email had already been suppressed
    pub fn suppressed_delivery(&self) -> bool {
        matches!(self, RoutingError::Dispatch { .. })
    }
}

/// A batch stopped at the event at `index`
#[derive(Debug, Error)]
#[error("notification batch halted at event {index}: {error}")]
pub struct BatchHalted {
    /// Position of the failing event
    pub index: usize,
    /// Results for the events before `index`
    pub completed: Vec<RoutingDecision>,
    #[source]
    pub error: RoutingError,
}
