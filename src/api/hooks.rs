//! Notification hook endpoints: the host posts each outbound notification
//! before emailing it and honors `suppress_delivery` in the reply.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};
use crate::hooks::NotificationSendEvent;
use crate::metrics::RoutingMetrics;
use crate::routing::{NotificationEvent, NotificationType, RecipientRecord, RoutingDecision};
use crate::server::AppState;
use crate::telemetry::attributes;

/// One outbound notification as posted by the host
#[derive(Debug, Deserialize)]
pub struct NotificationRequest {
    #[serde(deserialize_with = "id_string")]
    pub survey_id: String,
    /// "invite", "invitation", "remind", "reminder", "confirm", ...
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// The host's raw token record (`token`, `firstname`, `lastname`, attributes)
    pub token: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct BatchNotificationRequest {
    pub events: Vec<NotificationRequest>,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub survey_id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// The host must not send its email when this is true
    pub suppress_delivery: bool,
    pub routing: RoutingDecision,
}

#[derive(Debug, Serialize)]
pub struct BatchNotificationResponse {
    pub processed: usize,
    pub results: Vec<NotificationResponse>,
}

#[derive(Debug, Serialize)]
struct BatchHaltedResponse {
    error: HaltedError,
    processed: usize,
    results: Vec<NotificationResponse>,
}

#[derive(Debug, Serialize)]
struct HaltedError {
    code: &'static str,
    message: String,
    /// Index of the failing event
    index: usize,
    suppress_delivery: bool,
}

/// Survey ids arrive as numbers from some hosts
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

fn to_event(state: &AppState, request: NotificationRequest) -> NotificationEvent {
    let routing = &state.settings.routing;
    let recipient = RecipientRecord::from_token_data(
        &request.token,
        &routing.attribute_key,
        routing.client_attribute_key.as_deref(),
    );
    NotificationEvent::new(request.survey_id, request.notification_type, recipient)
}

fn to_response(event: NotificationEvent, routing: RoutingDecision) -> NotificationResponse {
    NotificationResponse {
        suppress_delivery: event.suppress_delivery(),
        survey_id: event.survey_id,
        notification_type: event.notification_type,
        routing,
    }
}

/// POST /api/v1/hooks/before-notification-send
#[tracing::instrument(name = "api.before_notification_send", skip_all)]
pub async fn before_notification_send(
    State(state): State<AppState>,
    Json(request): Json<NotificationRequest>,
) -> Result<Json<NotificationResponse>> {
    let span = tracing::Span::current();
    attributes::record(&span, attributes::survey_id(&request.survey_id));
    attributes::record(
        &span,
        attributes::notification_type(request.notification_type.as_str()),
    );

    let mut event = NotificationSendEvent::new(to_event(&state, request));
    state.hooks.fire(&mut event).await?;

    let decision = event
        .decision
        .ok_or_else(|| AppError::Internal("no routing handler registered".to_string()))?;
    attributes::record(&span, attributes::decision(decision.label()));

    Ok(Json(to_response(event.notification, decision)))
}

/// POST /api/v1/hooks/before-notification-send/batch
///
/// Each event goes through the same hook as the single endpoint, in order.
/// The first handler error halts the batch; the reply then carries the
/// results completed so far and the failing index.
#[tracing::instrument(name = "api.before_notification_send_batch", skip_all)]
pub async fn before_notification_send_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchNotificationRequest>,
) -> Response {
    let total = request.events.len();
    attributes::record(&tracing::Span::current(), attributes::batch_size(total));

    let mut results = Vec::with_capacity(total);
    for (index, request) in request.events.into_iter().enumerate() {
        let mut event = NotificationSendEvent::new(to_event(&state, request));
        let fired = state.hooks.fire(&mut event).await.map_err(AppError::from);

        match fired.and_then(|()| {
            event
                .decision
                .take()
                .ok_or_else(|| AppError::Internal("no routing handler registered".to_string()))
        }) {
            Ok(decision) => results.push(to_response(event.notification, decision)),
            Err(error) => {
                RoutingMetrics::record_batch_halted();
                return halted_response(index, total, results, error);
            }
        }
    }

    Json(BatchNotificationResponse {
        processed: results.len(),
        results,
    })
    .into_response()
}

fn halted_response(
    index: usize,
    total: usize,
    results: Vec<NotificationResponse>,
    error: AppError,
) -> Response {
    let (status, code, message, log_message) = error.parts();
    tracing::error!(
        code = %code,
        status = %status.as_u16(),
        index,
        unrouted = total - index - 1,
        message = %log_message,
        "Notification batch halted"
    );

    let body = BatchHaltedResponse {
        error: HaltedError {
            code,
            message,
            index,
            suppress_delivery: error.suppress_delivery().unwrap_or(false),
        },
        processed: results.len(),
        results,
    };

    let status = if status.is_success() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        status
    };
    (status, Json(body)).into_response()
}
