//! Per-event routing: decides between email and text message, renders the
//! message and hands it to the dispatch adapter.

use std::sync::Arc;

use crate::dispatch::DispatchAdapter;
use crate::link::SurveyLinkBuilder;
use crate::metrics::RoutingMetrics;
use crate::schema::{parse_flag, SettingKey};
use crate::store::{Scope, SettingsResolver};
use crate::template::{render, TemplateBindings, DEFAULT_MESSAGE_TEMPLATE};

use super::error::{BatchHalted, RoutingError};
use super::types::{
    NotificationEvent, RecipientRoute, RenderedMessage, RoutingDecision, SkipReason,
};

/// Routes outbound survey notifications.
///
/// Holds no per-event state; one instance serves all surveys.
pub struct NotificationRouter {
    resolver: SettingsResolver,
    link_builder: Arc<dyn SurveyLinkBuilder>,
    dispatcher: Arc<DispatchAdapter>,
}

impl NotificationRouter {
    pub fn new(
        resolver: SettingsResolver,
        link_builder: Arc<dyn SurveyLinkBuilder>,
        dispatcher: Arc<DispatchAdapter>,
    ) -> Self {
        Self {
            resolver,
            link_builder,
            dispatcher,
        }
    }

    /// Route one event.
    ///
    /// On `RedirectToMessage` (and on a dispatch failure) the event's
    /// `suppress_delivery` flag is set; in every other case the event is left
    /// untouched. The dispatch call, if any, completes before this returns.
    #[tracing::instrument(
        name = "router.route",
        skip(self, event),
        fields(
            survey_id = %event.survey_id,
            notification_type = %event.notification_type,
            token = %event.recipient.token
        )
    )]
    pub async fn route(
        &self,
        event: &mut NotificationEvent,
    ) -> Result<RoutingDecision, RoutingError> {
        let result = self.decide(event).await;

        match &result {
            Ok(decision) => {
                RoutingMetrics::record_decision(decision.label());
                tracing::debug!(
                    decision = decision.label(),
                    suppressed = event.suppress_delivery(),
                    "Notification routed"
                );
            }
            Err(e) => {
                RoutingMetrics::record_decision(e.label());
                tracing::error!(
                    error = %e,
                    suppressed = event.suppress_delivery(),
                    "Notification routing failed"
                );
            }
        }

        result
    }

    /// Route events in order, stopping at the first routing error.
    ///
    /// Events after the failing one are left unrouted and unsuppressed.
    pub async fn route_batch(
        &self,
        events: &mut [NotificationEvent],
    ) -> Result<Vec<RoutingDecision>, BatchHalted> {
        let total = events.len();
        let mut completed = Vec::with_capacity(total);

        for (index, event) in events.iter_mut().enumerate() {
            match self.route(event).await {
                Ok(decision) => completed.push(decision),
                Err(error) => {
                    RoutingMetrics::record_batch_halted();
                    tracing::error!(
                        index,
                        unrouted = total - index - 1,
                        "Notification batch halted"
                    );
                    return Err(BatchHalted {
                        index,
                        completed,
                        error,
                    });
                }
            }
        }

        Ok(completed)
    }

    async fn decide(
        &self,
        event: &mut NotificationEvent,
    ) -> Result<RoutingDecision, RoutingError> {
        let scope = Scope::survey(event.survey_id.clone());

        if !self.is_enabled(&scope).await? {
            return Ok(RoutingDecision::SkippedDisabled {
                reason: SkipReason::Disabled,
            });
        }

        if !event.notification_type.is_routable() {
            return Ok(RoutingDecision::SkippedDisabled {
                reason: SkipReason::UnsupportedType,
            });
        }

        let destination = match event.recipient.route() {
            RecipientRoute::Missing => {
                return Err(RoutingError::Configuration {
                    survey_id: event.survey_id.clone(),
                    token: event.recipient.token.clone(),
                });
            }
            RecipientRoute::Email => return Ok(RoutingDecision::EmailAllowed),
            RecipientRoute::Message(destination) => destination.to_string(),
        };

        // Suppress only once the message exists; a store failure leaves the
        // event for email delivery.
        let body = self.render_body(event, &scope).await?;
        event.suppress();

        let message = RenderedMessage { body, destination };

        if !event.notification_type.dispatches() {
            tracing::debug!("Confirmation suppressed without sending a message");
            return Ok(RoutingDecision::RedirectToMessage {
                message,
                delivery: None,
            });
        }

        let outcome = self
            .dispatcher
            .send(&message, event.recipient.client.as_deref())
            .await;

        if !outcome.success {
            return Err(RoutingError::Dispatch {
                survey_id: event.survey_id.clone(),
                destination: message.destination,
                detail: outcome
                    .detail
                    .clone()
                    .unwrap_or_else(|| "provider reported failure".to_string()),
                outcome,
            });
        }

        Ok(RoutingDecision::RedirectToMessage {
            message,
            delivery: Some(outcome),
        })
    }

    async fn is_enabled(&self, scope: &Scope) -> Result<bool, RoutingError> {
        let key = SettingKey::EnableSendSms;
        let raw = self
            .resolver
            .resolve(key.as_str(), scope, key.default_value())
            .await?;
        Ok(parse_flag(&raw))
    }

    /// Resolve the template (empty → built-in default) and render it.
    async fn render_body(
        &self,
        event: &NotificationEvent,
        scope: &Scope,
    ) -> Result<String, RoutingError> {
        let key = SettingKey::MessageBody;
        let configured = self
            .resolver
            .resolve(key.as_str(), scope, key.default_value())
            .await?;
        let template = if configured.trim().is_empty() {
            DEFAULT_MESSAGE_TEMPLATE
        } else {
            configured.as_str()
        };

        let recipient = &event.recipient;
        let survey_url = self
            .link_builder
            .build_link(&event.survey_id, &recipient.token);
        let bindings = TemplateBindings::for_recipient(
            recipient.first_name.as_str(),
            recipient.last_name.as_str(),
            survey_url,
        );

        Ok(render(template, &bindings))
    }
}
