use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::server::{api_key_auth, AppState};

use super::health::health;
use super::hooks::{before_notification_send, before_notification_send_batch};
use super::metrics::prometheus_metrics;
use super::settings::{
    get_global_settings, get_survey_settings, put_global_settings, put_survey_settings,
};

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .nest(
            "/api/v1",
            Router::new()
                // Notification hooks
                .route(
                    "/hooks/before-notification-send",
                    post(before_notification_send),
                )
                .route(
                    "/hooks/before-notification-send/batch",
                    post(before_notification_send_batch),
                )
                // Settings pages
                .route(
                    "/surveys/{survey_id}/settings",
                    get(get_survey_settings).put(put_survey_settings),
                )
                .route(
                    "/settings/global",
                    get(get_global_settings).put(put_global_settings),
                )
                .route_layer(middleware::from_fn_with_state(state, api_key_auth)),
        )
}
