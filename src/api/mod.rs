//! API layer - HTTP endpoint handlers organized by domain.

mod health;
mod hooks;
mod metrics;
mod routes;
mod settings;

pub use health::{health, HealthResponse};
pub use hooks::{
    before_notification_send, before_notification_send_batch, BatchNotificationRequest,
    BatchNotificationResponse, NotificationRequest, NotificationResponse,
};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use settings::{
    get_global_settings, get_survey_settings, put_global_settings, put_survey_settings,
    SettingsPageResponse, SettingsSavedResponse,
};
