use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::hooks::HookError;
use crate::routing::RoutingError;
use crate::schema::SchemaError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Settings store error: {0}")]
    Store(#[from] StoreError),
}

impl From<HookError> for AppError {
    fn from(err: HookError) -> Self {
        match err {
            HookError::Routing(e) => AppError::Routing(e),
            HookError::Schema(e) => AppError::Schema(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    /// Present for routing errors: whether the email was already suppressed
    #[serde(skip_serializing_if = "Option::is_none")]
    suppress_delivery: Option<bool>,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

fn hidden_in_production(log_msg: &str, public: &str) -> String {
    if is_production() {
        public.to_string()
    } else {
        log_msg.to_string()
    }
}

impl AppError {
    pub(crate) fn parts(&self) -> (StatusCode, &'static str, String, String) {
        match self {
            AppError::Config(e) => {
                let log_msg = e.to_string();
                let client_msg = hidden_in_production(&log_msg, "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR", client_msg, log_msg)
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                msg.clone(),
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                msg.clone(),
            ),
            AppError::Internal(e) => {
                let client_msg = hidden_in_production(e, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", client_msg, e.clone())
            }
            // Operator-facing: the message tells the administrator what to fix
            AppError::Routing(e @ RoutingError::Configuration { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CONFIGURATION_ERROR",
                e.to_string(),
                e.to_string(),
            ),
            AppError::Routing(e @ RoutingError::Dispatch { .. }) => {
                let log_msg = e.to_string();
                let client_msg = hidden_in_production(&log_msg, "Message provider failure");
                (StatusCode::BAD_GATEWAY, "DISPATCH_FAILURE", client_msg, log_msg)
            }
            AppError::Routing(RoutingError::Store(e)) | AppError::Store(e) => {
                let log_msg = e.to_string();
                let client_msg = hidden_in_production(&log_msg, "Service temporarily unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_ERROR", client_msg, log_msg)
            }
            AppError::Schema(SchemaError::Store(e)) => {
                let log_msg = e.to_string();
                let client_msg = hidden_in_production(&log_msg, "Service temporarily unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "STORE_ERROR", client_msg, log_msg)
            }
            AppError::Schema(e) => (
                StatusCode::BAD_REQUEST,
                "INVALID_SETTING",
                e.to_string(),
                e.to_string(),
            ),
        }
    }

    pub(crate) fn suppress_delivery(&self) -> Option<bool> {
        match self {
            AppError::Routing(e) => Some(e.suppressed_delivery()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, client_message, log_message) = self.parts();

        // Always log the detailed error server-side
        tracing::error!(
            code = %code,
            status = %status.as_u16(),
            message = %log_message,
            "API error"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
                suppress_delivery: self.suppress_delivery(),
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DeliveryOutcome;

    #[test]
    fn test_configuration_error_status() {
        let err = AppError::from(RoutingError::Configuration {
            survey_id: "1".to_string(),
            token: "t".to_string(),
        });
        let (status, code, message, _) = err.parts();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "CONFIGURATION_ERROR");
        assert!(message.contains("disable SMS routing"));
        assert_eq!(err.suppress_delivery(), Some(false));
    }

    #[test]
    fn test_dispatch_error_status() {
        let err = AppError::from(RoutingError::Dispatch {
            survey_id: "1".to_string(),
            destination: "+1".to_string(),
            detail: "timeout".to_string(),
            outcome: DeliveryOutcome::failed("timeout"),
        });
        let (status, code, _, _) = err.parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "DISPATCH_FAILURE");
        assert_eq!(err.suppress_delivery(), Some(true));
    }

    #[test]
    fn test_schema_error_is_bad_request() {
        let err = AppError::from(HookError::Schema(SchemaError::UnknownKey("Foo".into())));
        let (status, code, _, _) = err.parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "INVALID_SETTING");
        assert_eq!(err.suppress_delivery(), None);
    }

    #[test]
    fn test_store_error_is_unavailable() {
        let err = AppError::from(StoreError::Unavailable("down".into()));
        let (status, code, _, _) = err.parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "STORE_ERROR");
    }
}
