// HTTP error mapping
use crate::application::logs_volume_service::LogsVolumeError;
use crate::application::policy_service::SubmitError;
use crate::domain::error::ValidationError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid routing policy")]
    Validation(Vec<ValidationError>),

    #[error("{0}")]
    Unprocessable(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(errors) => ApiError::Validation(errors),
            SubmitError::Store(e) => ApiError::Internal(format!("{:#}", e)),
        }
    }
}

impl From<LogsVolumeError> for ApiError {
    fn from(err: LogsVolumeError) -> Self {
        match err {
            LogsVolumeError::Grouping(e) => ApiError::Unprocessable(e.to_string()),
            e @ LogsVolumeError::Source(_) => ApiError::Upstream(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::Unprocessable(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = match &self {
            ApiError::Validation(errors) => Json(json!({
                "message": self.to_string(),
                "errors": errors
                    .iter()
                    .map(|e| json!({
                        "field": e.field_name(),
                        "message": e.to_string(),
                        "detail": e,
                    }))
                    .collect::<Vec<_>>(),
            })),
            _ => Json(json!({ "message": self.to_string() })),
        };

        (status, body).into_response()
    }
}
