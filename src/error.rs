//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::logic::scoring::LoadError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Request errors
    ValidationError(String),

    // Artifact errors (reload)
    ArtifactRejected(String),
    ArtifactUnavailable(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::ArtifactRejected(msg) => {
                tracing::warn!("Artifact rejected: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str())
            }
            AppError::ArtifactUnavailable(msg) => {
                tracing::error!("Artifact unavailable: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Model artifact unavailable")
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        use crate::logic::model::ArtifactError;
        use crate::logic::policy::OverrideError;

        match &err {
            LoadError::Model(ArtifactError::Io { .. }) | LoadError::Overrides(OverrideError::Io { .. }) => {
                AppError::ArtifactUnavailable(err.to_string())
            }
            LoadError::NoSources => AppError::InternalError(err.to_string()),
            _ => AppError::ArtifactRejected(err.to_string()),
        }
    }
}
