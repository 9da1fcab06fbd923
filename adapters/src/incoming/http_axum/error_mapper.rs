use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

use forummod_application::error::AppError;

pub struct HttpError(pub AppError);

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        match app_error {
            AppError::Domain(_)
            | AppError::ValidationError { .. }
            | AppError::JsonError(_)
            | AppError::NotFound { .. }
            | AppError::UserNotFound { .. } => {
                debug!("Client error response generated: {}", app_error);
            }
            _ => {
                error!("Server error response generated: {}", app_error);
            }
        }

        let (status_code, message) = match app_error {
            AppError::Domain(_) => (StatusCode::BAD_REQUEST, app_error.to_string()),

            AppError::ValidationError { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, app_error.to_string())
            }

            AppError::UserNotFound { .. } => (StatusCode::NOT_FOUND, app_error.to_string()),

            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),

            AppError::JsonError(_) => (StatusCode::BAD_REQUEST, "Invalid JSON format".to_string()),

            AppError::PurgeFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, app_error.to_string())
            }

            AppError::DispatchFailed { .. } => (StatusCode::BAD_GATEWAY, app_error.to_string()),

            AppError::TemplateError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Template error".to_string(),
            ),

            AppError::ConfigError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),

            AppError::DatabaseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),

            AppError::ExternalServiceError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "External service error".to_string(),
            ),

            AppError::IoError(_) | AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),

            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),

            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
        };

        // the purge already ran when dispatch fails; surface the counts so
        // the caller can report "ban recorded, notification failed"
        let error_response = if let AppError::DispatchFailed { purge, .. } = app_error {
            json!({
                "ok": false,
                "error": message,
                "status": status_code.as_u16(),
                "purge": purge
            })
        } else {
            json!({
                "ok": false,
                "error": message,
                "status": status_code.as_u16()
            })
        };

        (status_code, Json(error_response)).into_response()
    }
}

impl From<AppError> for HttpError {
    fn from(app_error: AppError) -> Self {
        HttpError(app_error)
    }
}
