use std::io;
use thiserror::Error;

use domain::error::DomainError;
use domain::moderation::PurgeOutcome;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("User {user_id} does not exist")]
    UserNotFound { user_id: i64 },

    #[error("Content purge failed: {message}")]
    PurgeFailed { message: String },

    /// Dispatch failed after the purge already ran; the observed counts ride
    /// along so the caller can still report them.
    #[error("Failed to send ban escalation email: {message}")]
    DispatchFailed {
        message: String,
        purge: PurgeOutcome,
    },

    #[error("Template error: {message}")]
    TemplateError { message: String },

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("External service error: {message}")]
    ExternalServiceError { message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal server error")]
    InternalServerError,
}

pub type AppResult<T> = Result<T, AppError>;
