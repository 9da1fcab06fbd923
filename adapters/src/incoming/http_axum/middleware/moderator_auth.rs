use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::incoming::http_axum::error_mapper::HttpError;
use crate::shared::app_state::AppState;
use forummod_application::error::AppError;

/// Bearer-token gate for the moderation endpoints. The orchestrator trusts
/// its caller for authorization; this is the adapter-level check that the
/// caller is one of ours.
pub async fn require_moderator_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let Some(expected) = state.config.moderation.api_token.as_deref() else {
        // refuse everything rather than run an open moderation API
        return Err(HttpError(AppError::Unauthorized));
    };

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => Ok(next.run(request).await),
        Some(_) => Err(HttpError(AppError::Forbidden)),
        None => Err(HttpError(AppError::Unauthorized)),
    }
}
