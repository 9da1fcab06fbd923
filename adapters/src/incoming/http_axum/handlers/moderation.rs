use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use validator::Validate;

use crate::incoming::http_axum::{
    dto::{
        requests::{BanUserRequest, PurgePreviewParams},
        responses::{ApiResponse, BannedUserResponse, EscalationResponse, PurgePreviewResponse},
    },
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;
use domain::{course::CourseId, user::UserId};
use forummod_application::error::AppError;

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/api/moderation/bans",
    tag = "moderation",
    request_body = BanUserRequest,
    responses(
        (status = 201, description = "Ban recorded, content purged, escalation dispatched", body = EscalationResponse),
        (status = 404, description = "User not found"),
        (status = 422, description = "Invalid request data"),
        (status = 502, description = "Escalation dispatch failed after the purge ran")
    ),
    security(
        ("moderator_token" = [])
    )
))]
#[instrument(skip(state, request))]
pub async fn ban_user(
    State(state): State<AppState>,
    Json(request): Json<BanUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EscalationResponse>>), HttpError> {
    request.validate().map_err(|e| {
        HttpError(AppError::ValidationError {
            message: e.to_string(),
        })
    })?;

    let result = state
        .moderation_use_case
        .escalate_ban(request.into_ban_request())
        .await?;

    let response = ApiResponse::success_with_data(Some(EscalationResponse::from(result)));
    Ok((StatusCode::CREATED, Json(response)))
}

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/api/moderation/courses/{course_id}/banned-users",
    tag = "moderation",
    responses(
        (status = 200, description = "Active bans visible from this course", body = Vec<BannedUserResponse>),
        (status = 401, description = "Not authenticated")
    ),
    security(
        ("moderator_token" = [])
    )
))]
#[instrument(skip(state))]
pub async fn banned_users(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<BannedUserResponse>>>, HttpError> {
    let bans = state
        .moderation_use_case
        .list_banned_users(CourseId::new(course_id))
        .await?;

    let responses: Vec<BannedUserResponse> =
        bans.into_iter().map(BannedUserResponse::from).collect();
    Ok(Json(ApiResponse::success_with_data(Some(responses))))
}

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/api/moderation/courses/{course_id}/purge-preview",
    tag = "moderation",
    responses(
        (status = 200, description = "Counts of content a purge would delete", body = PurgePreviewResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(
        ("moderator_token" = [])
    )
))]
#[instrument(skip(state))]
pub async fn purge_preview(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(params): Query<PurgePreviewParams>,
) -> Result<Json<ApiResponse<PurgePreviewResponse>>, HttpError> {
    let preview = state
        .moderation_use_case
        .preview_purge(
            UserId::new(params.user_id),
            params.scope,
            CourseId::new(course_id),
        )
        .await?;

    Ok(Json(ApiResponse::success_with_data(Some(
        PurgePreviewResponse::from(preview),
    ))))
}
