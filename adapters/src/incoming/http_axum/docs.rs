use utoipa::OpenApi;

use crate::incoming::http_axum::dto::{requests, responses};
use crate::incoming::http_axum::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::moderation::ban_user,
        handlers::moderation::banned_users,
        handlers::moderation::purge_preview,
    ),
    components(schemas(
        requests::BanUserRequest,
        requests::PurgePreviewParams,
        responses::EscalationResponse,
        responses::BannedUserResponse,
        responses::PurgePreviewResponse,
        responses::HealthResponse,
    )),
    tags(
        (name = "moderation", description = "Ban escalation and content purge endpoints"),
        (name = "health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;
