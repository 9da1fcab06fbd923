use axum::{
    Router, middleware,
    routing::{get, post},
};
#[cfg(feature = "docs")]
use utoipa::OpenApi;
#[cfg(feature = "docs")]
use utoipa_swagger_ui::SwaggerUi;

use crate::incoming::http_axum::{
    handlers::{
        health::health_check,
        moderation::{ban_user, banned_users, purge_preview},
    },
    middleware::{moderator_auth::require_moderator_token, request_id::set_request_id},
};
use crate::shared::app_state::AppState;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::docs::ApiDoc;

pub fn build_application_router(state: &AppState) -> Router<AppState> {
    let core_routes = build_core_routes();
    let moderation_routes = build_moderation_routes(state);

    core_routes.merge(moderation_routes)
}

fn build_core_routes() -> Router<AppState> {
    let router = Router::new().route("/health", get(health_check));

    #[cfg(feature = "docs")]
    {
        router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
    }

    #[cfg(not(feature = "docs"))]
    {
        router
    }
}

fn build_moderation_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/moderation/bans", post(ban_user))
        .route(
            "/api/moderation/courses/{course_id}/banned-users",
            get(banned_users),
        )
        .route(
            "/api/moderation/courses/{course_id}/purge-preview",
            get(purge_preview),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_moderator_token,
        ))
        .layer(middleware::from_fn(set_request_id))
}
