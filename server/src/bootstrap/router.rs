use axum::{Router, http::HeaderValue};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use forummod_adapters::incoming::http_axum::routes::build_application_router;
use forummod_adapters::shared::app_state::AppState;

pub fn create_router(state: &AppState) -> Router {
    let router = build_application_router(state).with_state(state.clone());

    match &state.config.server.cors_origin {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(origin) => router.layer(
                CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparsable CORS origin");
                router
            }
        },
        None => router,
    }
}
