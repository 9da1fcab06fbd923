use axum::Json;

use crate::incoming::http_axum::dto::responses::{ApiResponse, HealthResponse};

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
))]
#[allow(clippy::unused_async)]
pub async fn health_check() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success_with_data(Some(HealthResponse {
        status: "ok".to_string(),
    })))
}
