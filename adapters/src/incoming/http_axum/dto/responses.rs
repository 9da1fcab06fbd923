use serde::Serialize;
use time::format_description::well_known::Rfc3339;
#[cfg(feature = "docs")]
use utoipa::ToSchema;
use uuid::Uuid;

use domain::{
    moderation::{Ban, PurgePreview},
    notification::EscalationResult,
};

fn format_datetime(dt: time::OffsetDateTime) -> String {
    dt.format(&Rfc3339).unwrap_or_else(|_| dt.to_string())
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Standard API response wrapper with success indicator, optional error message, and optional data payload",
    example = json!({
        "ok": true,
        "data": {
            "dispatched": true,
            "transport": "templated"
        }
    })
))]
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
            data: None,
        }
    }

    #[must_use]
    pub fn success_with_data(data: Option<T>) -> Self {
        Self {
            ok: true,
            error: None,
            data,
        }
    }
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct EscalationResponse {
    pub dispatched: bool,
    pub transport: String,
    pub threads_deleted: u64,
    pub comments_deleted: u64,
    pub total_deleted: u64,
    pub partial: bool,
}

impl From<EscalationResult> for EscalationResponse {
    fn from(result: EscalationResult) -> Self {
        Self {
            dispatched: result.dispatched,
            transport: result.transport.as_str().to_string(),
            threads_deleted: result.purge.threads_deleted,
            comments_deleted: result.purge.comments_deleted,
            total_deleted: result.purge.total(),
            partial: result.purge.partial,
        }
    }
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct BannedUserResponse {
    pub id: Uuid,
    pub user_id: i64,
    pub course_id: String,
    pub scope: String,
    pub banned_by: i64,
    pub reason: String,
    pub banned_at: String,
}

impl From<Ban> for BannedUserResponse {
    fn from(ban: Ban) -> Self {
        Self {
            id: ban.id,
            user_id: ban.user_id.as_i64(),
            course_id: ban.course_id.to_string(),
            scope: ban.scope.as_str().to_string(),
            banned_by: ban.banned_by.as_i64(),
            reason: ban.reason,
            banned_at: format_datetime(ban.banned_at),
        }
    }
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct PurgePreviewResponse {
    pub thread_count: u64,
    pub comment_count: u64,
}

impl From<PurgePreview> for PurgePreviewResponse {
    fn from(preview: PurgePreview) -> Self {
        Self {
            thread_count: preview.thread_count,
            comment_count: preview.comment_count,
        }
    }
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}
