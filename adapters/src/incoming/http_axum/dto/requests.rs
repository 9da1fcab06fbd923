use serde::{Deserialize, Serialize};
#[cfg(feature = "docs")]
use utoipa::ToSchema;
use validator::Validate;

use domain::{
    course::CourseId,
    moderation::{BanRequest, BanScope},
    user::UserId,
};

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Request to ban a learner from discussions, purge their authored content within the scope, and escalate to support.",
    example = json!({
        "user_id": 42,
        "moderator_user_id": 3,
        "course_id": "course-v1:TestX+CS101+2024",
        "scope": "course",
        "reason": "Posting scam links"
    })
))]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BanUserRequest {
    #[cfg_attr(feature = "docs", schema(example = 42))]
    pub user_id: i64,

    #[cfg_attr(feature = "docs", schema(example = 3))]
    pub moderator_user_id: i64,

    #[cfg_attr(feature = "docs", schema(example = "course-v1:TestX+CS101+2024"))]
    #[validate(length(min = 1, message = "course_id cannot be empty"))]
    pub course_id: String,

    #[cfg_attr(feature = "docs", schema(example = "course"))]
    pub scope: BanScope,

    #[cfg_attr(feature = "docs", schema(example = "Posting scam links"))]
    pub reason: Option<String>,
}

impl BanUserRequest {
    #[must_use]
    pub fn into_ban_request(self) -> BanRequest {
        BanRequest {
            banned_user_id: UserId::new(self.user_id),
            moderator_user_id: UserId::new(self.moderator_user_id),
            course_id: CourseId::new(self.course_id),
            scope: self.scope,
            reason: self.reason,
        }
    }
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgePreviewParams {
    pub user_id: i64,
    #[serde(default = "default_scope")]
    pub scope: BanScope,
}

fn default_scope() -> BanScope {
    BanScope::Course
}
