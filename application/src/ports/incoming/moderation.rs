use std::sync::Arc;

use crate::error::AppResult;
use domain::{
    course::CourseId,
    moderation::{Ban, BanRequest, BanScope, PurgePreview},
    notification::EscalationResult,
    user::UserId,
};

/// Entry point for moderator ban actions. Safe to call from both web-request
/// and background-task contexts; authorization is the caller's concern.
#[async_trait::async_trait]
pub trait ModerationUseCase: Send + Sync {
    /// Records the ban, purges the banned user's authored content within the
    /// requested scope, and dispatches the escalation notification.
    async fn escalate_ban(&self, request: BanRequest) -> AppResult<EscalationResult>;

    /// Counts what a purge would delete, without deleting anything.
    async fn preview_purge(
        &self,
        user_id: UserId,
        scope: BanScope,
        course_id: CourseId,
    ) -> AppResult<PurgePreview>;

    /// Active course-scope bans for the course plus organization-scope bans
    /// for its org.
    async fn list_banned_users(&self, course_id: CourseId) -> AppResult<Vec<Ban>>;
}

pub type DynModerationUseCase = Arc<dyn ModerationUseCase>;
