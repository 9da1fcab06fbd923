use std::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::course::{CourseId, OrgId};
use crate::user::UserId;

/// Whether a ban covers one course or the course's parent organization.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BanScope {
    Course,
    Organization,
}

impl BanScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Organization => "organization",
        }
    }
}

impl fmt::Display for BanScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a single thread or comment in the discussion content store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(pub String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The concrete slice of the content store a purge runs over, after scope
/// expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeTarget {
    Course(CourseId),
    Organization(OrgId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRequest {
    pub banned_user_id: UserId,
    pub moderator_user_id: UserId,
    /// Always the initiating course, even for organization-scope bans.
    pub course_id: CourseId,
    pub scope: BanScope,
    pub reason: Option<String>,
}

impl BanRequest {
    pub fn validate(&self) -> Result<(), BanError> {
        if self.banned_user_id.as_i64() <= 0 {
            return Err(BanError::InvalidUserId(self.banned_user_id));
        }
        if self.moderator_user_id.as_i64() <= 0 {
            return Err(BanError::InvalidUserId(self.moderator_user_id));
        }
        if self.banned_user_id == self.moderator_user_id {
            return Err(BanError::SelfBan);
        }
        if self.course_id.as_str().is_empty() {
            return Err(BanError::MissingCourse);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BanError {
    #[error("Moderators cannot ban themselves")]
    SelfBan,
    #[error("Invalid user id: {0}")]
    InvalidUserId(UserId),
    #[error("A course id is required")]
    MissingCourse,
}

/// Durable record of a moderation ban.
#[derive(Debug, Clone)]
pub struct Ban {
    pub id: Uuid,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub org: OrgId,
    pub scope: BanScope,
    pub banned_by: UserId,
    pub reason: String,
    pub is_active: bool,
    pub banned_at: time::OffsetDateTime,
    pub created_at: time::OffsetDateTime,
}

impl Ban {
    pub fn new(
        user_id: UserId,
        course_id: CourseId,
        org: OrgId,
        scope: BanScope,
        banned_by: UserId,
        reason: String,
    ) -> Self {
        let now = time::OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            org,
            scope,
            banned_by,
            reason,
            is_active: true,
            banned_at: now,
            created_at: now,
        }
    }
}

/// Counts observed by a completed purge. `partial` is set when iteration
/// stopped before exhausting the candidate set, either because a cap was
/// reached or because a per-item error was swallowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurgeOutcome {
    pub threads_deleted: u64,
    pub comments_deleted: u64,
    pub partial: bool,
}

impl PurgeOutcome {
    pub fn total(&self) -> u64 {
        self.threads_deleted + self.comments_deleted
    }
}

/// Counts reported without deleting anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurgePreview {
    pub thread_count: u64,
    pub comment_count: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn request() -> BanRequest {
        BanRequest {
            banned_user_id: UserId::new(7),
            moderator_user_id: UserId::new(3),
            course_id: CourseId::new("course-v1:TestX+CS101+2024"),
            scope: BanScope::Course,
            reason: Some("Posting scam links".to_string()),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn self_ban_is_rejected() {
        let mut req = request();
        req.moderator_user_id = req.banned_user_id;
        assert!(matches!(req.validate(), Err(BanError::SelfBan)));
    }

    #[test]
    fn non_positive_ids_are_rejected() {
        let mut req = request();
        req.banned_user_id = UserId::new(0);
        assert!(matches!(req.validate(), Err(BanError::InvalidUserId(_))));
    }

    #[test]
    fn empty_course_is_rejected() {
        let mut req = request();
        req.course_id = CourseId::new("");
        assert!(matches!(req.validate(), Err(BanError::MissingCourse)));
    }

    #[test]
    fn scope_serializes_lowercase() {
        assert_eq!(BanScope::Course.as_str(), "course");
        assert_eq!(BanScope::Organization.as_str(), "organization");
        let json = serde_json::to_string(&BanScope::Organization).unwrap();
        assert_eq!(json, "\"organization\"");
    }
}
