use std::fmt;
use serde::Serialize;

use crate::course::CourseId;
use crate::moderation::{BanScope, PurgeOutcome};
use crate::user::UserProfile;

/// Substituted for an empty or absent ban reason, exactly once, when the
/// context is built.
pub const NO_REASON_PROVIDED: &str = "No reason provided";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Templated,
    Plaintext,
    None,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Templated => "templated",
            Self::Plaintext => "plaintext",
            Self::None => "none",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The immutable record handed to whichever transport dispatches the
/// escalation. Identities are substituted verbatim; the reason is normalized
/// here so downstream consumers never branch on emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationContext {
    pub banned_username: String,
    pub banned_email: String,
    pub banned_user_id: i64,
    pub moderator_username: String,
    pub moderator_email: String,
    pub moderator_user_id: i64,
    pub course_id: String,
    pub scope: BanScope,
    pub reason: String,
    pub threads_deleted: u64,
    pub comments_deleted: u64,
    pub total_deleted: u64,
}

impl NotificationContext {
    pub fn new(
        banned: &UserProfile,
        moderator: &UserProfile,
        course_id: &CourseId,
        scope: BanScope,
        reason: Option<&str>,
        purge: &PurgeOutcome,
    ) -> Self {
        let reason = match reason {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => NO_REASON_PROVIDED.to_string(),
        };

        Self {
            banned_username: banned.username.clone(),
            banned_email: banned.email.clone(),
            banned_user_id: banned.id.as_i64(),
            moderator_username: moderator.username.clone(),
            moderator_email: moderator.email.clone(),
            moderator_user_id: moderator.id.as_i64(),
            course_id: course_id.to_string(),
            scope,
            reason,
            threads_deleted: purge.threads_deleted,
            comments_deleted: purge.comments_deleted,
            total_deleted: purge.total(),
        }
    }
}

/// Message submitted to the templated transport.
#[derive(Debug, Clone, Serialize)]
pub struct TemplatedMessage {
    pub app_label: String,
    pub template_name: String,
    pub recipient: String,
    pub context: NotificationContext,
}

/// Pre-rendered mail submitted to the plain-text transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub subject: String,
    pub body: String,
    pub from_address: String,
    pub recipients: Vec<String>,
}

/// Result of asking the template loader for a named template. A missing
/// template is ordinary control flow, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateLookup {
    Rendered(String),
    NotFound,
}

#[derive(Debug, Clone, Serialize)]
pub struct EscalationResult {
    pub dispatched: bool,
    pub transport: TransportKind,
    pub purge: PurgeOutcome,
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::user::UserId;

    fn profiles() -> (UserProfile, UserProfile) {
        (
            UserProfile {
                id: UserId::new(42),
                username: "spammer".to_string(),
                email: "spammer@example.com".to_string(),
            },
            UserProfile {
                id: UserId::new(3),
                username: "mod1".to_string(),
                email: "mod@example.com".to_string(),
            },
        )
    }

    #[test]
    fn identities_are_substituted_verbatim() {
        let (banned, moderator) = profiles();
        let purge = PurgeOutcome {
            threads_deleted: 3,
            comments_deleted: 7,
            partial: false,
        };
        let ctx = NotificationContext::new(
            &banned,
            &moderator,
            &CourseId::new("course-v1:TestX+CS101+2024"),
            BanScope::Course,
            Some("Posting scam links"),
            &purge,
        );

        assert_eq!(ctx.banned_username, "spammer");
        assert_eq!(ctx.banned_email, "spammer@example.com");
        assert_eq!(ctx.banned_user_id, 42);
        assert_eq!(ctx.moderator_username, "mod1");
        assert_eq!(ctx.course_id, "course-v1:TestX+CS101+2024");
        assert_eq!(ctx.reason, "Posting scam links");
        assert_eq!(ctx.threads_deleted, 3);
        assert_eq!(ctx.comments_deleted, 7);
    }

    #[test]
    fn total_deleted_is_the_sum_of_counts() {
        let (banned, moderator) = profiles();
        let purge = PurgeOutcome {
            threads_deleted: 15,
            comments_deleted: 25,
            partial: true,
        };
        let ctx = NotificationContext::new(
            &banned,
            &moderator,
            &CourseId::new("course-v1:TestX+CS101+2024"),
            BanScope::Organization,
            Some("Multiple violations"),
            &purge,
        );
        assert_eq!(ctx.total_deleted, 40);
    }

    #[test]
    fn empty_reason_is_normalized_once() {
        let (banned, moderator) = profiles();
        let ctx = NotificationContext::new(
            &banned,
            &moderator,
            &CourseId::new("course-v1:TestX+CS101+2024"),
            BanScope::Course,
            Some(""),
            &PurgeOutcome::default(),
        );
        assert_eq!(ctx.reason, NO_REASON_PROVIDED);
    }

    #[test]
    fn absent_reason_is_normalized() {
        let (banned, moderator) = profiles();
        let ctx = NotificationContext::new(
            &banned,
            &moderator,
            &CourseId::new("course-v1:TestX+CS101+2024"),
            BanScope::Course,
            None,
            &PurgeOutcome::default(),
        );
        assert_eq!(ctx.reason, NO_REASON_PROVIDED);
    }

    #[test]
    fn context_serializes_scope_lowercase() {
        let (banned, moderator) = profiles();
        let ctx = NotificationContext::new(
            &banned,
            &moderator,
            &CourseId::new("course-v1:TestX+CS101+2024"),
            BanScope::Organization,
            None,
            &PurgeOutcome::default(),
        );
        let value = serde_json::to_value(&ctx).unwrap();
        assert_eq!(value["scope"], "organization");
        assert_eq!(value["reason"], NO_REASON_PROVIDED);
    }
}
