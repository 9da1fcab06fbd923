use domain::notification::NotificationContext;

pub struct EscalationEmail;

impl EscalationEmail {
    pub fn subject(context: &NotificationContext) -> String {
        format!(
            "Discussion Ban Alert: {} in {}",
            context.banned_username, context.course_id
        )
    }

    /// Body used when no `ban_escalation_email.txt` template is deployed.
    pub fn fallback_body(context: &NotificationContext) -> String {
        format!(
            r"A user has been banned from discussions:

Banned User: {} ({})
Moderator: {} ({})
Course: {}
Scope: {}
Reason: {}
Content Deleted: {} threads, {} comments

Please review this moderation action and follow up as needed.",
            context.banned_username,
            context.banned_email,
            context.moderator_username,
            context.moderator_email,
            context.course_id,
            context.scope.as_str().to_uppercase(),
            context.reason,
            context.threads_deleted,
            context.comments_deleted,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use domain::course::CourseId;
    use domain::moderation::{BanScope, PurgeOutcome};
    use domain::notification::NO_REASON_PROVIDED;
    use domain::user::{UserId, UserProfile};

    fn context(scope: BanScope, reason: Option<&str>, purge: PurgeOutcome) -> NotificationContext {
        let banned = UserProfile {
            id: UserId::new(42),
            username: "spammer".to_string(),
            email: "spammer@example.com".to_string(),
        };
        let moderator = UserProfile {
            id: UserId::new(3),
            username: "mod1".to_string(),
            email: "mod@example.com".to_string(),
        };
        NotificationContext::new(
            &banned,
            &moderator,
            &CourseId::new("course-v1:TestX+CS101+2024"),
            scope,
            reason,
            &purge,
        )
    }

    #[test]
    fn subject_contains_username_and_course_verbatim() {
        let ctx = context(BanScope::Course, None, PurgeOutcome::default());
        assert_eq!(
            EscalationEmail::subject(&ctx),
            "Discussion Ban Alert: spammer in course-v1:TestX+CS101+2024"
        );
    }

    #[test]
    fn fallback_body_matches_the_expected_layout() {
        let purge = PurgeOutcome {
            threads_deleted: 3,
            comments_deleted: 7,
            partial: false,
        };
        let ctx = context(BanScope::Course, Some("Posting scam links"), purge);

        let expected = "A user has been banned from discussions:\n\
            \n\
            Banned User: spammer (spammer@example.com)\n\
            Moderator: mod1 (mod@example.com)\n\
            Course: course-v1:TestX+CS101+2024\n\
            Scope: COURSE\n\
            Reason: Posting scam links\n\
            Content Deleted: 3 threads, 7 comments\n\
            \n\
            Please review this moderation action and follow up as needed.";
        assert_eq!(EscalationEmail::fallback_body(&ctx), expected);
    }

    #[test]
    fn organization_scope_is_uppercased() {
        let ctx = context(BanScope::Organization, None, PurgeOutcome::default());
        assert!(EscalationEmail::fallback_body(&ctx).contains("Scope: ORGANIZATION"));
    }

    #[test]
    fn empty_reason_renders_the_default() {
        let ctx = context(BanScope::Course, Some(""), PurgeOutcome::default());
        let body = EscalationEmail::fallback_body(&ctx);
        assert!(body.contains(&format!("Reason: {NO_REASON_PROVIDED}")));
    }

    #[test]
    fn zero_counts_are_still_well_formed() {
        let ctx = context(BanScope::Course, None, PurgeOutcome::default());
        assert!(
            EscalationEmail::fallback_body(&ctx).contains("Content Deleted: 0 threads, 0 comments")
        );
    }
}
