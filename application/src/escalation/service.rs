use std::sync::Arc;
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::escalation::dispatch::MessageDispatcher;
use crate::ports::incoming::moderation::ModerationUseCase;
use crate::ports::outgoing::ban_store::DynBanStorePort;
use crate::ports::outgoing::content_store::DynContentStorePort;
use crate::ports::outgoing::moderation_config::DynModerationConfigPort;
use crate::ports::outgoing::plain_mail::DynPlainMailPort;
use crate::ports::outgoing::template_loader::DynTemplateLoaderPort;
use crate::ports::outgoing::templated_message::DynTemplatedMessagePort;
use crate::ports::outgoing::user_directory::DynUserDirectoryPort;
use crate::purge::service::ContentPurger;
use domain::{
    course::CourseId,
    moderation::{Ban, BanRequest, BanScope, PurgeOutcome, PurgePreview},
    notification::{EscalationResult, NotificationContext, TransportKind},
    user::{UserId, UserProfile},
};

// Logged messages are part of the observable contract; tests assert on them.
pub const MSG_ESCALATION_SENT: &str = "Ban escalation email sent";
pub const MSG_ESCALATION_SUPPRESSED: &str = "Ban escalation email suppressed by configuration";
pub const MSG_ESCALATION_SEND_FAILED: &str = "Failed to send ban escalation email";
pub const MSG_USER_UNKNOWN: &str = "Cannot escalate ban: user does not exist";
pub const MSG_PURGE_FAILED: &str = "Failed to purge authored content for banned user";

pub struct EscalationService {
    user_directory: DynUserDirectoryPort,
    content_store: DynContentStorePort,
    ban_store: DynBanStorePort,
    config: DynModerationConfigPort,
    purger: ContentPurger,
    dispatcher: MessageDispatcher,
}

impl EscalationService {
    pub fn new(
        user_directory: DynUserDirectoryPort,
        content_store: DynContentStorePort,
        ban_store: DynBanStorePort,
        config: DynModerationConfigPort,
        templated: Option<DynTemplatedMessagePort>,
        plain_mail: DynPlainMailPort,
        template_loader: DynTemplateLoaderPort,
    ) -> Self {
        Self {
            purger: ContentPurger::new(Arc::clone(&content_store)),
            dispatcher: MessageDispatcher::new(templated, plain_mail, template_loader),
            user_directory,
            content_store,
            ban_store,
            config,
        }
    }

    async fn resolve_user(&self, user_id: UserId) -> AppResult<UserProfile> {
        match self.user_directory.find_user(user_id).await? {
            Some(profile) => Ok(profile),
            None => {
                error!(user_id = %user_id, "{}", MSG_USER_UNKNOWN);
                Err(AppError::UserNotFound {
                    user_id: user_id.as_i64(),
                })
            }
        }
    }
}

#[async_trait::async_trait]
impl ModerationUseCase for EscalationService {
    async fn escalate_ban(&self, request: BanRequest) -> AppResult<EscalationResult> {
        let settings = self.config.escalation_settings().await?;
        if !settings.enabled {
            info!(
                banned_user_id = %request.banned_user_id,
                course_id = %request.course_id,
                scope = %request.scope,
                "{}", MSG_ESCALATION_SUPPRESSED
            );
            return Ok(EscalationResult {
                dispatched: false,
                transport: TransportKind::None,
                purge: PurgeOutcome::default(),
            });
        }

        request
            .validate()
            .map_err(|e| AppError::ValidationError {
                message: e.to_string(),
            })?;

        let banned = self.resolve_user(request.banned_user_id).await?;
        let moderator = self.resolve_user(request.moderator_user_id).await?;

        let org = self
            .content_store
            .organization_for_course(&request.course_id)
            .await?;
        let ban = Ban::new(
            banned.id,
            request.course_id.clone(),
            org,
            request.scope,
            moderator.id,
            request.reason.clone().unwrap_or_default(),
        );
        self.ban_store.record_ban(&ban).await?;

        let purge = match self
            .purger
            .purge_authored_content(
                request.banned_user_id,
                request.scope,
                &request.course_id,
                &settings,
            )
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    banned_user_id = %request.banned_user_id,
                    course_id = %request.course_id,
                    error = %e,
                    "{}", MSG_PURGE_FAILED
                );
                return Err(e);
            }
        };

        let context = NotificationContext::new(
            &banned,
            &moderator,
            &request.course_id,
            request.scope,
            request.reason.as_deref(),
            &purge,
        );

        match self.dispatcher.dispatch(&context, &settings).await {
            Ok(transport) => {
                info!(
                    transport = %transport,
                    recipient = %settings.escalation_address,
                    "{}", MSG_ESCALATION_SENT
                );
                Ok(EscalationResult {
                    dispatched: true,
                    transport,
                    purge,
                })
            }
            Err(e) => {
                error!(
                    recipient = %settings.escalation_address,
                    error = %e,
                    "{}", MSG_ESCALATION_SEND_FAILED
                );
                Err(AppError::DispatchFailed {
                    message: e.to_string(),
                    purge,
                })
            }
        }
    }

    async fn preview_purge(
        &self,
        user_id: UserId,
        scope: BanScope,
        course_id: CourseId,
    ) -> AppResult<PurgePreview> {
        self.purger
            .preview_authored_content(user_id, scope, &course_id)
            .await
    }

    async fn list_banned_users(&self, course_id: CourseId) -> AppResult<Vec<Ban>> {
        let org = self
            .content_store
            .organization_for_course(&course_id)
            .await?;
        self.ban_store.list_active_bans(&course_id, &org).await
    }
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
    use crate::config::EscalationSettings;
    use crate::test_support::{
        FakeBanStore, FakeConfigProvider, FakeContentStore, FakePlainMail, FakeTemplateLoader,
        FakeTemplatedTransport, FakeUserDirectory,
    };
    use domain::notification::NO_REASON_PROVIDED;

    struct Harness {
        directory: Arc<FakeUserDirectory>,
        content: Arc<FakeContentStore>,
        bans: Arc<FakeBanStore>,
        config: Arc<FakeConfigProvider>,
        templated: Arc<FakeTemplatedTransport>,
        plain: Arc<FakePlainMail>,
    }

    impl Harness {
        fn service(&self, with_templated: bool) -> EscalationService {
            let templated: Option<DynTemplatedMessagePort> = if with_templated {
                Some(self.templated.clone())
            } else {
                None
            };
            EscalationService::new(
                self.directory.clone(),
                self.content.clone(),
                self.bans.clone(),
                self.config.clone(),
                templated,
                self.plain.clone(),
                Arc::new(FakeTemplateLoader::not_found()),
            )
        }
    }

    fn harness(settings: EscalationSettings, threads: usize, comments: usize) -> Harness {
        let directory = Arc::new(FakeUserDirectory::new());
        directory.insert(42, "spammer", "spammer@example.com");
        directory.insert(3, "mod1", "mod@example.com");
        Harness {
            directory,
            content: Arc::new(FakeContentStore::with_content(
                (0..threads).map(|i| format!("thread-{i}")).collect(),
                (0..comments).map(|i| format!("comment-{i}")).collect(),
            )),
            bans: Arc::new(FakeBanStore::new()),
            config: Arc::new(FakeConfigProvider::new(settings)),
            templated: Arc::new(FakeTemplatedTransport::new()),
            plain: Arc::new(FakePlainMail::new()),
        }
    }

    fn request(scope: BanScope, reason: Option<&str>) -> BanRequest {
        BanRequest {
            banned_user_id: UserId::new(42),
            moderator_user_id: UserId::new(3),
            course_id: CourseId::new("course-v1:TestX+CS101+2024"),
            scope,
            reason: reason.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn disabled_config_short_circuits_without_side_effects() {
        let settings = EscalationSettings {
            enabled: false,
            ..EscalationSettings::default()
        };
        let harness = harness(settings, 3, 7);
        let service = harness.service(true);

        let result = service
            .escalate_ban(request(BanScope::Course, Some("spam")))
            .await
            .unwrap();

        assert!(!result.dispatched);
        assert_eq!(result.transport, TransportKind::None);
        assert_eq!(result.purge, PurgeOutcome::default());
        assert_eq!(harness.directory.lookup_count(), 0);
        assert_eq!(harness.content.call_count(), 0);
        assert_eq!(harness.bans.recorded().len(), 0);
        assert_eq!(harness.templated.sent().len(), 0);
        assert_eq!(harness.plain.sent().len(), 0);
    }

    #[tokio::test]
    async fn templated_dispatch_carries_the_full_context() {
        let harness = harness(EscalationSettings::default(), 3, 7);
        let service = harness.service(true);

        let result = service
            .escalate_ban(request(BanScope::Course, Some("Posting scam links")))
            .await
            .unwrap();

        assert!(result.dispatched);
        assert_eq!(result.transport, TransportKind::Templated);
        assert_eq!(result.purge.threads_deleted, 3);
        assert_eq!(result.purge.comments_deleted, 7);

        let sent = harness.templated.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "partner-support@edx.org");
        let ctx = &sent[0].context;
        assert_eq!(ctx.banned_username, "spammer");
        assert_eq!(ctx.scope, BanScope::Course);
        assert_eq!(ctx.reason, "Posting scam links");
        assert_eq!(ctx.threads_deleted, 3);
        assert_eq!(ctx.comments_deleted, 7);
        assert_eq!(ctx.total_deleted, 10);
        assert_eq!(harness.plain.sent().len(), 0);
    }

    #[tokio::test]
    async fn plaintext_dispatch_honors_configured_addresses() {
        let settings = EscalationSettings {
            escalation_address: "custom-support@example.com".to_string(),
            from_address: "noreply@edx.org".to_string(),
            ..EscalationSettings::default()
        };
        let harness = harness(settings, 15, 25);
        let service = harness.service(false);

        let result = service
            .escalate_ban(request(BanScope::Organization, Some("Multiple violations")))
            .await
            .unwrap();

        assert_eq!(result.transport, TransportKind::Plaintext);
        let sent = harness.plain.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["custom-support@example.com"]);
        assert_eq!(sent[0].from_address, "noreply@edx.org");
        for needle in ["spammer", "ORGANIZATION", "Multiple violations", "15", "25"] {
            assert!(sent[0].body.contains(needle), "body missing {needle}");
        }
        assert_eq!(harness.templated.sent().len(), 0);
    }

    #[tokio::test]
    async fn empty_reason_reaches_the_body_as_the_default_text() {
        let harness = harness(EscalationSettings::default(), 1, 0);
        let service = harness.service(false);

        service
            .escalate_ban(request(BanScope::Course, Some("")))
            .await
            .unwrap();

        let sent = harness.plain.sent();
        assert!(sent[0].body.contains(NO_REASON_PROVIDED));
    }

    #[tokio::test]
    async fn transport_failure_is_logged_and_reraises_with_counts() {
        let harness = Harness {
            plain: Arc::new(FakePlainMail::failing()),
            ..harness(EscalationSettings::default(), 3, 7)
        };
        let service = harness.service(false);

        let err = service
            .escalate_ban(request(BanScope::Course, Some("spam")))
            .await
            .unwrap_err();

        match err {
            AppError::DispatchFailed { ref purge, .. } => {
                assert_eq!(purge.threads_deleted, 3);
                assert_eq!(purge.comments_deleted, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains(MSG_ESCALATION_SEND_FAILED));
        // content removal is the primary action; it is not rolled back
        assert_eq!(harness.content.thread_count(), 0);
    }

    #[tokio::test]
    async fn unknown_user_stops_before_any_mutation() {
        let harness = harness(EscalationSettings::default(), 3, 7);
        let service = harness.service(true);

        let mut req = request(BanScope::Course, None);
        req.banned_user_id = UserId::new(99_999);
        let err = service.escalate_ban(req).await.unwrap_err();

        assert!(matches!(err, AppError::UserNotFound { user_id: 99_999 }));
        assert_eq!(harness.content.delete_count(), 0);
        assert_eq!(harness.bans.recorded().len(), 0);
        assert_eq!(harness.templated.sent().len(), 0);
        assert_eq!(harness.plain.sent().len(), 0);
    }

    #[tokio::test]
    async fn purge_failure_prevents_dispatch() {
        let harness = harness(EscalationSettings::default(), 8, 0);
        for i in 0..8 {
            harness.content.fail_delete_of(&format!("thread-{i}"));
        }
        let service = harness.service(true);

        let err = service
            .escalate_ban(request(BanScope::Course, None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PurgeFailed { .. }));
        assert_eq!(harness.templated.sent().len(), 0);
        assert_eq!(harness.plain.sent().len(), 0);
    }

    #[tokio::test]
    async fn reinvoking_after_a_purge_still_dispatches_with_zero_counts() {
        let harness = harness(EscalationSettings::default(), 2, 2);
        let service = harness.service(true);

        let first = service
            .escalate_ban(request(BanScope::Course, None))
            .await
            .unwrap();
        assert_eq!(first.purge.total(), 4);

        let second = service
            .escalate_ban(request(BanScope::Course, None))
            .await
            .unwrap();
        assert!(second.dispatched);
        assert_eq!(second.purge.threads_deleted, 0);
        assert_eq!(second.purge.comments_deleted, 0);
        assert_eq!(harness.templated.sent().len(), 2);
    }

    #[tokio::test]
    async fn recorded_ban_is_reactivated_not_duplicated() {
        let harness = harness(EscalationSettings::default(), 0, 0);
        let service = harness.service(true);

        service
            .escalate_ban(request(BanScope::Course, Some("first")))
            .await
            .unwrap();
        service
            .escalate_ban(request(BanScope::Course, Some("second")))
            .await
            .unwrap();

        let recorded = harness.bans.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].reason, "second");
        assert!(recorded[0].is_active);
    }

    #[tokio::test]
    async fn self_ban_is_rejected_before_resolution() {
        let harness = harness(EscalationSettings::default(), 0, 0);
        let service = harness.service(true);

        let mut req = request(BanScope::Course, None);
        req.moderator_user_id = req.banned_user_id;
        let err = service.escalate_ban(req).await.unwrap_err();

        assert!(matches!(err, AppError::ValidationError { .. }));
        assert_eq!(harness.directory.lookup_count(), 0);
    }

    #[tokio::test]
    async fn banned_users_listing_includes_org_bans_for_the_course() {
        let harness = harness(EscalationSettings::default(), 0, 0);
        let service = harness.service(true);

        service
            .escalate_ban(request(BanScope::Organization, Some("org-wide")))
            .await
            .unwrap();

        let bans = service
            .list_banned_users(CourseId::new("course-v1:TestX+CS101+2024"))
            .await
            .unwrap();
        assert_eq!(bans.len(), 1);
        assert_eq!(bans[0].scope, BanScope::Organization);
    }
}
