use crate::config::EscalationSettings;
use crate::error::AppResult;
use crate::escalation::templates::EscalationEmail;
use crate::ports::outgoing::plain_mail::DynPlainMailPort;
use crate::ports::outgoing::template_loader::DynTemplateLoaderPort;
use crate::ports::outgoing::templated_message::DynTemplatedMessagePort;
use domain::notification::{
    NotificationContext, OutboundMail, TemplateLookup, TemplatedMessage, TransportKind,
};

pub const TEMPLATED_APP_LABEL: &str = "discussion";
pub const TEMPLATED_TEMPLATE_NAME: &str = "ban_escalation";
pub const PLAINTEXT_TEMPLATE_NAME: &str = "discussion/ban_escalation_email.txt";

/// Picks the outbound channel at each call: the templated pipeline when one
/// is wired in, the plain-text mailer otherwise.
pub struct MessageDispatcher {
    templated: Option<DynTemplatedMessagePort>,
    plain_mail: DynPlainMailPort,
    template_loader: DynTemplateLoaderPort,
}

impl MessageDispatcher {
    pub fn new(
        templated: Option<DynTemplatedMessagePort>,
        plain_mail: DynPlainMailPort,
        template_loader: DynTemplateLoaderPort,
    ) -> Self {
        Self {
            templated,
            plain_mail,
            template_loader,
        }
    }

    pub async fn dispatch(
        &self,
        context: &NotificationContext,
        settings: &EscalationSettings,
    ) -> AppResult<TransportKind> {
        if let Some(templated) = self.templated.as_ref() {
            let message = TemplatedMessage {
                app_label: TEMPLATED_APP_LABEL.to_string(),
                template_name: TEMPLATED_TEMPLATE_NAME.to_string(),
                recipient: settings.escalation_address.clone(),
                context: context.clone(),
            };
            templated.send(&message).await?;
            return Ok(TransportKind::Templated);
        }

        let body = match self
            .template_loader
            .render(PLAINTEXT_TEMPLATE_NAME, context)
            .await?
        {
            TemplateLookup::Rendered(body) => body,
            TemplateLookup::NotFound => EscalationEmail::fallback_body(context),
        };

        let mail = OutboundMail {
            subject: EscalationEmail::subject(context),
            body,
            from_address: settings.from_address.clone(),
            recipients: vec![settings.escalation_address.clone()],
        };
        self.plain_mail.send(&mail).await?;
        Ok(TransportKind::Plaintext)
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
    use std::sync::Arc;

    use super::*;
    use crate::error::AppError;
    use crate::test_support::{FakePlainMail, FakeTemplateLoader, FakeTemplatedTransport};
    use domain::course::CourseId;
    use domain::moderation::{BanScope, PurgeOutcome};
    use domain::user::{UserId, UserProfile};

    fn context() -> NotificationContext {
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
            BanScope::Course,
            Some("Posting scam links"),
            &PurgeOutcome {
                threads_deleted: 3,
                comments_deleted: 7,
                partial: false,
            },
        )
    }

    #[tokio::test]
    async fn templated_transport_wins_when_present() {
        let templated = Arc::new(FakeTemplatedTransport::new());
        let plain = Arc::new(FakePlainMail::new());
        let dispatcher = MessageDispatcher::new(
            Some(templated.clone()),
            plain.clone(),
            Arc::new(FakeTemplateLoader::not_found()),
        );

        let kind = dispatcher
            .dispatch(&context(), &EscalationSettings::default())
            .await
            .unwrap();

        assert_eq!(kind, TransportKind::Templated);
        assert_eq!(plain.sent().len(), 0);
        let sent = templated.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].app_label, TEMPLATED_APP_LABEL);
        assert_eq!(sent[0].template_name, TEMPLATED_TEMPLATE_NAME);
        assert_eq!(sent[0].recipient, "partner-support@edx.org");
    }

    #[tokio::test]
    async fn plaintext_path_is_used_when_templated_is_absent() {
        let plain = Arc::new(FakePlainMail::new());
        let dispatcher = MessageDispatcher::new(
            None,
            plain.clone(),
            Arc::new(FakeTemplateLoader::not_found()),
        );

        let kind = dispatcher
            .dispatch(&context(), &EscalationSettings::default())
            .await
            .unwrap();

        assert_eq!(kind, TransportKind::Plaintext);
        let sent = plain.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].subject,
            "Discussion Ban Alert: spammer in course-v1:TestX+CS101+2024"
        );
        assert_eq!(sent[0].recipients, vec!["partner-support@edx.org"]);
        assert!(sent[0].body.contains("Banned User: spammer"));
    }

    #[tokio::test]
    async fn rendered_template_replaces_the_fallback_body() {
        let plain = Arc::new(FakePlainMail::new());
        let dispatcher = MessageDispatcher::new(
            None,
            plain.clone(),
            Arc::new(FakeTemplateLoader::rendered("custom body from template")),
        );

        dispatcher
            .dispatch(&context(), &EscalationSettings::default())
            .await
            .unwrap();

        assert_eq!(plain.sent()[0].body, "custom body from template");
    }

    #[tokio::test]
    async fn template_loader_errors_propagate_without_sending() {
        let plain = Arc::new(FakePlainMail::new());
        let dispatcher = MessageDispatcher::new(
            None,
            plain.clone(),
            Arc::new(FakeTemplateLoader::failing()),
        );

        let result = dispatcher
            .dispatch(&context(), &EscalationSettings::default())
            .await;

        assert!(matches!(result, Err(AppError::TemplateError { .. })));
        assert_eq!(plain.sent().len(), 0);
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let plain = Arc::new(FakePlainMail::failing());
        let dispatcher = MessageDispatcher::new(
            None,
            plain.clone(),
            Arc::new(FakeTemplateLoader::not_found()),
        );

        let result = dispatcher
            .dispatch(&context(), &EscalationSettings::default())
            .await;

        assert!(matches!(
            result,
            Err(AppError::ExternalServiceError { .. })
        ));
    }
}
