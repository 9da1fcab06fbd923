use forummod_application::{error::AppResult, ports::outgoing::plain_mail::PlainMailPort};
use tracing::{info, instrument};

use domain::notification::OutboundMail;

/// Development backend: renders the outbound mail into the log instead of
/// talking to an SMTP relay.
#[derive(Default)]
pub struct ConsoleMailSender;

impl ConsoleMailSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl PlainMailPort for ConsoleMailSender {
    #[instrument(skip(self, mail))]
    async fn send(&self, mail: &OutboundMail) -> AppResult<()> {
        info!(
            recipients = ?mail.recipients,
            from = %mail.from_address,
            subject = %mail.subject,
            "Outbound mail (Console Mail Sender)"
        );

        info!(
            "=== OUTBOUND MAIL ===\nFrom: {}\nTo: {}\nSubject: {}\n\n{}\n=== END MAIL ===",
            mail.from_address,
            mail.recipients.join(", "),
            mail.subject,
            mail.body
        );

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn console_sender_always_succeeds() {
        let sender = ConsoleMailSender::new();
        let mail = OutboundMail {
            subject: "Discussion Ban Alert: spammer in course-v1:TestX+CS101+2024".to_string(),
            body: "body".to_string(),
            from_address: "no-reply@example.com".to_string(),
            recipients: vec!["partner-support@edx.org".to_string()],
        };
        assert!(sender.send(&mail).await.is_ok());
    }
}
