use forummod_application::{
    error::{AppError, AppResult},
    ports::outgoing::plain_mail::PlainMailPort,
};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{authentication::Credentials, client::Tls},
};
use std::str::FromStr;
use tracing::{debug, info, instrument};

use domain::notification::OutboundMail;

#[derive(Clone)]
pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_name: String,
}

#[derive(Clone)]
pub struct SmtpMailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_name: String,
    pub use_tls: bool,
}

impl SmtpMailSender {
    pub fn new(config: SmtpMailConfig) -> Result<Self, AppError> {
        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port);

        if !config.username.is_empty() && !config.password.is_empty() {
            let creds = Credentials::new(config.username, config.password);
            transport_builder = transport_builder.credentials(creds);
        }

        let transport = if config.use_tls {
            transport_builder.build()
        } else {
            transport_builder.tls(Tls::None).build()
        };

        info!(
            smtp_host = %config.smtp_host,
            smtp_port = config.smtp_port,
            use_tls = config.use_tls,
            "SMTP mail sender initialized"
        );

        Ok(Self {
            transport,
            from_name: config.from_name,
        })
    }
}

#[async_trait::async_trait]
impl PlainMailPort for SmtpMailSender {
    #[instrument(skip(self, mail))]
    async fn send(&self, mail: &OutboundMail) -> AppResult<()> {
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", self.from_name, mail.from_address))
            .map_err(|e| AppError::ExternalServiceError {
                message: format!("Invalid from address: {}", e),
            })?;

        let mut builder = Message::builder()
            .from(from_mailbox)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_PLAIN);

        for recipient in &mail.recipients {
            let to_mailbox =
                Mailbox::from_str(recipient).map_err(|e| AppError::ExternalServiceError {
                    message: format!("Invalid recipient address: {}", e),
                })?;
            builder = builder.to(to_mailbox);
        }

        let email =
            builder
                .body(mail.body.clone())
                .map_err(|e| AppError::ExternalServiceError {
                    message: format!("Failed to build mail message: {}", e),
                })?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::ExternalServiceError {
                message: format!("Failed to send mail: {}", e),
            })?;

        debug!(
            recipients = ?mail.recipients,
            subject = %mail.subject,
            "Plain-text mail submitted"
        );

        Ok(())
    }
}
