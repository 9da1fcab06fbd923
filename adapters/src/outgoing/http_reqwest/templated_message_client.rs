use std::time::Duration;

use forummod_application::{
    error::{AppError, AppResult},
    infrastructure_config::MessageServiceConfig,
    ports::outgoing::templated_message::TemplatedMessagePort,
};
use tracing::{debug, instrument};

use domain::notification::TemplatedMessage;

/// Client for the templated messaging service. The service renders the named
/// template from the structured context on its own side; this adapter only
/// submits the message.
pub struct TemplatedMessageClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TemplatedMessageClient {
    pub fn new(config: &MessageServiceConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::ExternalServiceError {
                message: format!("Failed to build message service client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait::async_trait]
impl TemplatedMessagePort for TemplatedMessageClient {
    #[instrument(skip(self, message))]
    async fn send(&self, message: &TemplatedMessage) -> AppResult<()> {
        let url = format!("{}/api/v1/messages", self.base_url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError {
                message: format!("Message service request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError {
                message: format!("Message service rejected the message ({status}): {body}"),
            });
        }

        debug!(
            template = %message.template_name,
            recipient = %message.recipient,
            "Templated message accepted"
        );

        Ok(())
    }
}
