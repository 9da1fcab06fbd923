use std::sync::RwLock;

use forummod_application::{
    config::EscalationSettings,
    error::{AppError, AppResult},
    infrastructure_config::ModerationConfig,
    ports::outgoing::moderation_config::ModerationConfigPort,
};

/// Process-wide moderation settings. The orchestrator snapshots the settings
/// once per call, so swapping the section here takes effect on the next call
/// without drifting calls already in flight.
pub struct SharedConfigProvider {
    moderation: RwLock<ModerationConfig>,
}

impl SharedConfigProvider {
    pub fn new(moderation: ModerationConfig) -> Self {
        Self {
            moderation: RwLock::new(moderation),
        }
    }

    pub fn update(&self, moderation: ModerationConfig) -> AppResult<()> {
        let mut guard = self
            .moderation
            .write()
            .map_err(|_| AppError::InternalServerError)?;
        *guard = moderation;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ModerationConfigPort for SharedConfigProvider {
    async fn escalation_settings(&self) -> AppResult<EscalationSettings> {
        let guard = self
            .moderation
            .read()
            .map_err(|_| AppError::InternalServerError)?;
        Ok(guard.escalation_settings())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn updates_are_visible_to_the_next_snapshot() {
        let provider = SharedConfigProvider::new(ModerationConfig::default());
        assert!(provider.escalation_settings().await.unwrap().enabled);

        let updated = ModerationConfig {
            ban_email_enabled: false,
            ..ModerationConfig::default()
        };
        provider.update(updated).unwrap();

        assert!(!provider.escalation_settings().await.unwrap().enabled);
    }
}
