use std::sync::Arc;

use crate::config::EscalationSettings;
use crate::error::AppResult;

/// Read-only view of the deployer-controlled moderation settings. Queried
/// once per orchestrator call so runtime toggles take effect between calls
/// without drifting a call in flight.
#[async_trait::async_trait]
pub trait ModerationConfigPort: Send + Sync {
    async fn escalation_settings(&self) -> AppResult<EscalationSettings>;
}

pub type DynModerationConfigPort = Arc<dyn ModerationConfigPort>;
