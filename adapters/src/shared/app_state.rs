use std::sync::Arc;

use forummod_application::infrastructure_config::Config;
use forummod_application::ports::incoming::moderation::DynModerationUseCase;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub moderation_use_case: DynModerationUseCase,
}

impl AppState {
    pub fn new(config: Arc<Config>, moderation_use_case: DynModerationUseCase) -> Self {
        Self {
            config,
            moderation_use_case,
        }
    }
}
