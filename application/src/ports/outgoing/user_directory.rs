use std::sync::Arc;

use crate::error::AppResult;
use domain::user::{UserId, UserProfile};

#[async_trait::async_trait]
pub trait UserDirectoryPort: Send + Sync {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserProfile>>;
}

pub type DynUserDirectoryPort = Arc<dyn UserDirectoryPort>;
