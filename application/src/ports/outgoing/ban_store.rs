use std::sync::Arc;

use crate::error::AppResult;
use domain::{
    course::{CourseId, OrgId},
    moderation::Ban,
};

#[async_trait::async_trait]
pub trait BanStorePort: Send + Sync {
    /// Durably records a ban. An existing row for the same
    /// (user, course, scope) is reactivated and updated in place.
    async fn record_ban(&self, ban: &Ban) -> AppResult<()>;

    async fn list_active_bans(&self, course_id: &CourseId, org: &OrgId) -> AppResult<Vec<Ban>>;
}

pub type DynBanStorePort = Arc<dyn BanStorePort>;
