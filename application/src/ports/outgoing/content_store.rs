use std::sync::Arc;

use crate::error::AppResult;
use domain::{
    course::{CourseId, OrgId},
    moderation::{ContentId, PurgeTarget},
    user::UserId,
};

/// The discussion content store. Listing order is store-native but MUST be
/// deterministic across retries so an interrupted purge can resume
/// idempotently.
#[async_trait::async_trait]
pub trait ContentStorePort: Send + Sync {
    async fn organization_for_course(&self, course_id: &CourseId) -> AppResult<OrgId>;

    async fn list_thread_ids(
        &self,
        author: UserId,
        target: &PurgeTarget,
    ) -> AppResult<Vec<ContentId>>;

    async fn list_comment_ids(
        &self,
        author: UserId,
        target: &PurgeTarget,
    ) -> AppResult<Vec<ContentId>>;

    /// Returns `true` when this call deleted the item, `false` when it was
    /// already gone.
    async fn delete_thread(&self, id: &ContentId) -> AppResult<bool>;

    async fn delete_comment(&self, id: &ContentId) -> AppResult<bool>;

    async fn count_threads(&self, author: UserId, target: &PurgeTarget) -> AppResult<u64>;

    async fn count_comments(&self, author: UserId, target: &PurgeTarget) -> AppResult<u64>;
}

pub type DynContentStorePort = Arc<dyn ContentStorePort>;
