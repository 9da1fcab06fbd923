use tracing::warn;

use crate::config::EscalationSettings;
use crate::error::{AppError, AppResult};
use crate::ports::outgoing::content_store::DynContentStorePort;
use domain::{
    course::CourseId,
    moderation::{BanScope, ContentId, PurgeOutcome, PurgePreview, PurgeTarget},
    user::UserId,
};

pub const MSG_PURGE_ITEM_FAILED: &str = "Failed to delete authored content item";

#[derive(Debug, Clone, Copy)]
enum Collection {
    Threads,
    Comments,
}

impl Collection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Threads => "threads",
            Self::Comments => "comments",
        }
    }
}

/// Deletes a banned user's authored threads and comments within the ban
/// scope, up to the configured caps. Counts reflect items this run actually
/// deleted; items that were already gone are not counted.
pub struct ContentPurger {
    content_store: DynContentStorePort,
}

impl ContentPurger {
    pub fn new(content_store: DynContentStorePort) -> Self {
        Self { content_store }
    }

    async fn resolve_target(&self, scope: BanScope, course_id: &CourseId) -> AppResult<PurgeTarget> {
        match scope {
            BanScope::Course => Ok(PurgeTarget::Course(course_id.clone())),
            BanScope::Organization => {
                let org = self
                    .content_store
                    .organization_for_course(course_id)
                    .await?;
                Ok(PurgeTarget::Organization(org))
            }
        }
    }

    pub async fn purge_authored_content(
        &self,
        banned_user_id: UserId,
        scope: BanScope,
        course_id: &CourseId,
        settings: &EscalationSettings,
    ) -> AppResult<PurgeOutcome> {
        let target = self.resolve_target(scope, course_id).await?;
        let mut outcome = PurgeOutcome::default();

        let thread_ids = self
            .content_store
            .list_thread_ids(banned_user_id, &target)
            .await?;
        outcome.threads_deleted = self
            .drain_collection(
                Collection::Threads,
                &thread_ids,
                settings.max_threads_per_ban,
                settings.max_item_errors_per_collection,
                &mut outcome.partial,
            )
            .await?;

        let comment_ids = self
            .content_store
            .list_comment_ids(banned_user_id, &target)
            .await?;
        outcome.comments_deleted = self
            .drain_collection(
                Collection::Comments,
                &comment_ids,
                settings.max_comments_per_ban,
                settings.max_item_errors_per_collection,
                &mut outcome.partial,
            )
            .await?;

        Ok(outcome)
    }

    pub async fn preview_authored_content(
        &self,
        user_id: UserId,
        scope: BanScope,
        course_id: &CourseId,
    ) -> AppResult<PurgePreview> {
        let target = self.resolve_target(scope, course_id).await?;
        let thread_count = self.content_store.count_threads(user_id, &target).await?;
        let comment_count = self.content_store.count_comments(user_id, &target).await?;
        Ok(PurgePreview {
            thread_count,
            comment_count,
        })
    }

    async fn drain_collection(
        &self,
        collection: Collection,
        ids: &[ContentId],
        cap: Option<u64>,
        max_item_errors: u32,
        partial: &mut bool,
    ) -> AppResult<u64> {
        let mut deleted = 0u64;
        let mut errors = 0u32;

        for id in ids {
            if cap.is_some_and(|cap| deleted >= cap) {
                *partial = true;
                break;
            }

            let result = match collection {
                Collection::Threads => self.content_store.delete_thread(id).await,
                Collection::Comments => self.content_store.delete_comment(id).await,
            };

            match result {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => {
                    errors += 1;
                    *partial = true;
                    warn!(
                        item_id = %id,
                        collection = collection.as_str(),
                        error = %e,
                        "{}", MSG_PURGE_ITEM_FAILED
                    );
                    if errors > max_item_errors {
                        return Err(AppError::PurgeFailed {
                            message: format!(
                                "aborting after {errors} failed {} deletions",
                                collection.as_str()
                            ),
                        });
                    }
                }
            }
        }

        Ok(deleted)
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
    use crate::test_support::FakeContentStore;
    use domain::course::OrgId;

    fn course() -> CourseId {
        CourseId::new("course-v1:TestX+CS101+2024")
    }

    fn thread_ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("thread-{i}")).collect()
    }

    fn comment_ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("comment-{i}")).collect()
    }

    #[tokio::test]
    async fn counts_reflect_successful_deletions() {
        let store = Arc::new(FakeContentStore::with_content(
            thread_ids(3),
            comment_ids(7),
        ));
        let purger = ContentPurger::new(store.clone());

        let outcome = purger
            .purge_authored_content(
                UserId::new(42),
                BanScope::Course,
                &course(),
                &EscalationSettings::default(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.threads_deleted, 3);
        assert_eq!(outcome.comments_deleted, 7);
        assert!(!outcome.partial);
    }

    #[tokio::test]
    async fn already_gone_items_are_not_counted() {
        let store = Arc::new(FakeContentStore::with_content(
            thread_ids(4),
            comment_ids(0),
        ));
        store.mark_already_gone("thread-1");
        store.mark_already_gone("thread-2");
        let purger = ContentPurger::new(store.clone());

        let outcome = purger
            .purge_authored_content(
                UserId::new(42),
                BanScope::Course,
                &course(),
                &EscalationSettings::default(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.threads_deleted, 2);
        assert!(!outcome.partial);
    }

    #[tokio::test]
    async fn cap_bounds_the_collection_and_marks_partial() {
        let store = Arc::new(FakeContentStore::with_content(
            thread_ids(10),
            comment_ids(2),
        ));
        let purger = ContentPurger::new(store.clone());
        let settings = EscalationSettings {
            max_threads_per_ban: Some(4),
            ..EscalationSettings::default()
        };

        let outcome = purger
            .purge_authored_content(UserId::new(42), BanScope::Course, &course(), &settings)
            .await
            .unwrap();

        assert_eq!(outcome.threads_deleted, 4);
        assert_eq!(outcome.comments_deleted, 2);
        assert!(outcome.partial);
    }

    #[tokio::test]
    async fn cap_equal_to_candidate_count_is_not_partial() {
        let store = Arc::new(FakeContentStore::with_content(
            thread_ids(4),
            comment_ids(0),
        ));
        let purger = ContentPurger::new(store.clone());
        let settings = EscalationSettings {
            max_threads_per_ban: Some(4),
            ..EscalationSettings::default()
        };

        let outcome = purger
            .purge_authored_content(UserId::new(42), BanScope::Course, &course(), &settings)
            .await
            .unwrap();

        assert_eq!(outcome.threads_deleted, 4);
        assert!(!outcome.partial);
    }

    #[tokio::test]
    async fn swallowed_item_errors_mark_partial_but_continue() {
        let store = Arc::new(FakeContentStore::with_content(
            thread_ids(5),
            comment_ids(0),
        ));
        store.fail_delete_of("thread-1");
        store.fail_delete_of("thread-3");
        let purger = ContentPurger::new(store.clone());

        let outcome = purger
            .purge_authored_content(
                UserId::new(42),
                BanScope::Course,
                &course(),
                &EscalationSettings::default(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.threads_deleted, 3);
        assert!(outcome.partial);
    }

    #[tokio::test]
    async fn exceeding_the_item_error_budget_aborts_the_purge() {
        let store = Arc::new(FakeContentStore::with_content(
            thread_ids(6),
            comment_ids(3),
        ));
        for i in 0..6 {
            store.fail_delete_of(&format!("thread-{i}"));
        }
        let purger = ContentPurger::new(store.clone());
        let settings = EscalationSettings {
            max_item_errors_per_collection: 2,
            ..EscalationSettings::default()
        };

        let result = purger
            .purge_authored_content(UserId::new(42), BanScope::Course, &course(), &settings)
            .await;

        assert!(matches!(result, Err(AppError::PurgeFailed { .. })));
        // the comment collection is never reached
        assert_eq!(store.comment_count(), 3);
    }

    #[tokio::test]
    async fn organization_scope_expands_to_the_org_target() {
        let store = Arc::new(FakeContentStore::with_content(
            thread_ids(1),
            comment_ids(1),
        ));
        let purger = ContentPurger::new(store.clone());

        purger
            .purge_authored_content(
                UserId::new(42),
                BanScope::Organization,
                &course(),
                &EscalationSettings::default(),
            )
            .await
            .unwrap();

        assert_eq!(
            store.last_target(),
            Some(PurgeTarget::Organization(OrgId::new("TestX")))
        );
    }

    #[tokio::test]
    async fn preview_counts_without_deleting() {
        let store = Arc::new(FakeContentStore::with_content(
            thread_ids(3),
            comment_ids(5),
        ));
        let purger = ContentPurger::new(store.clone());

        let preview = purger
            .preview_authored_content(UserId::new(42), BanScope::Course, &course())
            .await
            .unwrap();

        assert_eq!(preview.thread_count, 3);
        assert_eq!(preview.comment_count, 5);
        assert_eq!(store.thread_count(), 3);
        assert_eq!(store.comment_count(), 5);
    }
}
