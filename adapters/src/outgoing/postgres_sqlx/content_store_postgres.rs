use sqlx::PgPool;
use tracing::instrument;

use domain::{
    course::{CourseId, OrgId},
    moderation::{ContentId, PurgeTarget},
    user::UserId,
};
use forummod_application::{
    error::{AppError, AppResult},
    ports::outgoing::content_store::ContentStorePort,
};

use super::utils::PostgresExecutor;

/// Derives the organization from a course key of the form
/// `course-v1:Org+Number+Run`.
fn parse_org(course_id: &CourseId) -> AppResult<OrgId> {
    let key = course_id.as_str();
    let Some((_, rest)) = key.split_once(':') else {
        return Err(AppError::ValidationError {
            message: format!("Cannot derive organization from course key {key}"),
        });
    };
    let mut parts = rest.split('+');
    let org = parts.next().unwrap_or_default();
    if org.is_empty() || parts.next().is_none() {
        return Err(AppError::ValidationError {
            message: format!("Cannot derive organization from course key {key}"),
        });
    }
    Ok(OrgId::new(org))
}

pub struct PostgresContentStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresContentStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }

    async fn list_ids(
        &self,
        table: &str,
        author: UserId,
        target: &PurgeTarget,
    ) -> AppResult<Vec<ContentId>> {
        // creation order keeps retries resumable; ties broken by id
        let (filter_column, filter_value) = target_filter(target);
        let query = format!(
            r"
            SELECT id
            FROM {table}
            WHERE author_id = $1 AND {filter_column} = $2
            ORDER BY created_at ASC, id ASC
            "
        );

        let rows = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, (String,)>(&query)
                        .bind(author.as_i64())
                        .bind(filter_value)
                        .fetch_all(&self.pool)
                },
                &format!("Failed to list {table} for user {author}"),
            )
            .await?;

        Ok(rows.into_iter().map(|(id,)| ContentId::new(id)).collect())
    }

    async fn delete_by_id(&self, table: &str, id: &ContentId) -> AppResult<bool> {
        let query = format!("DELETE FROM {table} WHERE id = $1");
        let result = self
            .executor
            .execute_with_timeout(
                || sqlx::query(&query).bind(id.as_str()).execute(&self.pool),
                &format!("Failed to delete {table} item {id}"),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, table: &str, author: UserId, target: &PurgeTarget) -> AppResult<u64> {
        let (filter_column, filter_value) = target_filter(target);
        let query = format!(
            "SELECT COUNT(*) FROM {table} WHERE author_id = $1 AND {filter_column} = $2"
        );

        let count = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_scalar::<_, i64>(&query)
                        .bind(author.as_i64())
                        .bind(filter_value)
                        .fetch_one(&self.pool)
                },
                &format!("Failed to count {table} for user {author}"),
            )
            .await?;

        Ok(count.max(0) as u64)
    }
}

fn target_filter(target: &PurgeTarget) -> (&'static str, &str) {
    match target {
        PurgeTarget::Course(course_id) => ("course_id", course_id.as_str()),
        PurgeTarget::Organization(org) => ("org", org.as_str()),
    }
}

#[async_trait::async_trait]
impl ContentStorePort for PostgresContentStoreAdapter {
    async fn organization_for_course(&self, course_id: &CourseId) -> AppResult<OrgId> {
        parse_org(course_id)
    }

    #[instrument(skip(self))]
    async fn list_thread_ids(
        &self,
        author: UserId,
        target: &PurgeTarget,
    ) -> AppResult<Vec<ContentId>> {
        self.list_ids("discussion_threads", author, target).await
    }

    #[instrument(skip(self))]
    async fn list_comment_ids(
        &self,
        author: UserId,
        target: &PurgeTarget,
    ) -> AppResult<Vec<ContentId>> {
        self.list_ids("discussion_comments", author, target).await
    }

    #[instrument(skip(self))]
    async fn delete_thread(&self, id: &ContentId) -> AppResult<bool> {
        self.delete_by_id("discussion_threads", id).await
    }

    #[instrument(skip(self))]
    async fn delete_comment(&self, id: &ContentId) -> AppResult<bool> {
        self.delete_by_id("discussion_comments", id).await
    }

    #[instrument(skip(self))]
    async fn count_threads(&self, author: UserId, target: &PurgeTarget) -> AppResult<u64> {
        self.count("discussion_threads", author, target).await
    }

    #[instrument(skip(self))]
    async fn count_comments(&self, author: UserId, target: &PurgeTarget) -> AppResult<u64> {
        self.count("discussion_comments", author, target).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn org_is_parsed_from_a_course_key() {
        let org = parse_org(&CourseId::new("course-v1:TestX+CS101+2024")).unwrap();
        assert_eq!(org, OrgId::new("TestX"));
    }

    #[test]
    fn keys_without_an_org_segment_are_rejected() {
        assert!(parse_org(&CourseId::new("not-a-course-key")).is_err());
        assert!(parse_org(&CourseId::new("course-v1:")).is_err());
        assert!(parse_org(&CourseId::new("course-v1:OnlyOrg")).is_err());
    }
}
