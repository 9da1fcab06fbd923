use sqlx::PgPool;
use tracing::instrument;

use domain::user::{UserId, UserProfile};
use forummod_application::{
    error::AppResult, ports::outgoing::user_directory::UserDirectoryPort,
};

use super::utils::PostgresExecutor;

pub struct PostgresUserDirectoryAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresUserDirectoryAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

#[async_trait::async_trait]
impl UserDirectoryPort for PostgresUserDirectoryAdapter {
    #[instrument(skip(self))]
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        let row = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, (String, String)>(
                        r"
                    SELECT username, email
                    FROM users
                    WHERE id = $1
                    ",
                    )
                    .bind(user_id.as_i64())
                    .fetch_optional(&self.pool)
                },
                &format!("Failed to look up user {}", user_id),
            )
            .await?;

        Ok(row.map(|(username, email)| UserProfile {
            id: user_id,
            username,
            email,
        }))
    }
}
