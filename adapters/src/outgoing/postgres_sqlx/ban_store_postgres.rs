use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use domain::{
    course::{CourseId, OrgId},
    moderation::{Ban, BanScope},
    user::UserId,
};
use forummod_application::{
    error::{AppError, AppResult},
    ports::outgoing::ban_store::BanStorePort,
};

use super::utils::{PostgresExecutor, begin_transaction, commit_transaction};

pub struct PostgresBanStoreAdapter {
    pool: PgPool,
    executor: PostgresExecutor,
}

impl PostgresBanStoreAdapter {
    pub fn new(pool: PgPool, query_timeout_secs: u64) -> Self {
        Self {
            pool,
            executor: PostgresExecutor::new(query_timeout_secs),
        }
    }
}

type BanRow = (
    Uuid,
    i64,
    String,
    String,
    String,
    i64,
    String,
    bool,
    OffsetDateTime,
    OffsetDateTime,
);

fn ban_from_row(row: BanRow) -> AppResult<Ban> {
    let (id, user_id, course_id, org, scope, banned_by, reason, is_active, banned_at, created_at) =
        row;
    let scope = match scope.as_str() {
        "course" => BanScope::Course,
        "organization" => BanScope::Organization,
        other => {
            return Err(AppError::DatabaseError {
                message: format!("Unknown ban scope {other} in banned_users"),
            });
        }
    };
    Ok(Ban {
        id,
        user_id: UserId::new(user_id),
        course_id: CourseId::new(course_id),
        org: OrgId::new(org),
        scope,
        banned_by: UserId::new(banned_by),
        reason,
        is_active,
        banned_at,
        created_at,
    })
}

#[async_trait::async_trait]
impl BanStorePort for PostgresBanStoreAdapter {
    /// Upserts the ban and appends a moderation-log row in one transaction.
    /// A previously lifted ban for the same (user, course, scope) is
    /// reactivated with the new reason and moderator.
    #[instrument(skip(self, ban))]
    async fn record_ban(&self, ban: &Ban) -> AppResult<()> {
        let mut tx = begin_transaction(&self.pool).await?;

        sqlx::query(
            r"
            INSERT INTO banned_users
                (id, user_id, course_id, org, scope, banned_by, reason, is_active, banned_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id, course_id, scope) DO UPDATE SET
                banned_by = EXCLUDED.banned_by,
                reason = EXCLUDED.reason,
                is_active = TRUE,
                banned_at = EXCLUDED.banned_at
            ",
        )
        .bind(ban.id)
        .bind(ban.user_id.as_i64())
        .bind(ban.course_id.as_str())
        .bind(ban.org.as_str())
        .bind(ban.scope.as_str())
        .bind(ban.banned_by.as_i64())
        .bind(&ban.reason)
        .bind(ban.is_active)
        .bind(ban.banned_at)
        .bind(ban.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError {
            message: format!("Failed to record ban for user {}: {}", ban.user_id, e),
        })?;

        sqlx::query(
            r"
            INSERT INTO moderation_log
                (id, action_type, target_user_id, moderator_user_id, course_id, reason, created_at)
            VALUES ($1, 'ban', $2, $3, $4, $5, $6)
            ",
        )
        .bind(Uuid::new_v4())
        .bind(ban.user_id.as_i64())
        .bind(ban.banned_by.as_i64())
        .bind(ban.course_id.as_str())
        .bind(&ban.reason)
        .bind(ban.banned_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError {
            message: format!("Failed to log ban for user {}: {}", ban.user_id, e),
        })?;

        commit_transaction(tx).await
    }

    #[instrument(skip(self))]
    async fn list_active_bans(&self, course_id: &CourseId, org: &OrgId) -> AppResult<Vec<Ban>> {
        let rows = self
            .executor
            .execute_with_timeout(
                || {
                    sqlx::query_as::<_, BanRow>(
                        r"
                    SELECT id, user_id, course_id, org, scope, banned_by, reason,
                           is_active, banned_at, created_at
                    FROM banned_users
                    WHERE is_active = TRUE
                      AND ((scope = 'course' AND course_id = $1)
                        OR (scope = 'organization' AND org = $2))
                    ORDER BY banned_at DESC
                    ",
                    )
                    .bind(course_id.as_str())
                    .bind(org.as_str())
                    .fetch_all(&self.pool)
                },
                &format!("Failed to list active bans for course {course_id}"),
            )
            .await?;

        rows.into_iter().map(ban_from_row).collect()
    }
}
