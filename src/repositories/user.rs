//! User repository for database operations.

use crate::error::AppError;
use crate::models::user::{Role, User, UserSummary};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for user database operations.
pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// SUPPORT members of `team_id`, used to compute the recipient set for
    /// team-assignment notifications.
    pub async fn list_support_by_team(
        pool: &PgPool,
        team_id: Uuid,
    ) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, name, role FROM users
            WHERE team_id = $1 AND role = $2 AND is_active = TRUE AND deleted_at IS NULL
            "#,
        )
        .bind(team_id)
        .bind(Role::Support)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// All active managers, used to compute escalation notification recipients.
    pub async fn list_managers(pool: &PgPool) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, name, role FROM users
            WHERE role = $1 AND is_active = TRUE AND deleted_at IS NULL
            "#,
        )
        .bind(Role::Manager)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, name, role FROM users
            WHERE deleted_at IS NULL
            ORDER BY name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}
