//! Notification repository for database operations.

use crate::error::AppError;
use crate::models::notification::{CreateNotification, Notification};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for notification database operations.
pub struct NotificationRepository;

impl NotificationRepository {
    pub async fn create(pool: &PgPool, input: CreateNotification) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, ticket_id, notification_type, title, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(input.user_id)
        .bind(input.ticket_id)
        .bind(input.notification_type)
        .bind(&input.title)
        .bind(&input.message)
        .fetch_one(pool)
        .await?;

        Ok(notification)
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1 AND ($2 = FALSE OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    pub async fn count_for_user(pool: &PgPool, user_id: Uuid, unread_only: bool) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM notifications
            WHERE user_id = $1 AND ($2 = FALSE OR is_read = FALSE)
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    pub async fn mark_read(pool: &PgPool, notification_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE notifications SET is_read = TRUE, read_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn mark_all_read(pool: &PgPool, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
