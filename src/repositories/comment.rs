//! Comment repository for database operations.

use crate::error::AppError;
use crate::models::comment::{Comment, CommentWithAuthor};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for ticket comment database operations.
pub struct CommentRepository;

impl CommentRepository {
    pub async fn create(
        pool: &PgPool,
        ticket_id: Uuid,
        user_id: Uuid,
        content: &str,
        is_internal: bool,
    ) -> Result<Comment, AppError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (ticket_id, user_id, content, is_internal)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(user_id)
        .bind(content)
        .bind(is_internal)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Comments on a ticket, newest first. `include_internal` controls whether
    /// internal-only comments are included; callers pass `false` for citizens.
    pub async fn list_for_ticket(
        pool: &PgPool,
        ticket_id: Uuid,
        include_internal: bool,
    ) -> Result<Vec<Comment>, AppError> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT * FROM comments
            WHERE ticket_id = $1 AND ($2 OR is_internal = FALSE)
            ORDER BY created_at DESC
            "#,
        )
        .bind(ticket_id)
        .bind(include_internal)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Comments on a ticket joined to each author's display name, newest
    /// first, for the ticket detail aggregate.
    pub async fn list_for_ticket_with_author(
        pool: &PgPool,
        ticket_id: Uuid,
        include_internal: bool,
    ) -> Result<Vec<CommentWithAuthor>, AppError> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.ticket_id, c.user_id, u.name AS author_name, c.content, c.is_internal, c.created_at
            FROM comments c
            LEFT JOIN users u ON u.id = c.user_id
            WHERE c.ticket_id = $1 AND ($2 OR c.is_internal = FALSE)
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(ticket_id)
        .bind(include_internal)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }
}
