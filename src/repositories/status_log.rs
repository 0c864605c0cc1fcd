//! Status log repository for database operations.

use crate::error::AppError;
use crate::models::status_log::{CreateStatusLog, StatusLog, StatusLogWithAuthor};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for ticket status log database operations.
pub struct StatusLogRepository;

impl StatusLogRepository {
    /// Append a status log entry. Called alongside every status transition.
    pub async fn create(pool: &PgPool, input: CreateStatusLog) -> Result<StatusLog, AppError> {
        let entry = sqlx::query_as::<_, StatusLog>(
            r#"
            INSERT INTO ticket_status_logs (ticket_id, old_status, new_status, changed_by_id, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(input.ticket_id)
        .bind(input.old_status)
        .bind(input.new_status)
        .bind(input.changed_by_id)
        .bind(&input.comment)
        .fetch_one(pool)
        .await?;

        Ok(entry)
    }

    /// List the full status history for a ticket, oldest first.
    pub async fn list_for_ticket(pool: &PgPool, ticket_id: Uuid) -> Result<Vec<StatusLog>, AppError> {
        let entries = sqlx::query_as::<_, StatusLog>(
            "SELECT * FROM ticket_status_logs WHERE ticket_id = $1 ORDER BY created_at ASC",
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }

    /// Full status history for a ticket joined to each acting user's display
    /// name, oldest first, for the ticket detail aggregate.
    pub async fn list_for_ticket_with_author(
        pool: &PgPool,
        ticket_id: Uuid,
    ) -> Result<Vec<StatusLogWithAuthor>, AppError> {
        let entries = sqlx::query_as::<_, StatusLogWithAuthor>(
            r#"
            SELECT l.id, l.ticket_id, l.old_status, l.new_status, l.changed_by_id,
                   u.name AS changed_by_name, l.comment, l.created_at
            FROM ticket_status_logs l
            LEFT JOIN users u ON u.id = l.changed_by_id
            WHERE l.ticket_id = $1
            ORDER BY l.created_at ASC
            "#,
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }
}
