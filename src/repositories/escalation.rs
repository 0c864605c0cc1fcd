//! Escalation repository for database operations.

use crate::error::AppError;
use crate::models::escalation::{EscalationRequest, EscalationStatus};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for escalation request database operations.
pub struct EscalationRepository;

impl EscalationRepository {
    pub async fn create(
        pool: &PgPool,
        ticket_id: Uuid,
        requester_id: Uuid,
        reason: &str,
    ) -> Result<EscalationRequest, AppError> {
        let escalation = sqlx::query_as::<_, EscalationRequest>(
            r#"
            INSERT INTO escalation_requests (ticket_id, requester_id, reason, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(requester_id)
        .bind(reason)
        .fetch_one(pool)
        .await?;

        Ok(escalation)
    }

    pub async fn find_by_id(pool: &PgPool, escalation_id: Uuid) -> Result<Option<EscalationRequest>, AppError> {
        let escalation = sqlx::query_as::<_, EscalationRequest>(
            "SELECT * FROM escalation_requests WHERE id = $1",
        )
        .bind(escalation_id)
        .fetch_optional(pool)
        .await?;

        Ok(escalation)
    }

    /// Existing escalations for a ticket that block a new one (PENDING or APPROVED).
    pub async fn find_blocking_for_ticket(
        pool: &PgPool,
        ticket_id: Uuid,
    ) -> Result<Vec<EscalationRequest>, AppError> {
        let escalations = sqlx::query_as::<_, EscalationRequest>(
            r#"
            SELECT * FROM escalation_requests
            WHERE ticket_id = $1 AND status IN ('pending', 'approved')
            "#,
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await?;

        Ok(escalations)
    }

    pub async fn review(
        pool: &PgPool,
        escalation_id: Uuid,
        reviewer_id: Uuid,
        status: EscalationStatus,
        review_comment: Option<&str>,
    ) -> Result<EscalationRequest, AppError> {
        let escalation = sqlx::query_as::<_, EscalationRequest>(
            r#"
            UPDATE escalation_requests SET
                status = $2,
                reviewer_id = $3,
                review_comment = $4,
                reviewed_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(escalation_id)
        .bind(status)
        .bind(reviewer_id)
        .bind(review_comment)
        .fetch_one(pool)
        .await?;

        Ok(escalation)
    }

    /// All escalations, newest first. Managers see everything.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<EscalationRequest>, AppError> {
        let escalations = sqlx::query_as::<_, EscalationRequest>(
            "SELECT * FROM escalation_requests ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(escalations)
    }

    /// Full escalation history for a ticket, newest first.
    pub async fn list_for_ticket(pool: &PgPool, ticket_id: Uuid) -> Result<Vec<EscalationRequest>, AppError> {
        let escalations = sqlx::query_as::<_, EscalationRequest>(
            "SELECT * FROM escalation_requests WHERE ticket_id = $1 ORDER BY created_at DESC",
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await?;

        Ok(escalations)
    }

    /// Escalations restricted to tickets belonging to `team_id`, for support principals.
    pub async fn list_for_team(pool: &PgPool, team_id: Uuid) -> Result<Vec<EscalationRequest>, AppError> {
        let escalations = sqlx::query_as::<_, EscalationRequest>(
            r#"
            SELECT e.* FROM escalation_requests e
            JOIN tickets t ON t.id = e.ticket_id
            WHERE t.team_id = $1
            ORDER BY e.created_at DESC
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(escalations)
    }
}
