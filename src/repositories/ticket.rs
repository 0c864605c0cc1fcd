//! Ticket repository for database operations.

use crate::error::AppError;
use crate::models::ticket::{CreateTicket, Ticket, TicketFilters, TicketStatus, TicketSummary, UpdateTicket};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for ticket database operations.
pub struct TicketRepository;

impl TicketRepository {
    /// Create a new ticket. `status` always starts at NEW.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &PgPool,
        location_id: Uuid,
        reporter_id: Uuid,
        team_id: Option<Uuid>,
        input: &CreateTicket,
    ) -> Result<Ticket, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets (
                title, description, status, category_id, location_id, reporter_id, team_id
            )
            VALUES ($1, $2, 'new', $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.category_id)
        .bind(location_id)
        .bind(reporter_id)
        .bind(team_id)
        .fetch_one(pool)
        .await?;

        Ok(ticket)
    }

    /// Find a ticket by ID. Soft-deleted tickets are excluded.
    pub async fn find_by_id(pool: &PgPool, ticket_id: Uuid) -> Result<Option<Ticket>, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(ticket_id)
        .fetch_optional(pool)
        .await?;

        Ok(ticket)
    }

    /// Update title/description/category. Routing is never recomputed here.
    pub async fn update(pool: &PgPool, ticket_id: Uuid, input: UpdateTicket) -> Result<Ticket, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category_id = COALESCE($4, category_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_one(pool)
        .await?;

        Ok(ticket)
    }

    /// Transition a ticket's status. Sets `resolved_at` on the first entry into
    /// RESOLVED only; it is never cleared once set.
    pub async fn update_status(
        pool: &PgPool,
        ticket_id: Uuid,
        new_status: TicketStatus,
    ) -> Result<Ticket, AppError> {
        let sets_resolved = matches!(new_status, TicketStatus::Resolved);
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets SET
                status = $2,
                resolved_at = CASE WHEN $3 AND resolved_at IS NULL THEN NOW() ELSE resolved_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(new_status)
        .bind(sets_resolved)
        .fetch_one(pool)
        .await?;

        Ok(ticket)
    }

    /// Assign a team to a ticket (manager-only operation at the service layer).
    pub async fn assign_team(pool: &PgPool, ticket_id: Uuid, team_id: Uuid) -> Result<Ticket, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET team_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(ticket_id)
        .bind(team_id)
        .fetch_one(pool)
        .await?;

        Ok(ticket)
    }

    /// Soft-delete a ticket.
    pub async fn soft_delete(pool: &PgPool, ticket_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE tickets SET deleted_at = NOW() WHERE id = $1")
            .bind(ticket_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// List ticket summaries matching filters, newest first.
    pub async fn list(pool: &PgPool, filters: &TicketFilters) -> Result<Vec<TicketSummary>, AppError> {
        let status_strings: Option<Vec<String>> = filters
            .statuses
            .as_ref()
            .map(|s| s.iter().map(status_to_string).collect());

        let tickets = sqlx::query_as::<_, TicketSummary>(
            r#"
            SELECT t.id, t.title, t.status, t.category_id, t.reporter_id, t.team_id,
                   l.city, l.district, t.created_at, t.updated_at
            FROM tickets t
            JOIN locations l ON l.id = t.location_id
            WHERE t.deleted_at IS NULL
              AND ($1::text[] IS NULL OR t.status::text = ANY($1))
              AND ($2::uuid IS NULL OR t.category_id = $2)
              AND ($3::uuid IS NULL OR t.team_id = $3)
              AND ($4::uuid IS NULL OR t.reporter_id = $4)
            ORDER BY t.created_at DESC
            LIMIT $5
            OFFSET $6
            "#,
        )
        .bind(&status_strings)
        .bind(filters.category_id)
        .bind(filters.team_id)
        .bind(filters.reporter_id)
        .bind(filters.limit)
        .bind(filters.offset)
        .fetch_all(pool)
        .await?;

        Ok(tickets)
    }

    /// Count tickets matching the same predicate as `list`, for pagination totals.
    pub async fn count(pool: &PgPool, filters: &TicketFilters) -> Result<i64, AppError> {
        let status_strings: Option<Vec<String>> = filters
            .statuses
            .as_ref()
            .map(|s| s.iter().map(status_to_string).collect());

        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM tickets t
            WHERE t.deleted_at IS NULL
              AND ($1::text[] IS NULL OR t.status::text = ANY($1))
              AND ($2::uuid IS NULL OR t.category_id = $2)
              AND ($3::uuid IS NULL OR t.team_id = $3)
              AND ($4::uuid IS NULL OR t.reporter_id = $4)
            "#,
        )
        .bind(&status_strings)
        .bind(filters.category_id)
        .bind(filters.team_id)
        .bind(filters.reporter_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Nearby active tickets (status ∈ {NEW, IN_PROGRESS}) within `radius_meters`,
    /// ordered by distance, capped at 10.
    pub async fn find_nearby(
        pool: &PgPool,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
        category_id: Option<Uuid>,
    ) -> Result<Vec<TicketSummary>, AppError> {
        let tickets = sqlx::query_as::<_, TicketSummary>(
            r#"
            SELECT t.id, t.title, t.status, t.category_id, t.reporter_id, t.team_id,
                   l.city, l.district, t.created_at, t.updated_at
            FROM tickets t
            JOIN locations l ON l.id = t.location_id
            WHERE t.deleted_at IS NULL
              AND t.status IN ('new', 'in_progress')
              AND ($4::uuid IS NULL OR t.category_id = $4)
              AND ST_DWithin(
                    l.coordinates::geography,
                    ST_SetSRID(ST_MakePoint($2, $1), 4326)::geography,
                    $3
                  )
            ORDER BY ST_Distance(
                l.coordinates::geography,
                ST_SetSRID(ST_MakePoint($2, $1), 4326)::geography
            )
            LIMIT 10
            "#,
        )
        .bind(latitude)
        .bind(longitude)
        .bind(radius_meters)
        .bind(category_id)
        .fetch_all(pool)
        .await?;

        Ok(tickets)
    }

    /// Count of tickets in {NEW, IN_PROGRESS} assigned to `team_id`.
    pub async fn workload(pool: &PgPool, team_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM tickets
            WHERE team_id = $1 AND status IN ('new', 'in_progress') AND deleted_at IS NULL
            "#,
        )
        .bind(team_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}

fn status_to_string(status: &TicketStatus) -> String {
    match status {
        TicketStatus::New => "new".to_string(),
        TicketStatus::InProgress => "in_progress".to_string(),
        TicketStatus::Resolved => "resolved".to_string(),
        TicketStatus::Closed => "closed".to_string(),
        TicketStatus::Escalated => "escalated".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_filters_default() {
        let filters = TicketFilters::default();
        assert!(filters.statuses.is_none());
        assert!(filters.category_id.is_none());
        assert!(filters.team_id.is_none());
        assert!(filters.reporter_id.is_none());
    }

    #[test]
    fn test_status_to_string() {
        assert_eq!(status_to_string(&TicketStatus::New), "new");
        assert_eq!(status_to_string(&TicketStatus::Escalated), "escalated");
    }
}
