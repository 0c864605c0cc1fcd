//! Feedback repository for database operations.

use crate::error::AppError;
use crate::models::feedback::Feedback;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for ticket feedback database operations. At most one row per
/// ticket; enforced by a unique constraint on `ticket_id`.
pub struct FeedbackRepository;

impl FeedbackRepository {
    pub async fn create(
        pool: &PgPool,
        ticket_id: Uuid,
        user_id: Uuid,
        rating: i32,
        comment: Option<&str>,
    ) -> Result<Feedback, AppError> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (ticket_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(pool)
        .await?;

        Ok(feedback)
    }

    pub async fn find_by_ticket(pool: &PgPool, ticket_id: Uuid) -> Result<Option<Feedback>, AppError> {
        let feedback = sqlx::query_as::<_, Feedback>("SELECT * FROM feedback WHERE ticket_id = $1")
            .bind(ticket_id)
            .fetch_optional(pool)
            .await?;

        Ok(feedback)
    }
}
