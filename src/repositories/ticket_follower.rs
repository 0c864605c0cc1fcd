//! Ticket follower repository for database operations.

use crate::error::AppError;
use crate::models::ticket_follower::TicketFollower;
use crate::models::user::UserSummary;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for ticket follower database operations. Follow/unfollow are
/// idempotent: repeated calls with the same (ticket, user) pair are no-ops.
pub struct TicketFollowerRepository;

impl TicketFollowerRepository {
    pub async fn follow(pool: &PgPool, ticket_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO ticket_followers (ticket_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (ticket_id, user_id) DO NOTHING
            "#,
        )
        .bind(ticket_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn unfollow(pool: &PgPool, ticket_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM ticket_followers WHERE ticket_id = $1 AND user_id = $2")
            .bind(ticket_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn is_following(pool: &PgPool, ticket_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let following = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM ticket_followers WHERE ticket_id = $1 AND user_id = $2)",
        )
        .bind(ticket_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(following)
    }

    pub async fn list_for_ticket(pool: &PgPool, ticket_id: Uuid) -> Result<Vec<TicketFollower>, AppError> {
        let followers = sqlx::query_as::<_, TicketFollower>(
            "SELECT * FROM ticket_followers WHERE ticket_id = $1 ORDER BY followed_at ASC",
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await?;

        Ok(followers)
    }

    /// Followers as user summaries, used to compute notification recipient sets.
    pub async fn list_follower_users(
        pool: &PgPool,
        ticket_id: Uuid,
    ) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.name, u.role FROM users u
            JOIN ticket_followers tf ON tf.user_id = u.id
            WHERE tf.ticket_id = $1 AND u.deleted_at IS NULL
            "#,
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}
