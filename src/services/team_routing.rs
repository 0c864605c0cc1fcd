//! Team-routing service.
//!
//! Resolves which team a newly created ticket belongs to, given its category
//! and the reporter-supplied district/city.

use crate::error::AppError;
use crate::models::team::Team;
use crate::repositories::TeamRepository;
use sqlx::PgPool;
use uuid::Uuid;

/// Resolve the team for `(category_id, district_name, city)` in three
/// priorities, falling back to the configured fallback team, then to none.
pub async fn find_matching_team(
    pool: &PgPool,
    category_id: Uuid,
    district_name: Option<&str>,
    city: &str,
) -> Result<Option<Team>, AppError> {
    if let Some(district_name) = district_name {
        if let Some(team) =
            TeamRepository::find_by_category_and_district(pool, category_id, district_name, city)
                .await?
        {
            tracing::debug!(team_id = %team.id, "routed by category+district");
            return Ok(Some(team));
        }
    }

    if let Some(team) = TeamRepository::find_by_category_and_city(pool, category_id, city).await? {
        tracing::debug!(team_id = %team.id, "routed by category+city");
        return Ok(Some(team));
    }

    if let Some(team) = TeamRepository::find_by_category(pool, category_id).await? {
        tracing::debug!(team_id = %team.id, "routed by category only");
        return Ok(Some(team));
    }

    if let Some(team) = TeamRepository::find_fallback(pool).await? {
        tracing::debug!(team_id = %team.id, "routed to fallback team");
        return Ok(Some(team));
    }

    tracing::debug!(category_id = %category_id, city = %city, "no matching team, ticket left unassigned");
    Ok(None)
}

/// Count of tickets in `{NEW, IN_PROGRESS}` assigned to `team_id`. Used for
/// analytics only, never for routing decisions.
pub async fn workload(pool: &PgPool, team_id: Uuid) -> Result<i64, AppError> {
    crate::repositories::TicketRepository::workload(pool, team_id).await
}
