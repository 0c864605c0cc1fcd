//! Team repository for database operations, including the junction tables
//! used to resolve team routing.

use crate::error::AppError;
use crate::models::team::{CreateTeam, Team};
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for team database operations.
pub struct TeamRepository;

impl TeamRepository {
    /// Create a team along with its category/district routing links.
    pub async fn create(pool: &PgPool, input: CreateTeam) -> Result<Team, AppError> {
        let mut tx = pool.begin().await?;

        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, description, is_fallback)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.is_fallback)
        .fetch_one(&mut *tx)
        .await?;

        for category_id in &input.category_ids {
            sqlx::query("INSERT INTO team_categories (team_id, category_id) VALUES ($1, $2)")
                .bind(team.id)
                .bind(category_id)
                .execute(&mut *tx)
                .await?;
        }

        for district_id in &input.district_ids {
            sqlx::query("INSERT INTO team_districts (team_id, district_id) VALUES ($1, $2)")
                .bind(team.id)
                .bind(district_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(team)
    }

    pub async fn find_by_id(pool: &PgPool, team_id: Uuid) -> Result<Option<Team>, AppError> {
        let team = sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = $1")
            .bind(team_id)
            .fetch_optional(pool)
            .await?;

        Ok(team)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Team>, AppError> {
        let teams = sqlx::query_as::<_, Team>("SELECT * FROM teams ORDER BY name ASC")
            .fetch_all(pool)
            .await?;

        Ok(teams)
    }

    /// The configured fallback team, if any. Assumed to be unique.
    pub async fn find_fallback(pool: &PgPool) -> Result<Option<Team>, AppError> {
        let team = sqlx::query_as::<_, Team>(
            "SELECT * FROM teams WHERE is_fallback = TRUE ORDER BY id ASC LIMIT 1",
        )
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Priority 1: team joined to both `category_id` and a district matching
    /// `(district_name, city)`.
    pub async fn find_by_category_and_district(
        pool: &PgPool,
        category_id: Uuid,
        district_name: &str,
        city: &str,
    ) -> Result<Option<Team>, AppError> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT t.* FROM teams t
            JOIN team_categories tc ON tc.team_id = t.id
            JOIN team_districts td ON td.team_id = t.id
            JOIN districts d ON d.id = td.district_id
            WHERE tc.category_id = $1 AND d.name = $2 AND d.city = $3
            ORDER BY t.id ASC
            LIMIT 1
            "#,
        )
        .bind(category_id)
        .bind(district_name)
        .bind(city)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Priority 2: team joined to `category_id` and any district in `city`.
    pub async fn find_by_category_and_city(
        pool: &PgPool,
        category_id: Uuid,
        city: &str,
    ) -> Result<Option<Team>, AppError> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT t.* FROM teams t
            JOIN team_categories tc ON tc.team_id = t.id
            JOIN team_districts td ON td.team_id = t.id
            JOIN districts d ON d.id = td.district_id
            WHERE tc.category_id = $1 AND d.city = $2
            ORDER BY t.id ASC
            LIMIT 1
            "#,
        )
        .bind(category_id)
        .bind(city)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Priority 3: team joined to `category_id` alone, regardless of district.
    pub async fn find_by_category(pool: &PgPool, category_id: Uuid) -> Result<Option<Team>, AppError> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT t.* FROM teams t
            JOIN team_categories tc ON tc.team_id = t.id
            WHERE tc.category_id = $1
            ORDER BY t.id ASC
            LIMIT 1
            "#,
        )
        .bind(category_id)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Clear `team_id` on every user belonging to `team_id`, then delete the team.
    pub async fn delete(pool: &PgPool, team_id: Uuid) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE users SET team_id = NULL WHERE team_id = $1")
            .bind(team_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(team_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
