//! District repository for database operations.

use crate::error::AppError;
use crate::models::district::District;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for district database operations.
pub struct DistrictRepository;

impl DistrictRepository {
    pub async fn find_by_id(pool: &PgPool, district_id: Uuid) -> Result<Option<District>, AppError> {
        let district = sqlx::query_as::<_, District>("SELECT * FROM districts WHERE id = $1")
            .bind(district_id)
            .fetch_optional(pool)
            .await?;

        Ok(district)
    }

    pub async fn find_by_name_and_city(
        pool: &PgPool,
        name: &str,
        city: &str,
    ) -> Result<Option<District>, AppError> {
        let district = sqlx::query_as::<_, District>(
            "SELECT * FROM districts WHERE name = $1 AND city = $2",
        )
        .bind(name)
        .bind(city)
        .fetch_optional(pool)
        .await?;

        Ok(district)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<District>, AppError> {
        let districts =
            sqlx::query_as::<_, District>("SELECT * FROM districts ORDER BY city ASC, name ASC")
                .fetch_all(pool)
                .await?;

        Ok(districts)
    }
}
