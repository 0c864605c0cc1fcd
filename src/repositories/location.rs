//! Location repository for database operations.
//!
//! Writes the geometry column via `ST_SetSRID(ST_MakePoint(lng, lat), 4326)`
//! and never reads it back — callers only ever need the float columns.

use crate::error::AppError;
use crate::models::location::{CreateLocation, Location};
use sqlx::PgPool;
use uuid::Uuid;

pub struct LocationRepository;

impl LocationRepository {
    pub async fn create(pool: &PgPool, input: CreateLocation) -> Result<Location, AppError> {
        let location = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (coordinates, latitude, longitude, address, district, city)
            VALUES (ST_SetSRID(ST_MakePoint($2, $1), 4326), $1, $2, $3, $4, $5)
            RETURNING id, latitude, longitude, address, district, city
            "#,
        )
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(&input.address)
        .bind(&input.district)
        .bind(&input.city)
        .fetch_one(pool)
        .await?;

        Ok(location)
    }

    pub async fn find_by_id(pool: &PgPool, location_id: Uuid) -> Result<Option<Location>, AppError> {
        let location = sqlx::query_as::<_, Location>(
            "SELECT id, latitude, longitude, address, district, city FROM locations WHERE id = $1",
        )
        .bind(location_id)
        .fetch_optional(pool)
        .await?;

        Ok(location)
    }
}
