//! Reference validation for foreign key relationships.
//!
//! Provides consistent validation for referenced entities (categories, teams,
//! districts) before database operations. This ensures clear 404 errors instead of
//! cryptic foreign key constraint violations.

use crate::error::AppError;
use crate::repositories::{CategoryRepository, DistrictRepository, TeamRepository};
use sqlx::PgPool;
use uuid::Uuid;

/// Validate that a category exists and accepts new tickets.
pub async fn validate_active_category(pool: &PgPool, category_id: Uuid) -> Result<(), AppError> {
    if !CategoryRepository::is_active(pool, category_id).await? {
        return Err(AppError::not_found("Category not found or inactive"));
    }
    Ok(())
}

/// Validate that a team exists.
pub async fn validate_team(pool: &PgPool, team_id: Uuid) -> Result<(), AppError> {
    if TeamRepository::find_by_id(pool, team_id).await?.is_none() {
        return Err(AppError::not_found("Team not found"));
    }
    Ok(())
}

/// Validate that a district exists.
pub async fn validate_district(pool: &PgPool, district_id: Uuid) -> Result<(), AppError> {
    if DistrictRepository::find_by_id(pool, district_id).await?.is_none() {
        return Err(AppError::not_found("District not found"));
    }
    Ok(())
}
