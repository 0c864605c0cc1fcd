//! Category repository for database operations.

use crate::error::AppError;
use crate::models::category::Category;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for category database operations.
pub struct CategoryRepository;

impl CategoryRepository {
    pub async fn find_by_id(pool: &PgPool, category_id: Uuid) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(pool)
            .await?;

        Ok(category)
    }

    /// True if the category exists and accepts new tickets.
    pub async fn is_active(pool: &PgPool, category_id: Uuid) -> Result<bool, AppError> {
        let active = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1 AND is_active = TRUE)",
        )
        .bind(category_id)
        .fetch_one(pool)
        .await?;

        Ok(active)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(pool)
            .await?;

        Ok(categories)
    }
}
