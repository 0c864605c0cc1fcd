//! Category reference data.

use axum::extract::State;
use sqlx::PgPool;

use crate::models::category::Category;
use crate::principal::Principal;
use crate::repositories::CategoryRepository;
use crate::response::{ok, ApiResult};

/// List every category, including inactive ones, so clients can explain why
/// a category is not selectable.
pub async fn list(State(pool): State<PgPool>, _principal: Principal) -> ApiResult<Vec<Category>> {
    let categories = CategoryRepository::list(&pool).await?;
    ok(categories)
}
