//! District reference data.

use axum::extract::State;
use sqlx::PgPool;

use crate::models::district::District;
use crate::principal::Principal;
use crate::repositories::DistrictRepository;
use crate::response::{ok, ApiResult};

pub async fn list(State(pool): State<PgPool>, _principal: Principal) -> ApiResult<Vec<District>> {
    let districts = DistrictRepository::list(&pool).await?;
    ok(districts)
}
