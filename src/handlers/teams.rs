//! Team roster, for assignment pickers. Internal to support/manager; citizens
//! never need to know how tickets are routed.

use axum::extract::State;
use sqlx::PgPool;

use crate::middleware::rbac::require_role;
use crate::models::team::Team;
use crate::models::user::Role;
use crate::principal::Principal;
use crate::repositories::TeamRepository;
use crate::response::{ok, ApiResult};

pub async fn list(State(pool): State<PgPool>, principal: Principal) -> ApiResult<Vec<Team>> {
    require_role(&principal, &[Role::Support, Role::Manager])?;
    let teams = TeamRepository::list(&pool).await?;
    ok(teams)
}
