//! Team model.
//!
//! Tickets are assigned to teams, never to individual users. Membership is
//! expressed through `User.team_id`; routing eligibility through the
//! `TeamCategory`/`TeamDistrict` junction tables.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full team entity.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_fallback: bool,
}

/// Input for creating a team.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_fallback: bool,
    pub category_ids: Vec<Uuid>,
    pub district_ids: Vec<Uuid>,
}
