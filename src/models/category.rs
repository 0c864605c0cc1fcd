//! Category model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A ticket category (e.g. "Infrastructure", "Sanitation"). Inactive
/// categories reject new tickets.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}
