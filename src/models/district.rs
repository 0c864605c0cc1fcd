//! District model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A district within a city. `(name, city)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct District {
    pub id: Uuid,
    pub name: String,
    pub city: String,
}
