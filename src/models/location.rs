//! Location model.
//!
//! Owned one-to-one by a Ticket (cascade delete). The database stores
//! `POINT(longitude latitude)` with SRID 4326 alongside plain float columns;
//! this struct only carries the float columns since the geometry column is
//! write-only from Rust's perspective (built via `ST_MakePoint` in the
//! repository layer) and never read back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Location {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub district: Option<String>,
    pub city: String,
}

#[derive(Debug, Clone)]
pub struct CreateLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub district: Option<String>,
    pub city: String,
}
