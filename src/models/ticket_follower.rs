//! Ticket follower model.
//!
//! Composite primary key `(ticket_id, user_id)`. The reporter is auto-added
//! on ticket creation; follow/unfollow are idempotent thereafter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TicketFollower {
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub followed_at: DateTime<Utc>,
}
