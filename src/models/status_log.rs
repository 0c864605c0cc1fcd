//! Ticket status log model.
//!
//! Append-only audit trail of status changes. A ticket's current status is
//! always consistent with the most recent entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ticket::TicketStatus;

/// A status change log entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StatusLog {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub old_status: Option<TicketStatus>,
    pub new_status: TicketStatus,
    pub changed_by_id: Option<Uuid>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for appending a status log entry.
#[derive(Debug, Clone)]
pub struct CreateStatusLog {
    pub ticket_id: Uuid,
    pub old_status: Option<TicketStatus>,
    pub new_status: TicketStatus,
    pub changed_by_id: Option<Uuid>,
    pub comment: Option<String>,
}

/// A status log entry joined to the acting user's display name, for the
/// ticket detail aggregate. `changed_by_name` is `None` for system-generated
/// entries or if the acting user was deleted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StatusLogWithAuthor {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub old_status: Option<TicketStatus>,
    pub new_status: TicketStatus,
    pub changed_by_id: Option<Uuid>,
    pub changed_by_name: Option<String>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
