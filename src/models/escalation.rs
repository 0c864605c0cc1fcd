//! Escalation request model.
//!
//! A ticket may have many historical escalations but at most one
//! non-terminal (PENDING or APPROVED) at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "escalation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EscalationStatus {
    Pending,
    Approved,
    Rejected,
}

impl EscalationStatus {
    /// Non-terminal statuses that block a new escalation on the same ticket.
    pub fn is_blocking(&self) -> bool {
        matches!(self, EscalationStatus::Pending | EscalationStatus::Approved)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EscalationRequest {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub requester_id: Option<Uuid>,
    pub reviewer_id: Option<Uuid>,
    pub reason: String,
    pub status: EscalationStatus,
    pub review_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEscalation {
    pub ticket_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewEscalation {
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_statuses() {
        assert!(EscalationStatus::Pending.is_blocking());
        assert!(EscalationStatus::Approved.is_blocking());
        assert!(!EscalationStatus::Rejected.is_blocking());
    }
}
