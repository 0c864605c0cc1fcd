//! Ticket model and related types.
//!
//! Tickets represent citizen-reported issues routed to a team for resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

/// Ticket status enum matching the database type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "ticket_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    New,
    InProgress,
    Resolved,
    Closed,
    Escalated,
}

impl TicketStatus {
    /// Returns the statuses considered "active" for nearby search and workload counts.
    pub fn active_statuses() -> &'static [TicketStatus] {
        &[TicketStatus::New, TicketStatus::InProgress]
    }

    /// Check if a status transition is valid, per the single source-of-truth table:
    ///
    /// ```text
    /// NEW          -> {IN_PROGRESS, ESCALATED}
    /// IN_PROGRESS  -> {RESOLVED, ESCALATED}
    /// ESCALATED    -> {IN_PROGRESS}
    /// RESOLVED     -> {CLOSED, IN_PROGRESS}
    /// CLOSED       -> {IN_PROGRESS}
    /// ```
    pub fn can_transition_to(&self, new_status: TicketStatus) -> bool {
        matches!(
            (self, new_status),
            (TicketStatus::New, TicketStatus::InProgress)
                | (TicketStatus::New, TicketStatus::Escalated)
                | (TicketStatus::InProgress, TicketStatus::Resolved)
                | (TicketStatus::InProgress, TicketStatus::Escalated)
                | (TicketStatus::Escalated, TicketStatus::InProgress)
                | (TicketStatus::Resolved, TicketStatus::Closed)
                | (TicketStatus::Resolved, TicketStatus::InProgress)
                | (TicketStatus::Closed, TicketStatus::InProgress)
        )
    }
}

/// Full ticket entity with all fields.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub category_id: Uuid,
    pub location_id: Uuid,
    pub reporter_id: Uuid,
    pub team_id: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Summary view of a ticket for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TicketSummary {
    pub id: Uuid,
    pub title: String,
    pub status: TicketStatus,
    pub category_id: Uuid,
    pub reporter_id: Uuid,
    pub team_id: Option<Uuid>,
    pub city: String,
    pub district: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicket {
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub district: Option<String>,
    #[serde(default = "default_city")]
    pub city: String,
}

fn default_city() -> String {
    "Istanbul".to_string()
}

/// Input for updating an existing ticket. Only title, description, and category
/// may change after creation; routing is never recomputed on update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTicket {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
}

/// Filters for listing tickets.
#[derive(Debug, Clone, Default)]
pub struct TicketFilters {
    pub statuses: Option<Vec<TicketStatus>>,
    pub category_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub reporter_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

/// Ticket detail payload: the fully-loaded aggregate root, eager-loading
/// everything a viewer needs in one round-trip, plus computed viewer-relative
/// flags.
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetail {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub category: super::category::Category,
    pub location: super::location::Location,
    pub reporter: super::user::UserSummary,
    pub assigned_team: Option<super::team::Team>,
    pub photos: Vec<super::ticket_photo::TicketPhotoSummary>,
    pub comments: Vec<super::comment::CommentWithAuthor>,
    pub followers: Vec<super::user::UserSummary>,
    pub status_logs: Vec<super::status_log::StatusLogWithAuthor>,
    pub feedback: Option<super::feedback::Feedback>,
    pub escalations: Vec<super::escalation::EscalationRequest>,
    pub is_following: bool,
    pub has_feedback: bool,
    pub has_escalation: bool,
    pub can_escalate: bool,
}
