//! Notification model.
//!
//! Per-user records written by the notification engine. Writers are
//! best-effort: a failure here never rolls back the primary action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    TicketCreated,
    TicketStatusChanged,
    TicketFollowed,
    CommentAdded,
    TicketAssigned,
    EscalationRequested,
    EscalationApproved,
    EscalationRejected,
    NewTicketForTeam,
}

impl NotificationType {
    /// Fixed title vocabulary per type, used as the notification's `title` field.
    pub fn title(&self) -> &'static str {
        match self {
            NotificationType::TicketCreated => "Ticket submitted",
            NotificationType::TicketStatusChanged => "Ticket status updated",
            NotificationType::TicketFollowed => "New follower",
            NotificationType::CommentAdded => "New comment",
            NotificationType::TicketAssigned => "Ticket assigned to your team",
            NotificationType::EscalationRequested => "Escalation requested",
            NotificationType::EscalationApproved => "Escalation approved",
            NotificationType::EscalationRejected => "Escalation rejected",
            NotificationType::NewTicketForTeam => "New ticket for your team",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ticket_id: Option<Uuid>,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub ticket_id: Option<Uuid>,
}

/// Truncate `text` to a 50-character preview, as used in notification messages.
pub fn preview(text: &str) -> String {
    const MAX: usize = 50;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(MAX).collect();
        format!("{}...", truncated)
    }
}
