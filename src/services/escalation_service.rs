//! Escalation service: support requests a manager review; a manager
//! approves or rejects it.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::escalation::{EscalationRequest, EscalationStatus};
use crate::models::status_log::CreateStatusLog;
use crate::models::ticket::{Ticket, TicketStatus};
use crate::principal::Principal;
use crate::repositories::{EscalationRepository, StatusLogRepository, TicketRepository};
use crate::services::notification_service;

/// Request an escalation on `ticket` as a SUPPORT principal.
pub async fn create(
    pool: &PgPool,
    principal: &Principal,
    ticket: &Ticket,
    reason: String,
) -> Result<EscalationRequest, AppError> {
    let ticket_team_id = ticket
        .team_id
        .ok_or_else(|| AppError::conflict("Ticket has no assigned team"))?;

    if principal.team_id != Some(ticket_team_id) {
        return Err(AppError::forbidden("Can only escalate tickets assigned to your own team"));
    }

    let blocking = EscalationRepository::find_blocking_for_ticket(pool, ticket.id).await?;
    if blocking.iter().any(|e| e.status.is_blocking()) {
        return Err(AppError::conflict("An escalation is already pending or approved for this ticket"));
    }

    if !ticket.status.can_transition_to(TicketStatus::Escalated) {
        return Err(AppError::bad_request(format!(
            "Cannot escalate a ticket in {:?} status",
            ticket.status
        )));
    }

    let escalation = EscalationRepository::create(pool, ticket.id, principal.user_id, &reason).await?;

    TicketRepository::update_status(pool, ticket.id, TicketStatus::Escalated).await?;
    StatusLogRepository::create(
        pool,
        CreateStatusLog {
            ticket_id: ticket.id,
            old_status: Some(ticket.status),
            new_status: TicketStatus::Escalated,
            changed_by_id: Some(principal.user_id),
            comment: Some(format!("Escalation requested: {}", reason)),
        },
    )
    .await?;

    notification_service::escalation_requested(pool, ticket.id, &reason).await;

    Ok(escalation)
}

/// Approve or reject a PENDING escalation as a MANAGER principal.
pub async fn review(
    pool: &PgPool,
    principal: &Principal,
    escalation: &EscalationRequest,
    ticket: &Ticket,
    approve: bool,
    review_comment: Option<String>,
) -> Result<EscalationRequest, AppError> {
    if escalation.status != EscalationStatus::Pending {
        return Err(AppError::conflict("Escalation is not pending review"));
    }

    let status = if approve { EscalationStatus::Approved } else { EscalationStatus::Rejected };
    let updated = EscalationRepository::review(
        pool,
        escalation.id,
        principal.user_id,
        status,
        review_comment.as_deref(),
    )
    .await?;

    TicketRepository::update_status(pool, ticket.id, TicketStatus::InProgress).await?;

    let verb = if approve { "approved" } else { "rejected" };
    let log_comment = match &review_comment {
        Some(comment) => format!("Escalation {}: {}", verb, comment),
        None => format!("Escalation {}", verb),
    };

    StatusLogRepository::create(
        pool,
        CreateStatusLog {
            ticket_id: ticket.id,
            old_status: Some(ticket.status),
            new_status: TicketStatus::InProgress,
            changed_by_id: Some(principal.user_id),
            comment: Some(log_comment),
        },
    )
    .await?;

    notification_service::escalation_reviewed(pool, ticket.reporter_id, ticket.id, approve).await;

    Ok(updated)
}

/// List escalations visible to `principal`: all for managers, team-scoped
/// for support, empty for a support principal without a team.
pub async fn list_for_principal(pool: &PgPool, principal: &Principal) -> Result<Vec<EscalationRequest>, AppError> {
    use crate::models::user::Role;

    match principal.role {
        Role::Manager => EscalationRepository::list_all(pool).await,
        Role::Support => match principal.team_id {
            Some(team_id) => EscalationRepository::list_for_team(pool, team_id).await,
            None => Ok(Vec::new()),
        },
        Role::Citizen => Err(AppError::forbidden("Citizens cannot view escalations")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ticket_with(team_id: Option<Uuid>, status: TicketStatus) -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            title: "Pothole".to_string(),
            description: "desc".to_string(),
            status,
            category_id: Uuid::new_v4(),
            location_id: Uuid::new_v4(),
            reporter_id: Uuid::new_v4(),
            team_id,
            resolved_at: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_escalated_transition_allowed_from_new_and_in_progress() {
        assert!(TicketStatus::New.can_transition_to(TicketStatus::Escalated));
        assert!(TicketStatus::InProgress.can_transition_to(TicketStatus::Escalated));
        assert!(!TicketStatus::Resolved.can_transition_to(TicketStatus::Escalated));
    }

    #[test]
    fn test_ticket_without_team_has_no_escalation_path() {
        let t = ticket_with(None, TicketStatus::New);
        assert!(t.team_id.is_none());
    }
}
