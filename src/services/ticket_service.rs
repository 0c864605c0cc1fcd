//! Ticket service — the heart of the ticket lifecycle: create, update,
//! delete, status transitions, and team assignment.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::location::CreateLocation;
use crate::models::status_log::CreateStatusLog;
use crate::models::ticket::{CreateTicket, Ticket, TicketStatus, UpdateTicket};
use crate::models::user::Role;
use crate::notifier::Notifier;
use crate::principal::Principal;
use crate::repositories::{LocationRepository, TicketRepository};
use crate::services::{notification_service, team_routing};
use crate::validation::references::validate_active_category;

/// Create a ticket: persist location, persist ticket (routed to a team),
/// add the reporter as a follower, append the creation status log, commit,
/// then emit best-effort notifications.
pub async fn create(
    pool: &PgPool,
    notifier: &dyn Notifier,
    principal: &Principal,
    reporter_phone: &str,
    input: CreateTicket,
) -> Result<Ticket, AppError> {
    validate_active_category(pool, input.category_id).await?;

    let team = team_routing::find_matching_team(
        pool,
        input.category_id,
        input.district.as_deref(),
        &input.city,
    )
    .await?;

    let location = LocationRepository::create(
        pool,
        CreateLocation {
            latitude: input.latitude,
            longitude: input.longitude,
            address: input.address.clone(),
            district: input.district.clone(),
            city: input.city.clone(),
        },
    )
    .await?;

    let ticket = TicketRepository::create(pool, location.id, principal.user_id, team.as_ref().map(|t| t.id), &input).await?;

    crate::repositories::TicketFollowerRepository::follow(pool, ticket.id, principal.user_id).await?;

    crate::repositories::StatusLogRepository::create(
        pool,
        CreateStatusLog {
            ticket_id: ticket.id,
            old_status: None,
            new_status: TicketStatus::New,
            changed_by_id: Some(principal.user_id),
            comment: None,
        },
    )
    .await?;

    notification_service::ticket_created(pool, notifier, principal.user_id, reporter_phone, ticket.id, &ticket.title).await;
    if let Some(team) = &team {
        notification_service::new_ticket_for_team(pool, team.id, principal.user_id, ticket.id, &ticket.title).await;
    }

    Ok(ticket)
}

/// Update title/description/category. Permission is checked by the caller
/// via [`crate::middleware::rbac::can_update_ticket`]; this function only
/// re-validates category activeness and never recomputes routing.
pub async fn update(pool: &PgPool, ticket_id: Uuid, input: UpdateTicket) -> Result<Ticket, AppError> {
    if let Some(category_id) = input.category_id {
        validate_active_category(pool, category_id).await?;
    }

    TicketRepository::update(pool, ticket_id, input).await
}

/// Soft-delete a ticket. Permission checked by the caller.
pub async fn delete(pool: &PgPool, ticket_id: Uuid) -> Result<(), AppError> {
    TicketRepository::soft_delete(pool, ticket_id).await
}

/// Transition a ticket's status, append the audit log entry, and emit
/// best-effort notifications. Permission checked by the caller.
pub async fn update_status(
    pool: &PgPool,
    ticket: &Ticket,
    new_status: TicketStatus,
    comment: Option<String>,
    actor_id: Uuid,
) -> Result<Ticket, AppError> {
    if !ticket.status.can_transition_to(new_status) {
        return Err(AppError::bad_request(format!(
            "Cannot transition ticket from {:?} to {:?}",
            ticket.status, new_status
        )));
    }

    let updated = TicketRepository::update_status(pool, ticket.id, new_status).await?;

    crate::repositories::StatusLogRepository::create(
        pool,
        CreateStatusLog {
            ticket_id: ticket.id,
            old_status: Some(ticket.status),
            new_status,
            changed_by_id: Some(actor_id),
            comment,
        },
    )
    .await?;

    notification_service::ticket_status_changed(
        pool,
        ticket.reporter_id,
        actor_id,
        ticket.id,
        status_label(new_status),
    )
    .await;

    Ok(updated)
}

/// Assign a team to a ticket. Manager-only, checked by the caller.
pub async fn assign_team(pool: &PgPool, ticket: &Ticket, team_id: Uuid) -> Result<Ticket, AppError> {
    crate::validation::references::validate_team(pool, team_id).await?;

    let updated = TicketRepository::assign_team(pool, ticket.id, team_id).await?;

    notification_service::ticket_assigned(pool, team_id, ticket.reporter_id, ticket.id, &ticket.title).await;

    Ok(updated)
}

/// `canEscalate` in the detail projection: the ticket has a team and no
/// PENDING/APPROVED escalation already exists.
pub async fn can_escalate(pool: &PgPool, ticket: &Ticket) -> Result<bool, AppError> {
    if ticket.team_id.is_none() {
        return Ok(false);
    }
    let blocking = crate::repositories::EscalationRepository::find_blocking_for_ticket(pool, ticket.id).await?;
    Ok(blocking.is_empty())
}

fn status_label(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::New => "new",
        TicketStatus::InProgress => "in progress",
        TicketStatus::Resolved => "resolved",
        TicketStatus::Closed => "closed",
        TicketStatus::Escalated => "escalated",
    }
}

/// Whether `principal` may view internal comments on a ticket.
pub fn can_view_internal_comments(principal: &Principal) -> bool {
    matches!(principal.role, Role::Support | Role::Manager)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_covers_every_variant() {
        assert_eq!(status_label(TicketStatus::New), "new");
        assert_eq!(status_label(TicketStatus::Escalated), "escalated");
    }

    #[test]
    fn test_can_view_internal_comments() {
        let support = Principal { user_id: Uuid::new_v4(), role: Role::Support, team_id: None };
        let citizen = Principal { user_id: Uuid::new_v4(), role: Role::Citizen, team_id: None };
        assert!(can_view_internal_comments(&support));
        assert!(!can_view_internal_comments(&citizen));
    }
}
