//! Role-based access control (RBAC) helpers.
//!
//! Encodes the permission rules from the ticket and escalation services as
//! small, independently testable functions invoked by handlers.

use crate::error::AppError;
use crate::models::ticket::{Ticket, TicketStatus};
use crate::models::user::Role;
use crate::principal::Principal;

/// Require the principal to hold one of `roles`.
pub fn require_role(principal: &Principal, roles: &[Role]) -> Result<(), AppError> {
    if roles.contains(&principal.role) {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "You do not have permission to perform this action",
        ))
    }
}

/// Update permission: citizens may only edit their own ticket while it is NEW;
/// support/manager may edit any non-closed ticket; nobody may edit a closed one.
pub fn can_update_ticket(principal: &Principal, ticket: &Ticket) -> bool {
    if ticket.status == TicketStatus::Closed {
        return false;
    }

    match principal.role {
        Role::Citizen => {
            principal.user_id == ticket.reporter_id && ticket.status == TicketStatus::New
        }
        Role::Support | Role::Manager => true,
    }
}

/// Delete permission: only the reporter, and only while the ticket is NEW.
pub fn can_delete_ticket(principal: &Principal, ticket: &Ticket) -> bool {
    principal.user_id == ticket.reporter_id && ticket.status == TicketStatus::New
}

/// Status-change permission: support or manager.
pub fn can_change_status(principal: &Principal) -> bool {
    matches!(principal.role, Role::Support | Role::Manager)
}

/// Team-assignment permission: manager only.
pub fn can_assign_team(principal: &Principal) -> bool {
    principal.role == Role::Manager
}

/// List-assigned scoping: support sees only tickets for their own team.
pub fn assigned_team_scope(principal: &Principal) -> Option<uuid::Uuid> {
    match principal.role {
        Role::Support => principal.team_id,
        _ => None,
    }
}
