//! Escalation review workflow: support requests, manager approves or rejects.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Path, State};
use axum::http::HeaderMap;
use axum::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::rate_limit::extract_client_ip;
use crate::middleware::rbac::require_role;
use crate::models::escalation::{CreateEscalation, EscalationRequest, ReviewEscalation};
use crate::models::user::Role;
use crate::principal::Principal;
use crate::repositories::{EscalationRepository, TicketRepository};
use crate::response::{created, ok, ApiResult};
use crate::routes::AppState;
use crate::services::escalation_service;
use crate::validation::constraints::ESCALATION_REASON_MAX_LENGTH;
use crate::validation::sanitize::validate_required;

pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(input): Json<CreateEscalation>,
) -> impl axum::response::IntoResponse {
    create_inner(state, principal, addr, headers, input).await
}

async fn create_inner(
    state: AppState,
    principal: Principal,
    addr: SocketAddr,
    headers: HeaderMap,
    input: CreateEscalation,
) -> Result<impl axum::response::IntoResponse, AppError> {
    require_role(&principal, &[Role::Support])?;

    let ip = extract_client_ip(&headers, Some(addr));
    if let Err(retry_after) = state.rate_limiter.check(ip, "create_escalation").await {
        return Err(AppError::rate_limited_after(
            "Too many escalations submitted, try again later",
            retry_after,
        ));
    }

    let reason = validate_required(&input.reason, "reason", ESCALATION_REASON_MAX_LENGTH)?;

    let ticket = TicketRepository::find_by_id(&state.db, input.ticket_id)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket not found"))?;

    let escalation = escalation_service::create(&state.db, &principal, &ticket, reason).await?;
    Ok(created(escalation))
}

pub async fn list(State(pool): State<PgPool>, principal: Principal) -> ApiResult<Vec<EscalationRequest>> {
    let escalations = escalation_service::list_for_principal(&pool, &principal).await?;
    ok(escalations)
}

pub async fn detail(
    State(pool): State<PgPool>,
    principal: Principal,
    Path(escalation_id): Path<Uuid>,
) -> ApiResult<EscalationRequest> {
    require_role(&principal, &[Role::Support, Role::Manager])?;

    let escalation = find_visible(&pool, &principal, escalation_id).await?;
    ok(escalation)
}

pub async fn approve(
    State(pool): State<PgPool>,
    principal: Principal,
    Path(escalation_id): Path<Uuid>,
    Json(input): Json<ReviewEscalation>,
) -> ApiResult<EscalationRequest> {
    review(pool, principal, escalation_id, true, input).await
}

pub async fn reject(
    State(pool): State<PgPool>,
    principal: Principal,
    Path(escalation_id): Path<Uuid>,
    Json(input): Json<ReviewEscalation>,
) -> ApiResult<EscalationRequest> {
    review(pool, principal, escalation_id, false, input).await
}

async fn review(
    pool: PgPool,
    principal: Principal,
    escalation_id: Uuid,
    approve: bool,
    input: ReviewEscalation,
) -> ApiResult<EscalationRequest> {
    require_role(&principal, &[Role::Manager])?;

    let escalation = EscalationRepository::find_by_id(&pool, escalation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Escalation not found"))?;

    let ticket = TicketRepository::find_by_id(&pool, escalation.ticket_id)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket not found"))?;

    let updated =
        escalation_service::review(&pool, &principal, &escalation, &ticket, approve, input.comment)
            .await?;
    ok(updated)
}

/// A manager sees any escalation; support only those tied to its own team.
async fn find_visible(
    pool: &PgPool,
    principal: &Principal,
    escalation_id: Uuid,
) -> Result<EscalationRequest, AppError> {
    let escalation = EscalationRepository::find_by_id(pool, escalation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Escalation not found"))?;

    if principal.role == Role::Manager {
        return Ok(escalation);
    }

    let ticket = TicketRepository::find_by_id(pool, escalation.ticket_id)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket not found"))?;

    if ticket.team_id.is_some() && ticket.team_id == principal.team_id {
        Ok(escalation)
    } else {
        Err(AppError::forbidden("Escalation not visible to your team"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_escalation_deserialize() {
        let json = r#"{
            "ticket_id": "550e8400-e29b-41d4-a716-446655440000",
            "reason": "No progress for two weeks"
        }"#;
        let input: CreateEscalation = serde_json::from_str(json).unwrap();
        assert_eq!(input.reason, "No progress for two weeks");
    }

    #[test]
    fn test_review_escalation_deserialize_with_comment() {
        let json = r#"{"comment": "Routed back to the field team"}"#;
        let input: ReviewEscalation = serde_json::from_str(json).unwrap();
        assert_eq!(input.comment, Some("Routed back to the field team".to_string()));
    }

    #[test]
    fn test_review_escalation_deserialize_without_comment() {
        let input: ReviewEscalation = serde_json::from_str("{}").unwrap();
        assert!(input.comment.is_none());
    }
}
