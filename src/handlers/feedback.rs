//! Citizen feedback on a resolved ticket.
//!
//! Collectible once the ticket has reached RESOLVED or CLOSED, at most once
//! per ticket: too early is 403, a duplicate is 409.

use axum::extract::{Path, State};
use axum::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::feedback::{CreateFeedback, Feedback};
use crate::models::ticket::TicketStatus;
use crate::principal::Principal;
use crate::repositories::{FeedbackRepository, TicketRepository};
use crate::response::{created, ok, ApiResult};
use crate::validation::constraints::{FEEDBACK_COMMENT_MAX_LENGTH, RATING_MAX, RATING_MIN};
use crate::validation::sanitize::{validate_optional, validate_rating};

pub async fn submit(
    State(pool): State<PgPool>,
    principal: Principal,
    Path(ticket_id): Path<Uuid>,
    Json(input): Json<CreateFeedback>,
) -> impl axum::response::IntoResponse {
    submit_inner(pool, principal, ticket_id, input).await
}

async fn submit_inner(
    pool: PgPool,
    principal: Principal,
    ticket_id: Uuid,
    input: CreateFeedback,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let ticket = TicketRepository::find_by_id(&pool, ticket_id)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket not found"))?;

    if principal.user_id != ticket.reporter_id {
        return Err(AppError::forbidden("Only the reporter may leave feedback"));
    }

    if !matches!(ticket.status, TicketStatus::Resolved | TicketStatus::Closed) {
        return Err(AppError::forbidden(
            "Feedback can only be left once the ticket is resolved",
        ));
    }

    if FeedbackRepository::find_by_ticket(&pool, ticket_id)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("Feedback already submitted for this ticket"));
    }

    let rating = validate_rating(input.rating, RATING_MIN, RATING_MAX)?;
    let comment = validate_optional(input.comment.as_deref(), "comment", FEEDBACK_COMMENT_MAX_LENGTH)?;

    let feedback = FeedbackRepository::create(&pool, ticket_id, principal.user_id, rating, comment.as_deref())
        .await?;

    Ok(created(feedback))
}

pub async fn get(
    State(pool): State<PgPool>,
    _principal: Principal,
    Path(ticket_id): Path<Uuid>,
) -> ApiResult<Option<Feedback>> {
    let feedback = FeedbackRepository::find_by_ticket(&pool, ticket_id).await?;
    ok(feedback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_feedback_deserialize_with_comment() {
        let json = r#"{"rating": 4, "comment": "Fixed quickly, thanks"}"#;
        let input: CreateFeedback = serde_json::from_str(json).unwrap();
        assert_eq!(input.rating, 4);
        assert_eq!(input.comment, Some("Fixed quickly, thanks".to_string()));
    }

    #[test]
    fn test_create_feedback_deserialize_without_comment() {
        let json = r#"{"rating": 5}"#;
        let input: CreateFeedback = serde_json::from_str(json).unwrap();
        assert_eq!(input.rating, 5);
        assert!(input.comment.is_none());
    }
}
