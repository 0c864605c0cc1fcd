//! Ticket lifecycle handlers: creation, listing, detail, lifecycle
//! transitions, team assignment, following, comments, and photo uploads.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Multipart, Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::rate_limit::extract_client_ip;
use crate::middleware::rbac::{
    assigned_team_scope, can_assign_team, can_change_status, can_delete_ticket, can_update_ticket,
    require_role,
};
use crate::models::comment::{Comment, CreateComment};
use crate::models::ticket::{
    CreateTicket, Ticket, TicketDetail, TicketFilters, TicketStatus, TicketSummary, UpdateTicket,
};
use crate::models::ticket_photo::{CreateTicketPhoto, TicketPhoto};
use crate::models::user::{Role, UserSummary};
use crate::principal::Principal;
use crate::repositories::{
    CategoryRepository, CommentRepository, EscalationRepository, FeedbackRepository,
    LocationRepository, StatusLogRepository, TeamRepository, TicketFollowerRepository,
    TicketPhotoRepository, TicketRepository, UserRepository,
};
use crate::response::{created, empty, no_content, ok, ApiResult, Page};
use crate::routes::AppState;
use crate::services::{notification_service, ticket_service};
use crate::utils::file_validation::validate_image_content_type;
use crate::validation::constraints::{
    COMMENT_MAX_LENGTH, DESCRIPTION_MAX_LENGTH, DESCRIPTION_MIN_LENGTH, PAGE_DEFAULT,
    PAGE_SIZE_DEFAULT, PAGE_SIZE_MAX, RADIUS_DEFAULT_METERS, RADIUS_MAX_METERS, RADIUS_MIN_METERS,
    TITLE_MAX_LENGTH, TITLE_MIN_LENGTH,
};
use crate::validation::sanitize::{
    validate_latitude, validate_longitude, validate_optional, validate_radius, validate_required,
    validate_text,
};

/// Photos accepted per ticket; enforced alongside the request-body size cap.
const MAX_PHOTOS_PER_TICKET: i64 = 5;
const ALLOWED_PHOTO_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

fn pagination(page: Option<i64>, page_size: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(PAGE_DEFAULT).max(1);
    let page_size = page_size.unwrap_or(PAGE_SIZE_DEFAULT).clamp(1, PAGE_SIZE_MAX);
    let offset = (page - 1) * page_size;
    (page, page_size, offset)
}

/// Parse a comma-separated status list from a query string. `axum::Query` is
/// backed by `serde_urlencoded`, which has no support for a repeated-key
/// `Vec<T>` field, so status filters are passed as one comma-joined value
/// (e.g. `?status=new,in_progress`) instead.
fn parse_statuses(raw: &Option<String>) -> Option<Vec<TicketStatus>> {
    raw.as_ref().map(|s| {
        s.split(',')
            .filter_map(|status_str| match status_str.trim() {
                "new" => Some(TicketStatus::New),
                "in_progress" => Some(TicketStatus::InProgress),
                "resolved" => Some(TicketStatus::Resolved),
                "closed" => Some(TicketStatus::Closed),
                "escalated" => Some(TicketStatus::Escalated),
                _ => None,
            })
            .collect()
    })
}

async fn load_ticket(pool: &PgPool, ticket_id: Uuid) -> Result<Ticket, AppError> {
    TicketRepository::find_by_id(pool, ticket_id)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket not found"))
}

pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(input): Json<CreateTicket>,
) -> impl IntoResponse {
    create_inner(state, principal, addr, headers, input).await
}

async fn create_inner(
    state: AppState,
    principal: Principal,
    addr: SocketAddr,
    headers: HeaderMap,
    input: CreateTicket,
) -> Result<impl IntoResponse, AppError> {
    let ip = extract_client_ip(&headers, Some(addr));
    if let Err(retry_after) = state.rate_limiter.check(ip, "create_ticket").await {
        return Err(AppError::rate_limited_after(
            "Too many tickets submitted, try again later",
            retry_after,
        ));
    }

    let title = validate_required(&input.title, "title", TITLE_MAX_LENGTH)?;
    if title.len() < TITLE_MIN_LENGTH {
        return Err(AppError::validation(format!(
            "title must be at least {} characters",
            TITLE_MIN_LENGTH
        )));
    }
    let description = validate_required(&input.description, "description", DESCRIPTION_MAX_LENGTH)?;
    if description.len() < DESCRIPTION_MIN_LENGTH {
        return Err(AppError::validation(format!(
            "description must be at least {} characters",
            DESCRIPTION_MIN_LENGTH
        )));
    }
    let latitude = validate_latitude(input.latitude)?;
    let longitude = validate_longitude(input.longitude)?;
    let address = validate_optional(input.address.as_deref(), "address", TITLE_MAX_LENGTH)?;
    let district = validate_optional(input.district.as_deref(), "district", TITLE_MAX_LENGTH)?;
    let city = validate_text(&input.city, "city", TITLE_MAX_LENGTH)?;

    let reporter = UserRepository::find_by_id(&state.db, principal.user_id)
        .await?
        .ok_or_else(|| AppError::server_error("Authenticated user not found"))?;

    let sanitized = CreateTicket {
        title,
        description,
        category_id: input.category_id,
        latitude,
        longitude,
        address,
        district,
        city,
    };

    let ticket = ticket_service::create(
        &state.db,
        state.notifier.as_ref(),
        &principal,
        &reporter.phone,
        sanitized,
    )
    .await?;

    Ok(created(ticket))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub category_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// General ticket browser, scoped by role: support sees its own team's
/// tickets, managers see everything (optionally filtered by `team_id`).
pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListQuery>,
) -> ApiResult<Page<TicketSummary>> {
    require_role(&principal, &[Role::Support, Role::Manager])?;

    let (page, page_size, offset) = pagination(query.page, query.page_size);
    let team_id = match principal.role {
        Role::Support => assigned_team_scope(&principal),
        _ => query.team_id,
    };

    let filters = TicketFilters {
        statuses: parse_statuses(&query.status),
        category_id: query.category_id,
        team_id,
        reporter_id: None,
        limit: page_size,
        offset,
    };

    let items = TicketRepository::list(&state.db, &filters).await?;
    let total = TicketRepository::count(&state.db, &filters).await?;
    ok(Page::new(items, total, page, page_size))
}

#[derive(Debug, Deserialize)]
pub struct MyTicketsQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

pub async fn my_tickets(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<MyTicketsQuery>,
) -> ApiResult<Page<TicketSummary>> {
    let (page, page_size, offset) = pagination(query.page, query.page_size);

    let filters = TicketFilters {
        statuses: parse_statuses(&query.status),
        category_id: None,
        team_id: None,
        reporter_id: Some(principal.user_id),
        limit: page_size,
        offset,
    };

    let items = TicketRepository::list(&state.db, &filters).await?;
    let total = TicketRepository::count(&state.db, &filters).await?;
    ok(Page::new(items, total, page, page_size))
}

#[derive(Debug, Deserialize)]
pub struct AssignedQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Tickets assigned to the caller's team. A support principal with no team
/// sees an empty page rather than an error.
pub async fn assigned_tickets(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<AssignedQuery>,
) -> ApiResult<Page<TicketSummary>> {
    require_role(&principal, &[Role::Support, Role::Manager])?;

    if principal.role == Role::Support && principal.team_id.is_none() {
        let (page, page_size, _) = pagination(query.page, query.page_size);
        return ok(Page::new(Vec::new(), 0, page, page_size));
    }

    let (page, page_size, offset) = pagination(query.page, query.page_size);
    let filters = TicketFilters {
        statuses: parse_statuses(&query.status),
        category_id: None,
        team_id: principal.team_id,
        reporter_id: None,
        limit: page_size,
        offset,
    };

    let items = TicketRepository::list(&state.db, &filters).await?;
    let total = TicketRepository::count(&state.db, &filters).await?;
    ok(Page::new(items, total, page, page_size))
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: Option<f64>,
    pub category_id: Option<Uuid>,
}

pub async fn nearby(
    State(state): State<AppState>,
    _principal: Principal,
    Query(query): Query<NearbyQuery>,
) -> ApiResult<Vec<TicketSummary>> {
    let latitude = validate_latitude(query.latitude)?;
    let longitude = validate_longitude(query.longitude)?;
    let radius = validate_radius(
        query.radius_meters.unwrap_or(RADIUS_DEFAULT_METERS),
        RADIUS_MIN_METERS,
        RADIUS_MAX_METERS,
    )?;

    let tickets = TicketRepository::find_nearby(&state.db, latitude, longitude, radius, query.category_id)
        .await?;
    ok(tickets)
}

/// Ticket detail is the fully-loaded aggregate root: every related entity a
/// viewer needs is eager-loaded in this one handler rather than requiring
/// follow-up requests. Comments are filtered by `is_internal` for citizens.
pub async fn detail(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_id): Path<Uuid>,
) -> ApiResult<TicketDetail> {
    let ticket = load_ticket(&state.db, ticket_id).await?;

    let category = CategoryRepository::find_by_id(&state.db, ticket.category_id)
        .await?
        .ok_or_else(|| AppError::server_error("Ticket references a missing category"))?;

    let location = LocationRepository::find_by_id(&state.db, ticket.location_id)
        .await?
        .ok_or_else(|| AppError::server_error("Ticket references a missing location"))?;

    let reporter = UserRepository::find_by_id(&state.db, ticket.reporter_id)
        .await?
        .map(|user| UserSummary { id: user.id, name: user.name, role: user.role })
        .ok_or_else(|| AppError::server_error("Ticket references a missing reporter"))?;

    let assigned_team = match ticket.team_id {
        Some(team_id) => TeamRepository::find_by_id(&state.db, team_id).await?,
        None => None,
    };

    let photos = TicketPhotoRepository::find_by_ticket_id(&state.db, ticket_id).await?;

    let include_internal = ticket_service::can_view_internal_comments(&principal);
    let comments = CommentRepository::list_for_ticket_with_author(&state.db, ticket_id, include_internal)
        .await?;

    let followers = TicketFollowerRepository::list_follower_users(&state.db, ticket_id).await?;
    let status_logs = StatusLogRepository::list_for_ticket_with_author(&state.db, ticket_id).await?;
    let feedback = FeedbackRepository::find_by_ticket(&state.db, ticket_id).await?;
    let escalations = EscalationRepository::list_for_ticket(&state.db, ticket_id).await?;

    let is_following = TicketFollowerRepository::is_following(&state.db, ticket_id, principal.user_id).await?;
    let has_feedback = feedback.is_some();
    let blocking = EscalationRepository::find_blocking_for_ticket(&state.db, ticket_id).await?;
    let has_escalation = !blocking.is_empty();
    let can_escalate = ticket.team_id.is_some() && blocking.is_empty();

    ok(TicketDetail {
        ticket,
        category,
        location,
        reporter,
        assigned_team,
        photos,
        comments,
        followers,
        status_logs,
        feedback,
        escalations,
        is_following,
        has_feedback,
        has_escalation,
        can_escalate,
    })
}

pub async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_id): Path<Uuid>,
    Json(input): Json<UpdateTicket>,
) -> ApiResult<Ticket> {
    let ticket = load_ticket(&state.db, ticket_id).await?;
    if !can_update_ticket(&principal, &ticket) {
        return Err(AppError::forbidden("You cannot edit this ticket"));
    }

    let title = match input.title {
        Some(title) => {
            let title = validate_required(&title, "title", TITLE_MAX_LENGTH)?;
            if title.len() < TITLE_MIN_LENGTH {
                return Err(AppError::validation(format!(
                    "title must be at least {} characters",
                    TITLE_MIN_LENGTH
                )));
            }
            Some(title)
        }
        None => None,
    };
    let description = match input.description {
        Some(description) => {
            let description = validate_required(&description, "description", DESCRIPTION_MAX_LENGTH)?;
            if description.len() < DESCRIPTION_MIN_LENGTH {
                return Err(AppError::validation(format!(
                    "description must be at least {} characters",
                    DESCRIPTION_MIN_LENGTH
                )));
            }
            Some(description)
        }
        None => None,
    };

    let updated = ticket_service::update(
        &state.db,
        ticket_id,
        UpdateTicket { title, description, category_id: input.category_id },
    )
    .await?;
    ok(updated)
}

pub async fn delete(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_id): Path<Uuid>,
) -> impl IntoResponse {
    delete_inner(state, principal, ticket_id).await
}

async fn delete_inner(
    state: AppState,
    principal: Principal,
    ticket_id: Uuid,
) -> Result<impl IntoResponse, AppError> {
    let ticket = load_ticket(&state.db, ticket_id).await?;
    if !can_delete_ticket(&principal, &ticket) {
        return Err(AppError::forbidden("You cannot delete this ticket"));
    }

    ticket_service::delete(&state.db, ticket_id).await?;
    Ok(no_content())
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusBody {
    pub status: TicketStatus,
    pub comment: Option<String>,
}

pub async fn change_status(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_id): Path<Uuid>,
    Json(input): Json<ChangeStatusBody>,
) -> ApiResult<Ticket> {
    if !can_change_status(&principal) {
        return Err(AppError::forbidden("You cannot change this ticket's status"));
    }

    let ticket = load_ticket(&state.db, ticket_id).await?;
    let comment = validate_optional(input.comment.as_deref(), "comment", COMMENT_MAX_LENGTH)?;

    let updated =
        ticket_service::update_status(&state.db, &ticket, input.status, comment, principal.user_id).await?;
    ok(updated)
}

#[derive(Debug, Deserialize)]
pub struct AssignTeamBody {
    pub team_id: Uuid,
}

pub async fn assign_team(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_id): Path<Uuid>,
    Json(input): Json<AssignTeamBody>,
) -> ApiResult<Ticket> {
    if !can_assign_team(&principal) {
        return Err(AppError::forbidden("Only a manager may assign a team"));
    }

    let ticket = load_ticket(&state.db, ticket_id).await?;
    let updated = ticket_service::assign_team(&state.db, &ticket, input.team_id).await?;
    ok(updated)
}

pub async fn follow(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_id): Path<Uuid>,
) -> ApiResult<()> {
    let ticket = load_ticket(&state.db, ticket_id).await?;
    TicketFollowerRepository::follow(&state.db, ticket_id, principal.user_id).await?;
    notification_service::ticket_followed(&state.db, ticket.reporter_id, principal.user_id, ticket_id).await;
    empty()
}

pub async fn unfollow(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_id): Path<Uuid>,
) -> impl IntoResponse {
    unfollow_inner(state, principal, ticket_id).await
}

async fn unfollow_inner(
    state: AppState,
    principal: Principal,
    ticket_id: Uuid,
) -> Result<impl IntoResponse, AppError> {
    TicketFollowerRepository::unfollow(&state.db, ticket_id, principal.user_id).await?;
    Ok(no_content())
}

pub async fn list_comments(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_id): Path<Uuid>,
) -> ApiResult<Vec<Comment>> {
    load_ticket(&state.db, ticket_id).await?;
    let include_internal = ticket_service::can_view_internal_comments(&principal);
    let comments = CommentRepository::list_for_ticket(&state.db, ticket_id, include_internal).await?;
    ok(comments)
}

pub async fn add_comment(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_id): Path<Uuid>,
    Json(input): Json<CreateComment>,
) -> impl IntoResponse {
    add_comment_inner(state, principal, ticket_id, input).await
}

async fn add_comment_inner(
    state: AppState,
    principal: Principal,
    ticket_id: Uuid,
    input: CreateComment,
) -> Result<impl IntoResponse, AppError> {
    let ticket = load_ticket(&state.db, ticket_id).await?;
    let content = validate_required(&input.content, "content", COMMENT_MAX_LENGTH)?;

    let can_mark_internal = ticket_service::can_view_internal_comments(&principal);
    let is_internal = input.is_internal && can_mark_internal;

    let comment = CommentRepository::create(&state.db, ticket_id, principal.user_id, &content, is_internal)
        .await?;

    if !is_internal {
        notification_service::comment_added(
            &state.db,
            ticket.reporter_id,
            principal.user_id,
            ticket.team_id,
            ticket_id,
            &content,
        )
        .await;
    }

    Ok(created(comment))
}

pub async fn upload_photo(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_id): Path<Uuid>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    upload_photo_inner(state, principal, ticket_id, &mut multipart).await
}

async fn upload_photo_inner(
    state: AppState,
    principal: Principal,
    ticket_id: Uuid,
    multipart: &mut Multipart,
) -> Result<impl IntoResponse, AppError> {
    load_ticket(&state.db, ticket_id).await?;

    let existing = TicketPhotoRepository::count_by_ticket_id(&state.db, ticket_id).await?;
    if existing >= MAX_PHOTOS_PER_TICKET {
        return Err(AppError::conflict(format!(
            "Ticket already has the maximum of {} photos",
            MAX_PHOTOS_PER_TICKET
        )));
    }

    let field = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(format!("Invalid multipart body: {}", err)))?
        .ok_or_else(|| AppError::bad_request("No photo field in request"))?;

    let content_type = field
        .content_type()
        .map(str::to_string)
        .ok_or_else(|| AppError::bad_request("Missing Content-Type on photo field"))?;

    if !ALLOWED_PHOTO_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(AppError::validation(format!(
            "Unsupported photo content type: {}",
            content_type
        )));
    }

    let data = field
        .bytes()
        .await
        .map_err(|err| AppError::bad_request(format!("Failed to read photo data: {}", err)))?;

    if data.len() > state.max_photo_size {
        return Err(AppError::validation("Photo exceeds the maximum allowed size"));
    }

    if !validate_image_content_type(&data, &content_type) {
        return Err(AppError::validation(
            "Photo content does not match its declared content type",
        ));
    }

    let folder = format!("tickets/{}", ticket_id);
    let storage_key = state.storage.put(data.to_vec(), &content_type, &folder).await?;

    let photo = TicketPhotoRepository::create(
        &state.db,
        CreateTicketPhoto {
            ticket_id,
            storage_key,
            content_type,
            size_bytes: data.len() as i32,
            uploaded_by: principal.user_id,
        },
    )
    .await?;

    Ok(created(photo_response(&state, photo)))
}

#[derive(Debug, serde::Serialize)]
struct PhotoResponse {
    #[serde(flatten)]
    photo: TicketPhoto,
    url: String,
}

fn photo_response(state: &AppState, photo: TicketPhoto) -> PhotoResponse {
    let url = state.storage.public_url(&photo.storage_key);
    PhotoResponse { photo, url }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_deserialize_empty() {
        let query: ListQuery = serde_urlencoded::from_str("").unwrap();
        assert!(query.status.is_none());
        assert!(query.category_id.is_none());
        assert!(query.team_id.is_none());
        assert!(query.page.is_none());
        assert!(query.page_size.is_none());
    }

    #[test]
    fn test_list_query_with_status_filter() {
        let query: ListQuery = serde_urlencoded::from_str("status=new,in_progress").unwrap();
        let statuses = parse_statuses(&query.status).unwrap();
        assert_eq!(statuses.len(), 2);
        assert!(statuses.contains(&TicketStatus::New));
        assert!(statuses.contains(&TicketStatus::InProgress));
    }

    #[test]
    fn test_parse_statuses_single_value() {
        let raw = Some("resolved".to_string());
        let statuses = parse_statuses(&raw).unwrap();
        assert_eq!(statuses, vec![TicketStatus::Resolved]);
    }

    #[test]
    fn test_parse_statuses_ignores_unknown_tokens() {
        let raw = Some("new,bogus,closed".to_string());
        let statuses = parse_statuses(&raw).unwrap();
        assert_eq!(statuses, vec![TicketStatus::New, TicketStatus::Closed]);
    }

    #[test]
    fn test_parse_statuses_none_when_absent() {
        assert!(parse_statuses(&None).is_none());
    }

    #[test]
    fn test_pagination_defaults() {
        let (page, page_size, offset) = pagination(None, None);
        assert_eq!(page, PAGE_DEFAULT);
        assert_eq!(page_size, PAGE_SIZE_DEFAULT);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_pagination_clamps_page_size_to_max() {
        let (_, page_size, _) = pagination(Some(1), Some(10_000));
        assert_eq!(page_size, PAGE_SIZE_MAX);
    }

    #[test]
    fn test_pagination_clamps_page_to_at_least_one() {
        let (page, _, offset) = pagination(Some(0), Some(20));
        assert_eq!(page, 1);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_pagination_computes_offset() {
        let (page, page_size, offset) = pagination(Some(3), Some(20));
        assert_eq!(page, 3);
        assert_eq!(page_size, 20);
        assert_eq!(offset, 40);
    }

    #[test]
    fn test_nearby_query_deserialize_with_defaults() {
        let query: NearbyQuery =
            serde_urlencoded::from_str("latitude=41.0082&longitude=28.9784").unwrap();
        assert_eq!(query.latitude, 41.0082);
        assert_eq!(query.longitude, 28.9784);
        assert!(query.radius_meters.is_none());
        assert!(query.category_id.is_none());
    }

    #[test]
    fn test_change_status_body_deserialize() {
        let json = r#"{"status": "resolved", "comment": "Fixed the pothole"}"#;
        let body: ChangeStatusBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, TicketStatus::Resolved);
        assert_eq!(body.comment, Some("Fixed the pothole".to_string()));
    }

    #[test]
    fn test_change_status_body_without_comment() {
        let json = r#"{"status": "closed"}"#;
        let body: ChangeStatusBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, TicketStatus::Closed);
        assert!(body.comment.is_none());
    }

    #[test]
    fn test_assign_team_body_deserialize() {
        let json = r#"{"team_id": "550e8400-e29b-41d4-a716-446655440000"}"#;
        let body: AssignTeamBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.team_id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }
}
