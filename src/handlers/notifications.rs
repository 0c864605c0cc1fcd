//! Per-user notification inbox.

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::principal::Principal;
use crate::repositories::NotificationRepository;
use crate::response::{empty, ok, ApiResult, Page};
use crate::validation::constraints::{PAGE_DEFAULT, PAGE_SIZE_DEFAULT, PAGE_SIZE_MAX};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

pub async fn list(
    State(pool): State<PgPool>,
    principal: Principal,
    Query(query): Query<ListQuery>,
) -> ApiResult<Page<crate::models::notification::Notification>> {
    let page = query.page.unwrap_or(PAGE_DEFAULT).max(1);
    let page_size = query
        .page_size
        .unwrap_or(PAGE_SIZE_DEFAULT)
        .clamp(1, PAGE_SIZE_MAX);
    let offset = (page - 1) * page_size;

    let items = NotificationRepository::list_for_user(
        &pool,
        principal.user_id,
        query.unread_only,
        page_size,
        offset,
    )
    .await?;
    let total = NotificationRepository::count_for_user(&pool, principal.user_id, query.unread_only)
        .await?;

    ok(Page::new(items, total, page, page_size))
}

pub async fn mark_read(
    State(pool): State<PgPool>,
    principal: Principal,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<()> {
    NotificationRepository::mark_read(&pool, notification_id, principal.user_id).await?;
    empty()
}

pub async fn mark_all_read(State(pool): State<PgPool>, principal: Principal) -> ApiResult<()> {
    NotificationRepository::mark_all_read(&pool, principal.user_id).await?;
    empty()
}
