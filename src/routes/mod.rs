//! API route modules.
//!
//! Routes are organized by domain:
//! - `/health` - Health check endpoint
//! - `/api/v1/tickets` - Ticket lifecycle
//! - `/api/v1/escalations` - Escalation review
//! - `/api/v1/notifications` - Per-user notification inbox
//! - `/api/v1/categories`, `/districts`, `/teams` - Reference data

mod health;

use std::sync::Arc;

use axum::extract::FromRef;
use axum::{middleware, Router};
use sqlx::PgPool;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::Config;
use crate::handlers;
use crate::middleware::{json_payload_error, RateLimiter};
use crate::notifier::Notifier;
use crate::storage::StorageClient;

pub use health::health_check;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub storage: Arc<StorageClient>,
    pub notifier: Arc<dyn Notifier>,
    pub rate_limiter: RateLimiter,
    pub jwt_secret: String,
    pub max_photo_size: usize,
}

impl AppState {
    pub fn new(db: PgPool, storage: StorageClient, notifier: Arc<dyn Notifier>, config: &Config) -> Self {
        Self {
            db,
            storage: Arc::new(storage),
            notifier,
            rate_limiter: RateLimiter::new(config.rate_limit_quota, config.rate_limit_window_secs),
            jwt_secret: config.jwt_secret.clone(),
            max_photo_size: config.max_photo_size,
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

/// Request-body caps applied before any handler runs.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimitConfig {
    pub max_body_size: usize,
    pub max_photo_size: usize,
}

/// Build the API router with every route wired to `state`. Photo uploads get
/// their own, larger body-size cap; every other route shares the default.
pub fn api_router_with_limits(state: AppState, body_limits: BodyLimitConfig) -> Router {
    let photo_routes = Router::new()
        .route("/tickets/:id/photos", axum::routing::post(handlers::tickets::upload_photo))
        .layer(RequestBodyLimitLayer::new(body_limits.max_photo_size))
        .layer(middleware::from_fn(json_payload_error));

    let ticket_routes = Router::new()
        .route(
            "/tickets",
            axum::routing::post(handlers::tickets::create).get(handlers::tickets::list),
        )
        .route("/tickets/my", axum::routing::get(handlers::tickets::my_tickets))
        .route("/tickets/assigned", axum::routing::get(handlers::tickets::assigned_tickets))
        .route("/tickets/nearby", axum::routing::get(handlers::tickets::nearby))
        .route(
            "/tickets/:id",
            axum::routing::get(handlers::tickets::detail)
                .patch(handlers::tickets::update)
                .delete(handlers::tickets::delete),
        )
        .route("/tickets/:id/status", axum::routing::patch(handlers::tickets::change_status))
        .route("/tickets/:id/assign", axum::routing::patch(handlers::tickets::assign_team))
        .route(
            "/tickets/:id/follow",
            axum::routing::post(handlers::tickets::follow).delete(handlers::tickets::unfollow),
        )
        .route(
            "/tickets/:id/comments",
            axum::routing::get(handlers::tickets::list_comments).post(handlers::tickets::add_comment),
        );

    let feedback_routes = Router::new().route(
        "/feedback/tickets/:id",
        axum::routing::post(handlers::feedback::submit).get(handlers::feedback::get),
    );

    let escalation_routes = Router::new()
        .route(
            "/escalations",
            axum::routing::post(handlers::escalations::create).get(handlers::escalations::list),
        )
        .route("/escalations/:id", axum::routing::get(handlers::escalations::detail))
        .route("/escalations/:id/approve", axum::routing::patch(handlers::escalations::approve))
        .route("/escalations/:id/reject", axum::routing::patch(handlers::escalations::reject));

    let notification_routes = Router::new()
        .route("/notifications", axum::routing::get(handlers::notifications::list))
        .route("/notifications/:id/read", axum::routing::patch(handlers::notifications::mark_read))
        .route("/notifications/read-all", axum::routing::patch(handlers::notifications::mark_all_read));

    let reference_routes = Router::new()
        .route("/categories", axum::routing::get(handlers::categories::list))
        .route("/districts", axum::routing::get(handlers::districts::list))
        .route("/teams", axum::routing::get(handlers::teams::list));

    let default_limit_routes = Router::new()
        .merge(ticket_routes)
        .merge(feedback_routes)
        .merge(escalation_routes)
        .merge(notification_routes)
        .merge(reference_routes)
        .layer(RequestBodyLimitLayer::new(body_limits.max_body_size))
        .layer(middleware::from_fn(json_payload_error));

    let api_v1 = Router::new().merge(default_limit_routes).merge(photo_routes);

    Router::new()
        .route("/health", axum::routing::get(health::health_check))
        .nest("/api/v1", api_v1)
        .with_state(state)
}
