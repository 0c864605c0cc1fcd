//! Civic Tickets API - citizen issue-reporting and resolution backend
//!
//! This crate provides the REST API for the Civic Tickets application.

pub mod config;
pub mod cors;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod notifier;
pub mod principal;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod services;
pub mod storage;
pub mod utils;
pub mod validation;

pub use config::Config;
pub use cors::build_cors_layer;
pub use db::{create_pool, test_connection, DbConfig};
pub use error::{codes as error_codes, AppError};
pub use notifier::{LoggingNotifier, Notifier};
pub use principal::Principal;
pub use response::{created, empty, no_content, ok, ApiResponse, ApiResult};
pub use routes::{api_router_with_limits, AppState, BodyLimitConfig};
pub use storage::{StorageClient, StorageConfig, StorageError, StorageResult};
