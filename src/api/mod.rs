//! HTTP layer - axum router, shared state, and request handlers.
//!
//! Authentication happens upstream. The auth gate in front of this service
//! passes the logged-in username in a configurable request header (see
//! [`crate::config::server::ServerConfig::actor_header`]); [`actor::Actor`] reads it.

/// Extractors for the acting user and for admin-only routes
pub mod actor;
/// Mapping of [`crate::errors::Error`] onto HTTP responses
pub mod error;
/// Route handlers for stock, admin, and health endpoints
pub mod handlers;
/// JSON request bodies with crate-style rejections
pub mod json;

use crate::errors::{Error, Result};
use axum::{
    Router,
    http::HeaderName,
    routing::{delete, get, post},
};
use handlers::{admin, health, stocks};
use sea_orm::DatabaseConnection;
use std::{collections::HashSet, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared data available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Header carrying the authenticated username
    pub actor_header: HeaderName,
    /// Usernames allowed on `/api/admin/*`
    pub admins: Arc<HashSet<String>>,
}

impl AppState {
    /// Builds the state, validating the configured actor header name.
    pub fn new(
        database: DatabaseConnection,
        actor_header: &str,
        admins: HashSet<String>,
    ) -> Result<Self> {
        let header = HeaderName::from_bytes(actor_header.as_bytes()).map_err(|e| Error::Config {
            message: format!("Invalid actor header '{actor_header}': {e}"),
        })?;
        Ok(Self {
            database,
            actor_header: header,
            admins: Arc::new(admins),
        })
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/stocks",
            get(stocks::list_stocks).post(stocks::create_stock),
        )
        .route("/api/stocks/deduct", post(stocks::deduct_stock))
        .route(
            "/api/stocks/:id",
            get(stocks::get_stock)
                .put(stocks::update_stock)
                .delete(stocks::delete_stock),
        )
        .route(
            "/api/admin/logs",
            get(admin::list_logs).delete(admin::clear_logs),
        )
        .route("/api/admin/logs/:id", delete(admin::delete_log))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
