use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Catalog Router Module
///
/// Read-only listings with no parameters and no error path of their own.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        // GET /api
        // OpenAPI description of every endpoint.
        .route("/api", get(handlers::get_api))
        // GET /api/topics
        .route("/api/topics", get(handlers::get_topics))
        // GET /api/users
        .route("/api/users", get(handlers::get_users))
}
