use crate::{AppState, handlers};
use axum::{Router, routing::delete};

/// Comments Router Module
pub fn comment_routes() -> Router<AppState> {
    Router::new()
        // DELETE /api/comments/{comment_id}
        // 204 with no body on success, 404 when nothing was deleted.
        .route("/api/comments/{comment_id}", delete(handlers::delete_comment))
}
