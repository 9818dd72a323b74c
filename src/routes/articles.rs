use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Articles Router Module
///
/// Article listing, single-article reads and vote updates, plus the comments
/// that belong to an article.
pub fn article_routes() -> Router<AppState> {
    Router::new()
        // GET /api/articles?topic=...&sort_by=...&order=...
        // Every article with its comment_count. Unknown sort_by/order values are
        // rejected with 400 before the repository is called.
        .route("/api/articles", get(handlers::get_articles))
        // GET/PATCH /api/articles/{article_id}
        // PATCH takes `{inc_votes}` and applies it in a single atomic update.
        .route(
            "/api/articles/{article_id}",
            get(handlers::get_article).patch(handlers::patch_article_votes),
        )
        // GET/POST /api/articles/{article_id}/comments
        // Both verify the article exists before touching comments.
        .route(
            "/api/articles/{article_id}/comments",
            get(handlers::get_article_comments).post(handlers::post_article_comment),
        )
}
