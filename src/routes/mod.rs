/// Router Module Index
///
/// The route table, split by resource. Every module returns a
/// `Router<AppState>` that `create_router` merges; nothing here applies
/// middleware or state.

/// `/api`, `/api/topics`, `/api/users`: read-only reference data.
pub mod catalog;

/// `/api/articles` and the comments nested under an article.
pub mod articles;

/// `/api/comments/{comment_id}`.
pub mod comments;
