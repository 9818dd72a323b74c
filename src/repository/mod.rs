use crate::{
    error::ApiError,
    models::{Article, ArticleFilter, ArticleWithCount, Comment, NewComment, Topic, User},
};
use async_trait::async_trait;
use std::sync::Arc;

pub mod memory;
pub mod postgres;

pub use memory::{Dataset, MemoryRepository};
pub use postgres::PostgresRepository;

/// Repository Trait
///
/// The data access contract the handlers are written against. Every method
/// either returns rows or rejects with a typed [`ApiError`]; nothing is
/// swallowed here, so the response layer sees the original failure.
///
/// Implementations must reproduce the storage-level error kinds callers rely on:
/// a missing related row on insert is `ForeignKeyViolation` carrying a
/// `Key (col)=(value) is not present in table "t".` detail, and arithmetic that
/// leaves the 32-bit column range is `OutOfRange`.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Topics & Users ---
    async fn get_topics(&self) -> Result<Vec<Topic>, ApiError>;
    async fn get_users(&self) -> Result<Vec<User>, ApiError>;

    // --- Articles ---
    // Listing with per-article comment counts, filtered and ordered by `filter`.
    async fn get_articles(
        &self,
        filter: &ArticleFilter,
    ) -> Result<Vec<ArticleWithCount>, ApiError>;
    // NotFound("Article ID does not exist") when no row matches.
    async fn get_article(&self, article_id: i32) -> Result<Article, ApiError>;
    // Adds `inc_votes` to the current count in one atomic step and returns the updated row.
    async fn increment_article_votes(
        &self,
        article_id: i32,
        inc_votes: i32,
    ) -> Result<Article, ApiError>;

    // --- Comments ---
    // Newest first. An unknown article yields an empty list, not an error.
    async fn get_comments(&self, article_id: i32) -> Result<Vec<Comment>, ApiError>;
    async fn add_comment(&self, article_id: i32, comment: NewComment) -> Result<Comment, ApiError>;
    // NotFound("Comment does not exist") when no row was deleted.
    async fn delete_comment(&self, comment_id: i32) -> Result<(), ApiError>;
}

/// RepositoryState
///
/// The shared handle to the persistence layer held in the application state.
pub type RepositoryState = Arc<dyn Repository>;
