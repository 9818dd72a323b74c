use crate::{
    AppState,
    error::{ApiError, ErrorBody},
    extract::{JsonObject, PathId},
    models::{
        ArticleFilter, ArticleResponse, ArticlesResponse, CommentResponse, CommentsResponse,
        CreateCommentRequest, NewComment, SortBy, SortOrder, TopicsResponse, UsersResponse,
        VoteUpdateRequest,
    },
};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::OpenApi;

// --- Query Structs ---

/// ArticleQuery
///
/// Raw query parameters for GET /api/articles. Kept as strings so that unknown
/// values can be rejected with a JSON `{msg}` instead of an extractor rejection.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArticleQuery {
    /// Only articles filed under this topic slug.
    pub topic: Option<String>,
    /// One of: title, author, body, created_at, votes, comment_count.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default `desc`).
    pub order: Option<String>,
}

impl ArticleQuery {
    /// Validates every refinement up front; storage is never consulted with an
    /// unknown column or direction.
    pub fn into_filter(self) -> Result<ArticleFilter, ApiError> {
        let sort_by = match self.sort_by.as_deref() {
            None => SortBy::default(),
            Some(raw) => SortBy::parse(raw)
                .ok_or_else(|| ApiError::InvalidQuery("Invalid sort_by query".into()))?,
        };
        let order = match self.order.as_deref() {
            None => SortOrder::default(),
            Some(raw) => SortOrder::parse(raw)
                .ok_or_else(|| ApiError::InvalidQuery("Invalid order query".into()))?,
        };
        Ok(ArticleFilter {
            topic: self.topic,
            sort_by,
            order,
        })
    }
}

// --- Handlers ---

/// get_api
///
/// Describes every endpoint. The document is the OpenAPI description assembled
/// from the `#[utoipa::path]` annotations in this module.
#[utoipa::path(
    get,
    path = "/api",
    responses((status = 200, description = "OpenAPI description of all endpoints"))
)]
pub async fn get_api() -> impl IntoResponse {
    Json(crate::ApiDoc::openapi())
}

/// get_topics
#[utoipa::path(
    get,
    path = "/api/topics",
    responses((status = 200, description = "All topics", body = TopicsResponse))
)]
pub async fn get_topics(State(state): State<AppState>) -> Result<Json<TopicsResponse>, ApiError> {
    let topics = state.repo.get_topics().await?;
    Ok(Json(TopicsResponse { topics }))
}

/// get_articles
///
/// Lists articles with their comment counts. Newest first unless `sort_by` /
/// `order` say otherwise.
#[utoipa::path(
    get,
    path = "/api/articles",
    params(ArticleQuery),
    responses(
        (status = 200, description = "Articles", body = ArticlesResponse),
        (status = 400, description = "Unknown sort_by or order", body = ErrorBody)
    )
)]
pub async fn get_articles(
    State(state): State<AppState>,
    query: Result<Query<ArticleQuery>, QueryRejection>,
) -> Result<Json<ArticlesResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;
    let filter = query.into_filter()?;
    let articles = state.repo.get_articles(&filter).await?;
    Ok(Json(ArticlesResponse { articles }))
}

/// get_article
#[utoipa::path(
    get,
    path = "/api/articles/{article_id}",
    params(("article_id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Found", body = ArticleResponse),
        (status = 400, description = "Invalid or out of range id", body = ErrorBody),
        (status = 404, description = "Article ID does not exist", body = ErrorBody)
    )
)]
pub async fn get_article(
    State(state): State<AppState>,
    article_id: PathId,
) -> Result<Json<ArticleResponse>, ApiError> {
    let article_id = article_id.integer()?;
    let article = state.repo.get_article(article_id).await?;
    Ok(Json(ArticleResponse { article }))
}

/// patch_article_votes
///
/// Applies `inc_votes` (may be negative) to the article's vote count in one
/// atomic repository call.
#[utoipa::path(
    patch,
    path = "/api/articles/{article_id}",
    params(("article_id" = i32, Path, description = "Article ID")),
    request_body = VoteUpdateRequest,
    responses(
        (status = 200, description = "Updated", body = ArticleResponse),
        (status = 400, description = "Malformed body or invalid input", body = ErrorBody),
        (status = 404, description = "Article ID does not exist", body = ErrorBody)
    )
)]
pub async fn patch_article_votes(
    State(state): State<AppState>,
    article_id: PathId,
    body: JsonObject,
) -> Result<Json<ArticleResponse>, ApiError> {
    let article_id = article_id.integer()?;
    let inc_votes = body.integer("inc_votes")?;
    let article = state
        .repo
        .increment_article_votes(article_id, inc_votes)
        .await?;
    Ok(Json(ArticleResponse { article }))
}

/// get_article_comments
///
/// The article is looked up first so an unknown id is a 404 rather than an
/// empty list.
#[utoipa::path(
    get,
    path = "/api/articles/{article_id}/comments",
    params(("article_id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Comments, newest first", body = CommentsResponse),
        (status = 400, description = "Invalid or out of range id", body = ErrorBody),
        (status = 404, description = "Article ID does not exist", body = ErrorBody)
    )
)]
pub async fn get_article_comments(
    State(state): State<AppState>,
    article_id: PathId,
) -> Result<Json<CommentsResponse>, ApiError> {
    let article_id = article_id.integer()?;
    state.repo.get_article(article_id).await?;
    let comments = state.repo.get_comments(article_id).await?;
    Ok(Json(CommentsResponse { comments }))
}

/// post_article_comment
///
/// Validation order: body fields, then the id, then article existence. The
/// author is not pre-checked; the insert's foreign key reports an unknown user.
/// The article may vanish between the lookup and the insert, in which case the
/// foreign key on `article_id` reports it instead.
#[utoipa::path(
    post,
    path = "/api/articles/{article_id}/comments",
    params(("article_id" = i32, Path, description = "Article ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Malformed body or invalid id", body = ErrorBody),
        (status = 404, description = "Unknown article or user", body = ErrorBody)
    )
)]
pub async fn post_article_comment(
    State(state): State<AppState>,
    article_id: PathId,
    body: JsonObject,
) -> Result<impl IntoResponse, ApiError> {
    let comment = NewComment {
        author: body.text("username")?,
        body: body.text("body")?,
    };
    let article_id = article_id.integer()?;

    state.repo.get_article(article_id).await?;
    let comment = state.repo.add_comment(article_id, comment).await?;

    tracing::info!(comment_id = comment.comment_id, article_id, "comment created");
    Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}

/// delete_comment
#[utoipa::path(
    delete,
    path = "/api/comments/{comment_id}",
    params(("comment_id" = i32, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid or out of range id", body = ErrorBody),
        (status = 404, description = "Comment does not exist", body = ErrorBody)
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    comment_id: PathId,
) -> Result<StatusCode, ApiError> {
    let comment_id = comment_id.integer()?;
    state.repo.delete_comment(comment_id).await?;

    tracing::info!(comment_id, "comment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// get_users
#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All users", body = UsersResponse))
)]
pub async fn get_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.repo.get_users().await?;
    Ok(Json(UsersResponse { users }))
}

/// invalid_url
///
/// Catch-all for anything the route table does not match, whatever the method.
pub async fn invalid_url() -> ApiError {
    ApiError::InvalidUrl
}
