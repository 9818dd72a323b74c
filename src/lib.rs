use std::any::Any;

use axum::{
    Router,
    http::HeaderName,
    response::{IntoResponse, Response},
};
use utoipa::OpenApi;

use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repository;

// Route table, grouped by resource.
pub mod routes;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::ApiError;
pub use repository::{Dataset, MemoryRepository, PostgresRepository, Repository, RepositoryState};

/// ApiDoc
///
/// The OpenAPI description of the whole API, assembled from the
/// `#[utoipa::path]` annotations on the handlers. Served by `GET /api`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_api, handlers::get_topics, handlers::get_articles,
        handlers::get_article, handlers::patch_article_votes,
        handlers::get_article_comments, handlers::post_article_comment,
        handlers::delete_comment, handlers::get_users
    ),
    components(
        schemas(
            models::Topic, models::User, models::Article, models::ArticleWithCount,
            models::Comment, models::VoteUpdateRequest, models::CreateCommentRequest,
            models::TopicsResponse, models::ArticlesResponse, models::ArticleResponse,
            models::CommentsResponse, models::CommentResponse, models::UsersResponse,
            error::ErrorBody,
        )
    ),
    tags(
        (name = "nc-news", description = "News articles, topics, comments and users")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Shared by every request. Holds the repository, and through it the
/// connection pool; nothing else is shared between requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: database access behind the `Repository` trait.
    pub repo: RepositoryState,
}

/// create_router
///
/// Assembles the route table, the catch-all 404 and the middleware stack, and
/// registers the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(AnyOrigin)
        .allow_origin(AnyOrigin)
        .allow_headers(AnyOrigin);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(routes::catalog::catalog_routes())
        .merge(routes::articles::article_routes())
        .merge(routes::comments::comment_routes())
        // Unknown paths and known paths with an unsupported method alike.
        .fallback(handlers::invalid_url)
        .method_not_allowed_fallback(handlers::invalid_url)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for every request, carrying the method, URI and the `x-request-id`
/// assigned by `SetRequestIdLayer`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}

/// A panicking handler still answers with the usual `{msg}` shape.
fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::Internal("handler panicked".into()).into_response()
}
