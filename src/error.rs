use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgDatabaseError;
use ts_rs::TS;
use utoipa::ToSchema;

/// ErrorBody
///
/// The single error shape the API ever returns: `{"msg": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorBody {
    pub msg: String,
}

/// ApiError
///
/// Closed set of failures a request can end in. Handlers raise the validation
/// variants directly; storage failures arrive through `From<sqlx::Error>`.
/// The `Display` text of each variant is the `msg` sent to the client, except
/// for `Internal`, whose detail is only logged.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Text that is not an integer where one is required (path id, `inc_votes`).
    #[error("Invalid input")]
    InvalidInput,

    /// Integer that does not fit the 32-bit storage column.
    #[error("Out of range for type integer - choose a smaller number")]
    OutOfRange,

    /// Missing body, or a required field is absent/null/empty.
    #[error("Malformed body/missing required fields")]
    MalformedBody,

    /// Rejected query-string refinement (e.g. an unknown `sort_by` column).
    #[error("{0}")]
    InvalidQuery(String),

    /// Well-formed identifier that references nothing.
    #[error("{0}")]
    NotFound(String),

    /// Referential integrity failure; carries the database's detail line.
    #[error("{0}")]
    ForeignKeyViolation(String),

    /// No route matched the request.
    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn article_not_found() -> Self {
        Self::NotFound("Article ID does not exist".to_string())
    }

    pub fn comment_not_found() -> Self {
        Self::NotFound("Comment does not exist".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput
            | Self::OutOfRange
            | Self::MalformedBody
            | Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::ForeignKeyViolation(_) | Self::InvalidUrl => {
                StatusCode::NOT_FOUND
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// from_database_code
    ///
    /// Maps a PostgreSQL SQLSTATE to the matching error kind. `detail` is the
    /// server's DETAIL line, which names the offending key for constraint errors.
    pub fn from_database_code(code: &str, detail: Option<&str>, message: &str) -> Self {
        match code {
            // invalid_text_representation
            "22P02" => Self::InvalidInput,
            // numeric_value_out_of_range
            "22003" => Self::OutOfRange,
            // foreign_key_violation
            "23503" => Self::ForeignKeyViolation(detail.unwrap_or(message).to_string()),
            // not_null_violation
            "23502" => Self::MalformedBody,
            other => Self::Internal(format!("database error {other}: {message}")),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let detail = db_err
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(|pg| pg.detail());
                match db_err.code() {
                    Some(code) => Self::from_database_code(&code, detail, db_err.message()),
                    None => Self::Internal(db_err.message().to_string()),
                }
            }
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(detail) = &self {
            tracing::error!(%detail, "unhandled error");
        } else {
            tracing::debug!(status = status.as_u16(), msg = %self, "request rejected");
        }
        let body = ErrorBody {
            msg: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
