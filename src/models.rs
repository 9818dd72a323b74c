use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Schemas (Mapped to Database) ---

/// Topic
///
/// A category articles are filed under. `slug` is the natural key referenced by `articles.topic`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Topic {
    pub slug: String,
    pub description: String,
}

/// User
///
/// A row of the `users` table. Authors of articles and comments reference `username`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct User {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

/// Article
///
/// The full article record, as returned by the single-article and vote endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Article {
    pub article_id: i32,
    // FK to users.username
    pub author: String,
    pub title: String,
    pub body: String,
    // FK to topics.slug
    pub topic: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub votes: i32,
    pub article_img_url: String,
}

/// ArticleWithCount
///
/// An article row from the listing query, annotated with the number of comments
/// attached to it. `comment_count` is aggregated per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct ArticleWithCount {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub article: Article,

    /// Sent as a string-typed number, matching what clients already parse.
    #[serde(with = "count_as_string")]
    #[ts(type = "string")]
    #[schema(value_type = String, example = "11")]
    pub comment_count: i64,
}

/// Comment
///
/// A row of the `comments` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Comment {
    pub comment_id: i32,
    pub body: String,
    pub votes: i32,
    // FK to users.username
    pub author: String,
    // FK to articles.article_id
    pub article_id: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---
//
// These document the accepted bodies. Handlers read the raw JSON object and
// validate field by field (see `extract`), so type mismatches surface as
// `400 Invalid input` rather than a generic deserialization failure.

/// VoteUpdateRequest
///
/// Body of `PATCH /api/articles/{article_id}`. `inc_votes` may be negative.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct VoteUpdateRequest {
    #[schema(example = -1)]
    pub inc_votes: i32,
}

/// CreateCommentRequest
///
/// Body of `POST /api/articles/{article_id}/comments`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateCommentRequest {
    #[schema(example = "butter_bridge")]
    pub username: String,
    pub body: String,
}

/// NewComment
///
/// A validated comment ready for insertion. `author` is not yet known to exist;
/// the foreign key decides that.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub author: String,
    pub body: String,
}

// --- Listing refinements ---

/// SortBy
///
/// The allow-list of columns the article listing may be ordered by. Anything
/// outside this enum is rejected before a query is built, so the column name
/// pushed into SQL is always one of the fixed strings below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    Title,
    Author,
    Body,
    #[default]
    CreatedAt,
    Votes,
    CommentCount,
}

impl SortBy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "body" => Some(Self::Body),
            "created_at" => Some(Self::CreatedAt),
            "votes" => Some(Self::Votes),
            "comment_count" => Some(Self::CommentCount),
            _ => None,
        }
    }

    /// The qualified SQL expression for the listing query.
    pub fn column(self) -> &'static str {
        match self {
            Self::Title => "articles.title",
            Self::Author => "articles.author",
            Self::Body => "articles.body",
            Self::CreatedAt => "articles.created_at",
            Self::Votes => "articles.votes",
            Self::CommentCount => "comment_count",
        }
    }
}

/// SortOrder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// ArticleFilter
///
/// Validated listing refinements handed to the repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleFilter {
    pub topic: Option<String>,
    pub sort_by: SortBy,
    pub order: SortOrder,
}

// --- Response Envelopes ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopicsResponse {
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticlesResponse {
    pub articles: Vec<ArticleWithCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticleResponse {
    pub article: Article,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub comment: Comment,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

mod count_as_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(count: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(count)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_article() -> Article {
        Article {
            article_id: 3,
            author: "icellusedkars".into(),
            title: "Eight pug gifs that remind me of mitch".into(),
            body: "some gifs".into(),
            topic: "mitch".into(),
            created_at: DateTime::from_timestamp(1_604_394_720, 0).unwrap(),
            votes: 0,
            article_img_url: "https://example.com/pug.jpg".into(),
        }
    }

    #[test]
    fn comment_count_is_serialized_as_string() {
        let row = ArticleWithCount {
            article: sample_article(),
            comment_count: 2,
        };
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["comment_count"], "2");
        // flattened: article fields sit beside the count
        assert_eq!(json["article_id"], 3);
        assert_eq!(json["topic"], "mitch");

        let back: ArticleWithCount = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn sort_by_allow_list() {
        for raw in ["title", "author", "body", "created_at", "votes", "comment_count"] {
            assert!(SortBy::parse(raw).is_some(), "{raw} should be accepted");
        }
        assert_eq!(SortBy::parse("article_img_url"), None);
        assert_eq!(SortBy::parse("votes; DROP TABLE articles"), None);
        assert_eq!(SortBy::default(), SortBy::CreatedAt);
    }

    #[test]
    fn sort_order_is_case_insensitive_and_defaults_desc() {
        assert_eq!(SortOrder::parse("ASC"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("sideways"), None);
        assert_eq!(SortOrder::default().keyword(), "DESC");
    }
}
