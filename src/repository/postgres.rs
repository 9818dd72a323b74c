use super::Repository;
use crate::{
    error::ApiError,
    models::{Article, ArticleFilter, ArticleWithCount, Comment, NewComment, Topic, User},
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, query_builder::QueryBuilder};

const ARTICLE_COLUMNS: &str =
    "article_id, author, title, body, topic, created_at, votes, article_img_url";

const COMMENT_COLUMNS: &str = "comment_id, body, votes, author, article_id, created_at";

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
/// Owns the connection pool; every call checks out a connection for a single
/// statement and returns it. No explicit transactions are used.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_topics(&self) -> Result<Vec<Topic>, ApiError> {
        let topics = sqlx::query_as::<_, Topic>("SELECT slug, description FROM topics")
            .fetch_all(&self.pool)
            .await?;
        Ok(topics)
    }

    async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as::<_, User>("SELECT username, name, avatar_url FROM users")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// get_articles
    ///
    /// Builds the listing query with QueryBuilder so the topic filter stays a
    /// bound parameter. The ORDER BY column and direction come from the
    /// `SortBy`/`SortOrder` enums, never from request text.
    async fn get_articles(
        &self,
        filter: &ArticleFilter,
    ) -> Result<Vec<ArticleWithCount>, ApiError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT
                articles.article_id, articles.author, articles.title, articles.body,
                articles.topic, articles.created_at, articles.votes, articles.article_img_url,
                COUNT(comments.comment_id) AS comment_count
            FROM articles
            LEFT JOIN comments ON comments.article_id = articles.article_id
            "#,
        );

        if let Some(topic) = &filter.topic {
            builder.push(" WHERE articles.topic = ");
            builder.push_bind(topic.clone());
        }

        builder.push(" GROUP BY articles.article_id ORDER BY ");
        builder.push(filter.sort_by.column());
        builder.push(" ");
        builder.push(filter.order.keyword());
        builder.push(", articles.article_id ASC");

        let articles = builder
            .build_query_as::<ArticleWithCount>()
            .fetch_all(&self.pool)
            .await?;
        Ok(articles)
    }

    async fn get_article(&self, article_id: i32) -> Result<Article, ApiError> {
        sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles WHERE article_id = $1"
        ))
        .bind(article_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(ApiError::article_not_found)
    }

    /// increment_article_votes
    ///
    /// A single `votes = votes + $1` statement: concurrent increments on the same
    /// row are serialized by the row lock, so none are lost. An overflowing sum
    /// fails with SQLSTATE 22003 and maps to `OutOfRange`.
    async fn increment_article_votes(
        &self,
        article_id: i32,
        inc_votes: i32,
    ) -> Result<Article, ApiError> {
        sqlx::query_as::<_, Article>(&format!(
            "UPDATE articles SET votes = votes + $1 WHERE article_id = $2 \
             RETURNING {ARTICLE_COLUMNS}"
        ))
        .bind(inc_votes)
        .bind(article_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(ApiError::article_not_found)
    }

    async fn get_comments(&self, article_id: i32) -> Result<Vec<Comment>, ApiError> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE article_id = $1 \
             ORDER BY created_at DESC, comment_id DESC"
        ))
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    /// add_comment
    ///
    /// An unknown author (or an article removed since the caller checked it)
    /// violates a foreign key; the error carries Postgres' DETAIL line.
    async fn add_comment(&self, article_id: i32, comment: NewComment) -> Result<Comment, ApiError> {
        let inserted = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (body, author, article_id) VALUES ($1, $2, $3) \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(comment.body)
        .bind(comment.author)
        .bind(article_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted)
    }

    async fn delete_comment(&self, comment_id: i32) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::comment_not_found());
        }
        Ok(())
    }
}
