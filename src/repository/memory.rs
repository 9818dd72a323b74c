//! In-memory repository.
//!
//! All rows live in RAM behind a [`RwLock`] and are lost when the process
//! exits. Used by the test suites and by local runs without `DATABASE_URL`.
//!
//! The store mimics the relational constraints of the SQL schema: inserts are
//! checked against the referenced tables and fail with the same
//! foreign-key detail text PostgreSQL produces, and vote arithmetic that leaves
//! the `integer` range fails as `OutOfRange`.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::Repository;
use crate::{
    error::ApiError,
    models::{
        Article, ArticleFilter, ArticleWithCount, Comment, NewComment, SortBy, SortOrder, Topic,
        User,
    },
};

/// Dataset
///
/// Rows to preload a [`MemoryRepository`] with. Articles and comments keep the
/// ids given here; later inserts continue after the highest one.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub topics: Vec<Topic>,
    pub users: Vec<User>,
    pub articles: Vec<Article>,
    pub comments: Vec<Comment>,
}

struct Inner {
    topics: Vec<Topic>,
    users: Vec<User>,
    articles: BTreeMap<i32, Article>,
    comments: BTreeMap<i32, Comment>,
    next_comment_id: i32,
}

/// Thread-safe, in-memory implementation of [`Repository`].
pub struct MemoryRepository {
    inner: RwLock<Inner>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::with_dataset(Dataset::default())
    }

    pub fn with_dataset(data: Dataset) -> Self {
        let next_comment_id = data
            .comments
            .iter()
            .map(|c| c.comment_id)
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            inner: RwLock::new(Inner {
                topics: data.topics,
                users: data.users,
                articles: data.articles.into_iter().map(|a| (a.article_id, a)).collect(),
                comments: data.comments.into_iter().map(|c| (c.comment_id, c)).collect(),
                next_comment_id,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, ApiError> {
        self.inner
            .read()
            .map_err(|_| ApiError::Internal("memory repository lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, ApiError> {
        self.inner
            .write()
            .map_err(|_| ApiError::Internal("memory repository lock poisoned".into()))
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn missing_key(column: &str, value: &str, table: &str) -> ApiError {
    ApiError::ForeignKeyViolation(format!(
        r#"Key ({column})=({value}) is not present in table "{table}"."#
    ))
}

fn compare(a: &ArticleWithCount, b: &ArticleWithCount, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Title => a.article.title.cmp(&b.article.title),
        SortBy::Author => a.article.author.cmp(&b.article.author),
        SortBy::Body => a.article.body.cmp(&b.article.body),
        SortBy::CreatedAt => a.article.created_at.cmp(&b.article.created_at),
        SortBy::Votes => a.article.votes.cmp(&b.article.votes),
        SortBy::CommentCount => a.comment_count.cmp(&b.comment_count),
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_topics(&self) -> Result<Vec<Topic>, ApiError> {
        Ok(self.read()?.topics.clone())
    }

    async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.read()?.users.clone())
    }

    async fn get_articles(
        &self,
        filter: &ArticleFilter,
    ) -> Result<Vec<ArticleWithCount>, ApiError> {
        let inner = self.read()?;

        let mut rows: Vec<ArticleWithCount> = inner
            .articles
            .values()
            .filter(|a| filter.topic.as_ref().is_none_or(|t| &a.topic == t))
            .map(|a| ArticleWithCount {
                comment_count: inner
                    .comments
                    .values()
                    .filter(|c| c.article_id == a.article_id)
                    .count() as i64,
                article: a.clone(),
            })
            .collect();

        rows.sort_by(|a, b| {
            let primary = compare(a, b, filter.sort_by);
            let primary = match filter.order {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            primary.then(a.article.article_id.cmp(&b.article.article_id))
        });

        Ok(rows)
    }

    async fn get_article(&self, article_id: i32) -> Result<Article, ApiError> {
        self.read()?
            .articles
            .get(&article_id)
            .cloned()
            .ok_or_else(ApiError::article_not_found)
    }

    async fn increment_article_votes(
        &self,
        article_id: i32,
        inc_votes: i32,
    ) -> Result<Article, ApiError> {
        let mut inner = self.write()?;
        let article = inner
            .articles
            .get_mut(&article_id)
            .ok_or_else(ApiError::article_not_found)?;

        article.votes = article
            .votes
            .checked_add(inc_votes)
            .ok_or(ApiError::OutOfRange)?;
        Ok(article.clone())
    }

    async fn get_comments(&self, article_id: i32) -> Result<Vec<Comment>, ApiError> {
        let mut comments: Vec<Comment> = self
            .read()?
            .comments
            .values()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect();

        comments.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.comment_id.cmp(&a.comment_id))
        });
        Ok(comments)
    }

    async fn add_comment(&self, article_id: i32, comment: NewComment) -> Result<Comment, ApiError> {
        let mut inner = self.write()?;

        if !inner.articles.contains_key(&article_id) {
            return Err(missing_key("article_id", &article_id.to_string(), "articles"));
        }
        if !inner.users.iter().any(|u| u.username == comment.author) {
            return Err(missing_key("author", &comment.author, "users"));
        }

        let comment_id = inner.next_comment_id;
        inner.next_comment_id += 1;

        let row = Comment {
            comment_id,
            body: comment.body,
            votes: 0,
            author: comment.author,
            article_id,
            created_at: Utc::now(),
        };
        inner.comments.insert(comment_id, row.clone());
        Ok(row)
    }

    async fn delete_comment(&self, comment_id: i32) -> Result<(), ApiError> {
        self.write()?
            .comments
            .remove(&comment_id)
            .map(|_| ())
            .ok_or_else(ApiError::comment_not_found)
    }
}
