//! Post repository
//!
//! This module provides:
//! - `PostRepository` trait defining the interface for post data access
//! - `SqlxPostRepository` implementing the trait for SQLite and MySQL
//! - `PostFilter`, the secondary filter applied on top of visibility
//!
//! Every public listing goes through the visibility predicate
//! `status = 'active' AND published_at IS NOT NULL`. Only `get_by_id` ignores it.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

use crate::config::DatabaseDriver;
use crate::db::query::{self, Bind};
use crate::db::DynDatabasePool;
use crate::models::{CreatePostInput, Post, PostStatus};

const SELECT_POST: &str = r#"
    SELECT p.id, p.title, p.content, p.featured_image, p.status, p.views_count,
           p.published_at, p.category_id, c.name AS category_name,
           p.created_at, p.updated_at
    FROM posts p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

const VISIBLE: &str = "p.status = 'active' AND p.published_at IS NOT NULL";

/// Secondary filter for visible-post listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Every visible post
    All,
    /// Posts in one category
    Category(i64),
    /// Posts carrying one tag
    Tag(i64),
    /// Case-insensitive substring match on title or content
    Search(String),
}

impl PostFilter {
    /// Extra `AND ...` clause plus its binds
    fn clause(&self) -> (&'static str, Vec<Bind>) {
        match self {
            PostFilter::All => ("", vec![]),
            PostFilter::Category(id) => (" AND p.category_id = ?", vec![Bind::Int(*id)]),
            PostFilter::Tag(id) => (
                " AND p.id IN (SELECT pt.post_id FROM post_tags pt WHERE pt.tag_id = ?)",
                vec![Bind::Int(*id)],
            ),
            PostFilter::Search(text) => {
                let pattern = query::contains_pattern(text);
                (
                    " AND (LOWER(p.title) LIKE LOWER(?) ESCAPE '!' \
                     OR LOWER(p.content) LIKE LOWER(?) ESCAPE '!')",
                    vec![pattern.clone().into(), pattern.into()],
                )
            }
        }
    }
}

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a post and attach its tags
    async fn create(&self, input: &CreatePostInput) -> Result<Post>;

    /// Get post by ID regardless of visibility
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Get a post by ID only if it is publicly visible
    async fn get_visible(&self, id: i64) -> Result<Option<Post>>;

    /// First `limit` visible posts in insertion (id) order
    async fn list_visible_in_id_order(&self, limit: i64) -> Result<Vec<Post>>;

    /// Visible posts by views_count descending, ties by ascending id
    async fn list_most_viewed(&self, limit: i64) -> Result<Vec<Post>>;

    /// Visible posts published at or after `since`, newest first then most viewed
    async fn list_published_since(&self, since: DateTime<Utc>, limit: i64) -> Result<Vec<Post>>;

    /// One slice of visible posts matching `filter`, newest first
    async fn list_visible(&self, filter: &PostFilter, offset: i64, limit: i64) -> Result<Vec<Post>>;

    /// Number of visible posts matching `filter`
    async fn count_visible(&self, filter: &PostFilter) -> Result<i64>;

    /// Visible post with the highest id below `id`
    async fn previous_visible(&self, id: i64) -> Result<Option<Post>>;

    /// Visible post with the lowest id above `id`
    async fn next_visible(&self, id: i64) -> Result<Option<Post>>;

    /// Add one view; returns false when no such post exists
    async fn increment_views(&self, id: i64) -> Result<bool>;
}

/// SQLx-based post repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxPostRepository {
    pool: DynDatabasePool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }

    async fn fetch_all(&self, sql: &str, binds: Vec<Bind>) -> Result<Vec<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => query::fetch_all_sqlite(self.pool.sqlite()?, sql, binds)
                .await?
                .iter()
                .map(row_to_post_sqlite)
                .collect(),
            DatabaseDriver::Mysql => query::fetch_all_mysql(self.pool.mysql()?, sql, binds)
                .await?
                .iter()
                .map(row_to_post_mysql)
                .collect(),
        }
    }

    async fn fetch_one(&self, sql: &str, binds: Vec<Bind>) -> Result<Option<Post>> {
        Ok(self.fetch_all(sql, binds).await?.into_iter().next())
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, input: &CreatePostInput) -> Result<Post> {
        let now = Utc::now();
        let id = query::insert(
            &self.pool,
            r#"
            INSERT INTO posts (title, content, featured_image, status, views_count,
                               published_at, category_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            vec![
                input.title.as_str().into(),
                input.content.as_str().into(),
                input.featured_image.clone().into(),
                input.status.as_str().into(),
                input.views_count.into(),
                input.published_at.into(),
                input.category_id.into(),
                now.into(),
                now.into(),
            ],
        )
        .await
        .with_context(|| format!("Failed to create post {:?}", input.title))?;

        for tag_id in &input.tag_ids {
            query::execute(
                &self.pool,
                "INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)",
                vec![id.into(), (*tag_id).into()],
            )
            .await
            .with_context(|| format!("Failed to attach tag {} to post {}", tag_id, id))?;
        }

        self.get_by_id(id).await?.context("Post not found after insert")
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let sql = format!("{} WHERE p.id = ?", SELECT_POST);
        self.fetch_one(&sql, vec![id.into()]).await
    }

    async fn get_visible(&self, id: i64) -> Result<Option<Post>> {
        let sql = format!("{} WHERE {} AND p.id = ?", SELECT_POST, VISIBLE);
        self.fetch_one(&sql, vec![id.into()]).await
    }

    async fn list_visible_in_id_order(&self, limit: i64) -> Result<Vec<Post>> {
        let sql = format!("{} WHERE {} ORDER BY p.id ASC LIMIT ?", SELECT_POST, VISIBLE);
        self.fetch_all(&sql, vec![limit.into()]).await
    }

    async fn list_most_viewed(&self, limit: i64) -> Result<Vec<Post>> {
        let sql = format!(
            "{} WHERE {} ORDER BY p.views_count DESC, p.id ASC LIMIT ?",
            SELECT_POST, VISIBLE
        );
        self.fetch_all(&sql, vec![limit.into()]).await
    }

    async fn list_published_since(&self, since: DateTime<Utc>, limit: i64) -> Result<Vec<Post>> {
        let sql = format!(
            "{} WHERE {} AND p.published_at >= ? \
             ORDER BY p.published_at DESC, p.views_count DESC, p.id DESC LIMIT ?",
            SELECT_POST, VISIBLE
        );
        self.fetch_all(&sql, vec![since.into(), limit.into()]).await
    }

    async fn list_visible(&self, filter: &PostFilter, offset: i64, limit: i64) -> Result<Vec<Post>> {
        let (clause, mut binds) = filter.clause();
        let sql = format!(
            "{} WHERE {}{} ORDER BY p.published_at DESC, p.id DESC LIMIT ? OFFSET ?",
            SELECT_POST, VISIBLE, clause
        );
        binds.push(limit.into());
        binds.push(offset.into());
        self.fetch_all(&sql, binds).await
    }

    async fn count_visible(&self, filter: &PostFilter) -> Result<i64> {
        let (clause, binds) = filter.clause();
        let sql = format!(
            "SELECT COUNT(*) AS count FROM posts p WHERE {}{}",
            VISIBLE, clause
        );
        query::count(&self.pool, &sql, binds).await
    }

    async fn previous_visible(&self, id: i64) -> Result<Option<Post>> {
        let sql = format!(
            "{} WHERE {} AND p.id < ? ORDER BY p.id DESC LIMIT 1",
            SELECT_POST, VISIBLE
        );
        self.fetch_one(&sql, vec![id.into()]).await
    }

    async fn next_visible(&self, id: i64) -> Result<Option<Post>> {
        let sql = format!(
            "{} WHERE {} AND p.id > ? ORDER BY p.id ASC LIMIT 1",
            SELECT_POST, VISIBLE
        );
        self.fetch_one(&sql, vec![id.into()]).await
    }

    async fn increment_views(&self, id: i64) -> Result<bool> {
        let affected = query::execute(
            &self.pool,
            "UPDATE posts SET views_count = views_count + 1 WHERE id = ?",
            vec![id.into()],
        )
        .await
        .with_context(|| format!("Failed to count a view for post {}", id))?;
        Ok(affected > 0)
    }
}

fn parse_status(raw: &str) -> Result<PostStatus> {
    PostStatus::parse(raw).ok_or_else(|| anyhow!("Unknown post status {:?}", raw))
}

fn row_to_post_sqlite(row: &SqliteRow) -> Result<Post> {
    let status: String = row.try_get("status")?;
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        featured_image: row.try_get("featured_image")?,
        status: parse_status(&status)?,
        views_count: row.try_get("views_count")?,
        published_at: row.try_get("published_at")?,
        category_id: row.try_get("category_id")?,
        category_name: row.try_get("category_name").ok().flatten(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_post_mysql(row: &MySqlRow) -> Result<Post> {
    let status: String = row.try_get("status")?;
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        featured_image: row.try_get("featured_image")?,
        status: parse_status(&status)?,
        views_count: row.try_get("views_count")?,
        published_at: row.try_get("published_at")?,
        category_id: row.try_get("category_id")?,
        category_name: row.try_get("category_name").ok().flatten(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
