//! Comment repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

use crate::config::DatabaseDriver;
use crate::db::query::{self, Bind};
use crate::db::DynDatabasePool;
use crate::models::{Comment, CreateCommentInput};

const SELECT_COMMENT: &str =
    "SELECT id, post_id, name, email, comment, created_at, updated_at FROM comments";

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Store a new comment
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment>;

    /// Comments on a post, oldest first
    async fn list_by_post(&self, post_id: i64) -> Result<Vec<Comment>>;
}

/// Comment repository implementation
pub struct CommentRepositoryImpl {
    pool: DynDatabasePool,
}

impl CommentRepositoryImpl {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }

    async fn fetch_all(&self, sql: &str, binds: Vec<Bind>) -> Result<Vec<Comment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => query::fetch_all_sqlite(self.pool.sqlite()?, sql, binds)
                .await?
                .iter()
                .map(row_to_comment_sqlite)
                .collect(),
            DatabaseDriver::Mysql => query::fetch_all_mysql(self.pool.mysql()?, sql, binds)
                .await?
                .iter()
                .map(row_to_comment_mysql)
                .collect(),
        }
    }
}

#[async_trait]
impl CommentRepository for CommentRepositoryImpl {
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment> {
        let now = Utc::now();
        let id = query::insert(
            &self.pool,
            r#"
            INSERT INTO comments (post_id, name, email, comment, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            vec![
                input.post_id.into(),
                input.name.as_str().into(),
                input.email.as_str().into(),
                input.comment.as_str().into(),
                now.into(),
                now.into(),
            ],
        )
        .await
        .with_context(|| format!("Failed to create comment on post {}", input.post_id))?;

        let sql = format!("{} WHERE id = ?", SELECT_COMMENT);
        self.fetch_all(&sql, vec![id.into()])
            .await?
            .into_iter()
            .next()
            .context("Comment not found after insert")
    }

    async fn list_by_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        let sql = format!("{} WHERE post_id = ? ORDER BY created_at ASC, id ASC", SELECT_COMMENT);
        self.fetch_all(&sql, vec![post_id.into()]).await
    }
}

fn row_to_comment_sqlite(row: &SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        comment: row.try_get("comment")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_comment_mysql(row: &MySqlRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        comment: row.try_get("comment")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
